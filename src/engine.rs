//! Cycle orchestration.
//!
//! One `Engine` owns the full pipeline: ingest markets, poll the
//! resolution sources for the domains those markets belong to, detect
//! opportunities, generate signals, and publish the lot as a new state
//! snapshot. A cycle either completes and swaps the snapshot in, or
//! fails and leaves the previous snapshot untouched.

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, RoiParams, TestModeParams};
use crate::detector;
use crate::http::{HttpFetch, ReqwestFetcher};
use crate::ingest::{GammaClient, MarketSource};
use crate::monitor::SourceMonitor;
use crate::roi;
use crate::roi::cache::RoiCache;
use crate::signals;
use crate::sources::SourceCatalog;
use crate::state::{EngineSnapshot, SharedState};
use crate::text;
use crate::types::{Market, TradeAction};

pub struct Engine {
    name: String,
    catalog: SourceCatalog,
    monitor: SourceMonitor,
    market_source: Box<dyn MarketSource>,
    roi_cache: Arc<RoiCache>,
    roi_params: RwLock<RoiParams>,
    test_mode: RwLock<TestModeParams>,
    base_keywords: Vec<String>,
    extra_endpoints: Vec<String>,
    state: SharedState,
    cycle: AtomicU64,
}

impl Engine {
    /// Build an engine with explicit collaborators. Tests inject stub
    /// fetchers and static market lists through here.
    pub fn new(
        config: &AppConfig,
        http: Arc<dyn HttpFetch>,
        market_source: Box<dyn MarketSource>,
    ) -> Self {
        Self {
            name: config.engine.name.clone(),
            catalog: SourceCatalog::from_env(),
            monitor: SourceMonitor::new(Arc::clone(&http), config.monitor.poll_deadline_ms),
            market_source,
            roi_cache: Arc::new(RoiCache::new(config.cache.max_entries)),
            roi_params: RwLock::new(config.roi),
            test_mode: RwLock::new(config.test_mode),
            base_keywords: config.monitor.keywords.clone(),
            extra_endpoints: config.monitor.extra_endpoints.clone(),
            state: SharedState::new(),
            cycle: AtomicU64::new(0),
        }
    }

    /// Production wiring: reqwest transport and the Gamma listing API.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let http: Arc<dyn HttpFetch> = Arc::new(
            ReqwestFetcher::new(config.monitor.request_timeout_ms)
                .context("Failed to build HTTP client")?,
        );
        let market_source = Box::new(GammaClient::new(
            Arc::clone(&http),
            config.ingest.gamma_url.clone(),
            config.ingest.limit,
        ));
        Ok(Self::new(config, http, market_source))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    // -- Runtime reconfiguration ------------------------------------------

    /// Replace the ROI friction parameters. Takes effect from the next
    /// estimate; memoized entries under the old parameters stay valid
    /// because the parameters are part of the cache key.
    pub fn configure_roi_params(&self, params: RoiParams) {
        info!(
            fee = params.fee,
            catchup_speed = params.catchup_speed,
            action_time = params.action_time,
            fixed_cost = params.fixed_cost,
            "ROI parameters updated"
        );
        match self.roi_params.write() {
            Ok(mut guard) => *guard = params,
            Err(poisoned) => *poisoned.into_inner() = params,
        }
    }

    /// Replace the test-mode position-sizing parameters. Values are
    /// assigned as given, no validation.
    pub fn configure_test_mode(&self, params: TestModeParams) {
        info!(
            capital = params.capital,
            base_position_pct = params.base_position_pct,
            "Test-mode parameters updated"
        );
        match self.test_mode.write() {
            Ok(mut guard) => *guard = params,
            Err(poisoned) => *poisoned.into_inner() = params,
        }
    }

    fn current_roi_params(&self) -> RoiParams {
        match self.roi_params.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn current_test_mode(&self) -> TestModeParams {
        match self.test_mode.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    // -- Cycle -------------------------------------------------------------

    /// Run one full update cycle. On success the state snapshot is
    /// replaced atomically and `Ok(true)` is returned; on failure the
    /// previous snapshot is left in place.
    pub async fn run_update_cycle(&self) -> Result<bool> {
        let started = Instant::now();

        let markets = self
            .market_source
            .fetch_markets()
            .await
            .with_context(|| format!("Market ingestion failed ({})", self.market_source.name()))?;

        let endpoints = self.endpoints_for_markets(&markets);
        let sources = self.monitor.poll_all(&endpoints, &self.base_keywords).await;

        let roi_params = self.current_roi_params();
        let opportunities =
            detector::detect_opportunities(&markets, &sources, &self.roi_cache, roi_params);
        let signals = signals::prioritize(signals::generate_signals(&opportunities));

        let accessible = sources.values().filter(|s| s.accessible).count();
        if accessible == 0 && !sources.is_empty() {
            warn!("All monitored sources inaccessible this cycle");
        }

        let cycle = self.cycle.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            engine = %self.name,
            cycle,
            markets = markets.len(),
            sources_accessible = accessible,
            sources_total = sources.len(),
            opportunities = opportunities.len(),
            signals = signals.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Update cycle complete"
        );

        self.state.replace(EngineSnapshot::new(
            markets,
            sources,
            opportunities,
            signals,
            cycle,
        ));

        Ok(true)
    }

    /// The poll list for this cycle: the catalog endpoints of every
    /// domain represented in the market set, URLs cited in the markets'
    /// own resolution-source text, and the configured extras,
    /// deduplicated in first-seen order. With no markets at all, the
    /// whole catalog is polled so source status stays fresh.
    fn endpoints_for_markets(&self, markets: &[Market]) -> Vec<String> {
        let mut endpoints: Vec<String> = if markets.is_empty() {
            self.catalog.all_endpoints()
        } else {
            Vec::new()
        };
        let mut seen_domains = Vec::new();

        for market in markets {
            for url in text::extract_urls(&market.resolution_source) {
                if !endpoints.contains(&url) {
                    endpoints.push(url);
                }
            }
            if seen_domains.contains(&market.domain) {
                continue;
            }
            seen_domains.push(market.domain);
            for url in self.catalog.endpoints_for(market.domain) {
                if !endpoints.contains(&url) {
                    endpoints.push(url);
                }
            }
        }
        for url in &self.extra_endpoints {
            if !endpoints.contains(url) {
                endpoints.push(url.clone());
            }
        }

        debug!(count = endpoints.len(), "Poll list assembled");
        endpoints
    }

    // -- Queries -----------------------------------------------------------

    pub fn markets_count(&self) -> usize {
        self.state.markets_count()
    }

    pub fn opportunities_count(&self) -> usize {
        self.state.opportunities_count()
    }

    pub fn signals_count(&self) -> usize {
        self.state.signals_count()
    }

    /// One-off ROI estimate under the engine's current parameters.
    /// Goes straight to the estimator; ad-hoc queries do not churn the
    /// cycle cache.
    pub fn estimate_roi(&self, current_price: f64) -> f64 {
        roi::estimate_roi(current_price, self.current_roi_params())
    }

    // -- Trading -----------------------------------------------------------

    /// Simulated trade execution under the test-mode parameters. The
    /// requested amount is clamped to the configured position band and
    /// the order that would have been placed is logged. Returns whether
    /// a trade was (nominally) executed.
    pub fn execute_trade(&self, market_id: &str, action: TradeAction, amount: f64) -> bool {
        if action.is_monitor() {
            debug!(market_id, "Monitor-only action, no trade");
            return false;
        }

        let params = self.current_test_mode();
        let size = amount.clamp(
            params.capital * params.min_position_pct,
            params.capital * params.max_position_pct,
        );

        info!(
            engine = %self.name,
            market_id,
            action = %action,
            requested = amount,
            size,
            "Trade executed (test mode)"
        );
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
