//! Market ingestion.
//!
//! Fetches the market list from an upstream listing API (Polymarket
//! Gamma) and maps it into the engine's read-only `Market` records.
//! Markets are classified and have their resolution-source reference
//! extracted at ingest time; the core never mutates them afterwards.
//!
//! API: `https://gamma-api.polymarket.com/markets`
//! Auth: Not required for reading.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::http::HttpFetch;
use crate::text;
use crate::types::{EngineError, Market};

// ---------------------------------------------------------------------------
// Abstraction
// ---------------------------------------------------------------------------

/// Upstream producer of the market list.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Fetch all currently open markets.
    async fn fetch_markets(&self) -> Result<Vec<Market>>;

    /// Source name for logging and identification.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Gamma API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GammaResponse {
    #[serde(default)]
    markets: Vec<GammaMarket>,
}

#[derive(Debug, Deserialize)]
struct GammaMarket {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    description: Option<String>,
    /// Current YES probability (0.0–1.0).
    #[serde(default)]
    probability: Option<f64>,
    /// "open", "closed", "resolved".
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    resolution_source: Option<String>,
}

// ---------------------------------------------------------------------------
// Gamma client
// ---------------------------------------------------------------------------

/// Market-listing client for the Polymarket Gamma API.
pub struct GammaClient {
    http: Arc<dyn HttpFetch>,
    base_url: String,
    limit: u32,
}

impl GammaClient {
    pub fn new(http: Arc<dyn HttpFetch>, base_url: String, limit: u32) -> Self {
        Self {
            http,
            base_url,
            limit,
        }
    }

    /// Map one Gamma record into an engine `Market`, or None if the
    /// record is incomplete or not open.
    fn to_market(raw: &GammaMarket) -> Option<Market> {
        let id = raw.id.as_deref()?;
        let question = raw.question.as_deref()?;
        let probability = raw.probability?;

        if raw.status.as_deref() != Some("open") {
            return None;
        }

        let description = raw.description.as_deref().unwrap_or("");
        let domain = text::categorize_market_domain(question, description);

        // Prefer the explicit API field, fall back to the description text.
        let resolution_source = raw
            .resolution_source
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| text::extract_resolution_source(description))
            .unwrap_or_default();

        Some(Market {
            id: id.to_string(),
            question: question.to_string(),
            description: description.to_string(),
            domain,
            probability: probability.clamp(0.0, 1.0),
            resolution_source,
            last_update: Utc::now(),
        })
    }
}

#[async_trait]
impl MarketSource for GammaClient {
    async fn fetch_markets(&self) -> Result<Vec<Market>> {
        let url = format!("{}?limit={}", self.base_url, self.limit);
        let body = self.http.get(&url).await;

        if body.is_empty() {
            return Err(EngineError::Ingest {
                source_name: self.name().to_string(),
                message: "empty response from listing API".to_string(),
            }
            .into());
        }

        let parsed: GammaResponse = serde_json::from_str(&body)
            .context("Failed to parse market listing response")?;

        let markets: Vec<Market> = parsed
            .markets
            .iter()
            .filter_map(GammaClient::to_market)
            .collect();

        let skipped = parsed.markets.len() - markets.len();
        if skipped > 0 {
            debug!(skipped, "Skipped incomplete or non-open markets");
        }

        info!(count = markets.len(), "Markets ingested");
        Ok(markets)
    }

    fn name(&self) -> &str {
        "gamma"
    }
}

// ---------------------------------------------------------------------------
// Static source
// ---------------------------------------------------------------------------

/// Fixed in-memory market list. Used for offline runs and as a
/// deterministic source in tests.
pub struct StaticMarketSource {
    markets: Vec<Market>,
}

impl StaticMarketSource {
    pub fn new(markets: Vec<Market>) -> Self {
        Self { markets }
    }
}

#[async_trait]
impl MarketSource for StaticMarketSource {
    async fn fetch_markets(&self) -> Result<Vec<Market>> {
        if self.markets.is_empty() {
            warn!("Static market source is empty");
        }
        Ok(self.markets.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
