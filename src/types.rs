//! Shared types for the ARGUS engine.
//!
//! These types form the data model used across all modules.
//! Markets are read-only to the core; source snapshots, opportunities,
//! and signals are ephemeral — rebuilt wholesale every update cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Market
// ---------------------------------------------------------------------------

/// A binary-outcome prediction market with a current implied probability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    pub id: String,
    pub question: String,
    pub description: String,
    pub domain: MarketDomain,
    /// Current YES probability (0.0–1.0)
    pub probability: f64,
    /// Free-text resolution-source reference extracted from the description
    pub resolution_source: String,
    pub last_update: DateTime<Utc>,
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({:.0}%)",
            self.domain,
            self.question,
            self.probability * 100.0,
        )
    }
}

impl Market {
    /// Helper to build a test/sample market with sensible defaults.
    #[cfg(test)]
    pub fn sample() -> Self {
        Market {
            id: "test-001".to_string(),
            question: "Will the Fed cut interest rates in Q1?".to_string(),
            description: "Resolves YES if the FOMC announces a rate cut. \
                          Resolution source: federalreserve.gov"
                .to_string(),
            domain: MarketDomain::Economy,
            probability: 0.30,
            resolution_source: "resolution source: federalreserve.gov".to_string(),
            last_update: Utc::now(),
        }
    }
}

/// Classification tag routing a market to its relevant resolution sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketDomain {
    Politics,
    Crypto,
    Economy,
    Sports,
    Health,
    Other,
}

impl MarketDomain {
    /// All known domains (useful for iteration).
    pub const ALL: &'static [MarketDomain] = &[
        MarketDomain::Politics,
        MarketDomain::Crypto,
        MarketDomain::Economy,
        MarketDomain::Sports,
        MarketDomain::Health,
        MarketDomain::Other,
    ];
}

impl fmt::Display for MarketDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketDomain::Politics => write!(f, "politics"),
            MarketDomain::Crypto => write!(f, "crypto"),
            MarketDomain::Economy => write!(f, "economy"),
            MarketDomain::Sports => write!(f, "sports"),
            MarketDomain::Health => write!(f, "health"),
            MarketDomain::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for MarketDomain {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "politics" | "political" => Ok(MarketDomain::Politics),
            "crypto" | "cryptocurrency" => Ok(MarketDomain::Crypto),
            "economy" | "economics" | "econ" => Ok(MarketDomain::Economy),
            "sports" | "sport" => Ok(MarketDomain::Sports),
            "health" => Ok(MarketDomain::Health),
            "other" => Ok(MarketDomain::Other),
            _ => Err(anyhow::anyhow!("Unknown market domain: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Source data
// ---------------------------------------------------------------------------

/// Result of polling one resolution-source endpoint.
///
/// One instance per monitored endpoint per cycle; replaced wholesale,
/// never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceData {
    pub url: String,
    pub accessible: bool,
    pub content_length: usize,
    /// Keywords found in the body. Order reflects scan order only.
    pub found_keywords: Vec<String>,
    pub error: Option<String>,
    pub last_check: DateTime<Utc>,
}

impl SourceData {
    /// Build an inaccessible record carrying the failure reason.
    pub fn inaccessible(url: &str, error: &str) -> Self {
        SourceData {
            url: url.to_string(),
            accessible: false,
            content_length: 0,
            found_keywords: Vec::new(),
            error: Some(error.to_string()),
            last_check: Utc::now(),
        }
    }
}

impl fmt::Display for SourceData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.accessible {
            write!(
                f,
                "{} ({} chars, {} keywords)",
                self.url,
                self.content_length,
                self.found_keywords.len(),
            )
        } else {
            write!(
                f,
                "{} (inaccessible: {})",
                self.url,
                self.error.as_deref().unwrap_or("unknown"),
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Confidence tiers
// ---------------------------------------------------------------------------

/// Confidence tier derived from the relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Tier thresholds: > 0.7 high, > 0.3 medium, else low.
    pub fn from_relevance(relevance: f64) -> Self {
        if relevance > 0.7 {
            Confidence::High
        } else if relevance > 0.3 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

// ---------------------------------------------------------------------------
// Arbitrage opportunity
// ---------------------------------------------------------------------------

/// A (market, source) pair judged relevant via keyword correlation.
///
/// Ephemeral — recomputed every cycle, never persisted across cycles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    pub market_id: String,
    pub source_url: String,
    /// Additive relevance score, unbounded above.
    pub relevance_score: f64,
    pub confidence: Confidence,
    pub reason: String,
    /// Naive baseline: |0.5 - probability| × 100.
    pub potential_roi_v1: f64,
    /// Primary signal: estimator ROI × 100.
    pub potential_roi_v2: f64,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for ArbitrageOpportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ← {} (score={:.2}, conf={}, roi={:.1}%)",
            self.market_id,
            self.source_url,
            self.relevance_score,
            self.confidence,
            self.potential_roi_v2,
        )
    }
}

// ---------------------------------------------------------------------------
// Trading signal
// ---------------------------------------------------------------------------

/// Action recommendation derived from an opportunity's ROI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeAction {
    Monitor,
    Buy,
    Sell,
    ExecutedBuy,
    ExecutedSell,
}

impl TradeAction {
    /// The executed variant of this action. Monitor never executes.
    pub fn executed(self) -> Self {
        match self {
            TradeAction::Buy => TradeAction::ExecutedBuy,
            TradeAction::Sell => TradeAction::ExecutedSell,
            other => other,
        }
    }

    pub fn is_executed(&self) -> bool {
        matches!(self, TradeAction::ExecutedBuy | TradeAction::ExecutedSell)
    }

    pub fn is_monitor(&self) -> bool {
        matches!(self, TradeAction::Monitor)
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Monitor => write!(f, "MONITOR"),
            TradeAction::Buy => write!(f, "BUY"),
            TradeAction::Sell => write!(f, "SELL"),
            TradeAction::ExecutedBuy => write!(f, "EXECUTED_BUY"),
            TradeAction::ExecutedSell => write!(f, "EXECUTED_SELL"),
        }
    }
}

impl std::str::FromStr for TradeAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MONITOR" => Ok(TradeAction::Monitor),
            "BUY" => Ok(TradeAction::Buy),
            "SELL" => Ok(TradeAction::Sell),
            "EXECUTED_BUY" => Ok(TradeAction::ExecutedBuy),
            "EXECUTED_SELL" => Ok(TradeAction::ExecutedSell),
            _ => Err(anyhow::anyhow!("Unknown trade action: {s}")),
        }
    }
}

/// One actionable recommendation per surviving opportunity.
///
/// Ephemeral, one per market after deduplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingSignal {
    pub market_id: String,
    pub action: TradeAction,
    pub confidence: Confidence,
    /// Naive baseline ROI, carried over from the opportunity.
    pub v1: f64,
    /// Estimator ROI; the sort key for prioritization.
    pub v2: f64,
    pub source_url: String,
    pub reason: String,
    /// Decision latency in milliseconds.
    pub reaction_time_ms: u64,
    /// Fixed execution-time estimate in milliseconds.
    pub execution_time_ms: u64,
    /// reaction + execution.
    pub total_time_ms: u64,
    /// Quality grade — fixed placeholder for all signals.
    pub grade: String,
}

impl fmt::Display for TradingSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (conf={}, roi={:.1}%, {}ms)",
            self.action,
            self.market_id,
            self.confidence,
            self.v2,
            self.total_time_ms,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for ARGUS. Source polling failures are
/// data (`SourceData::error`), not errors; only ingest and
/// configuration problems abort anything.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Ingest error ({source_name}): {message}")]
    Ingest { source_name: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- MarketDomain tests --

    #[test]
    fn test_domain_display() {
        assert_eq!(format!("{}", MarketDomain::Politics), "politics");
        assert_eq!(format!("{}", MarketDomain::Economy), "economy");
        assert_eq!(format!("{}", MarketDomain::Other), "other");
    }

    #[test]
    fn test_domain_from_str() {
        assert_eq!("politics".parse::<MarketDomain>().unwrap(), MarketDomain::Politics);
        assert_eq!("CRYPTO".parse::<MarketDomain>().unwrap(), MarketDomain::Crypto);
        assert_eq!("econ".parse::<MarketDomain>().unwrap(), MarketDomain::Economy);
        assert!("nonsense".parse::<MarketDomain>().is_err());
    }

    #[test]
    fn test_domain_serialization_roundtrip() {
        for domain in MarketDomain::ALL {
            let json = serde_json::to_string(domain).unwrap();
            let parsed: MarketDomain = serde_json::from_str(&json).unwrap();
            assert_eq!(*domain, parsed);
        }
    }

    // -- Confidence tests --

    #[test]
    fn test_confidence_tiers() {
        assert_eq!(Confidence::from_relevance(0.71), Confidence::High);
        assert_eq!(Confidence::from_relevance(0.70), Confidence::Medium);
        assert_eq!(Confidence::from_relevance(0.31), Confidence::Medium);
        assert_eq!(Confidence::from_relevance(0.30), Confidence::Low);
        assert_eq!(Confidence::from_relevance(0.06), Confidence::Low);
    }

    #[test]
    fn test_confidence_display() {
        assert_eq!(format!("{}", Confidence::High), "high");
        assert_eq!(format!("{}", Confidence::Low), "low");
    }

    // -- TradeAction tests --

    #[test]
    fn test_action_display() {
        assert_eq!(format!("{}", TradeAction::Monitor), "MONITOR");
        assert_eq!(format!("{}", TradeAction::ExecutedBuy), "EXECUTED_BUY");
    }

    #[test]
    fn test_action_executed_variant() {
        assert_eq!(TradeAction::Buy.executed(), TradeAction::ExecutedBuy);
        assert_eq!(TradeAction::Sell.executed(), TradeAction::ExecutedSell);
        // Monitor never gains an executed marker
        assert_eq!(TradeAction::Monitor.executed(), TradeAction::Monitor);
    }

    #[test]
    fn test_action_predicates() {
        assert!(TradeAction::ExecutedBuy.is_executed());
        assert!(!TradeAction::Buy.is_executed());
        assert!(TradeAction::Monitor.is_monitor());
        assert!(!TradeAction::Sell.is_monitor());
    }

    #[test]
    fn test_action_from_str_roundtrip() {
        for action in [
            TradeAction::Monitor,
            TradeAction::Buy,
            TradeAction::Sell,
            TradeAction::ExecutedBuy,
            TradeAction::ExecutedSell,
        ] {
            let s = format!("{action}");
            assert_eq!(s.parse::<TradeAction>().unwrap(), action);
        }
        assert!("HOLD".parse::<TradeAction>().is_err());
    }

    // -- SourceData tests --

    #[test]
    fn test_source_data_inaccessible() {
        let data = SourceData::inaccessible("https://example.com", "Empty response");
        assert!(!data.accessible);
        assert_eq!(data.content_length, 0);
        assert!(data.found_keywords.is_empty());
        assert_eq!(data.error.as_deref(), Some("Empty response"));
    }

    #[test]
    fn test_source_data_display() {
        let data = SourceData::inaccessible("https://example.com", "timeout");
        let display = format!("{data}");
        assert!(display.contains("inaccessible"));
        assert!(display.contains("timeout"));
    }

    // -- Market tests --

    #[test]
    fn test_market_serialization_roundtrip() {
        let market = Market::sample();
        let json = serde_json::to_string(&market).unwrap();
        let parsed: Market = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, "test-001");
        assert_eq!(parsed.domain, MarketDomain::Economy);
        assert!((parsed.probability - 0.30).abs() < 1e-10);
    }

    #[test]
    fn test_market_display() {
        let market = Market::sample();
        let display = format!("{market}");
        assert!(display.contains("economy"));
        assert!(display.contains("30%"));
    }

    // -- Signal tests --

    #[test]
    fn test_signal_display() {
        let signal = TradingSignal {
            market_id: "m1".to_string(),
            action: TradeAction::Buy,
            confidence: Confidence::High,
            v1: 20.0,
            v2: 70.4,
            source_url: "https://example.com".to_string(),
            reason: "test".to_string(),
            reaction_time_ms: 1,
            execution_time_ms: 1000,
            total_time_ms: 1001,
            grade: "B".to_string(),
        };
        let display = format!("{signal}");
        assert!(display.contains("BUY"));
        assert!(display.contains("70.4%"));
    }

    // -- EngineError tests --

    #[test]
    fn test_engine_error_display() {
        let e = EngineError::Ingest {
            source_name: "gamma".to_string(),
            message: "empty response".to_string(),
        };
        assert_eq!(format!("{e}"), "Ingest error (gamma): empty response");
    }
}
