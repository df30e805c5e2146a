//! Arbitrage opportunity detection.
//!
//! Correlates each market's extracted keywords against every accessible
//! source's found keywords. Each (market keyword, source keyword) pair
//! where the source keyword contains the market keyword adds a fixed
//! relevance increment; pairs above the relevance floor become
//! opportunities carrying both ROI figures.

use chrono::Utc;
use std::collections::HashMap;
use tracing::debug;

use crate::roi::cache::RoiCache;
use crate::roi::RoiParams;
use crate::text;
use crate::types::{ArbitrageOpportunity, Confidence, Market, SourceData};

/// Relevance added per matching keyword pair.
const RELEVANCE_INCREMENT: f64 = 0.2;

/// Minimum relevance for a (market, source) pair to become an opportunity.
const RELEVANCE_FLOOR: f64 = 0.05;

/// Detect opportunities across every (market, accessible source) pair.
///
/// Inaccessible sources are skipped entirely — no opportunities, no
/// errors. Empty inputs produce an empty list.
pub fn detect_opportunities(
    markets: &[Market],
    sources: &HashMap<String, SourceData>,
    roi_cache: &RoiCache,
    roi_params: RoiParams,
) -> Vec<ArbitrageOpportunity> {
    let mut opportunities = Vec::new();

    for market in markets {
        let market_keywords = text::extract_market_keywords(&market.question, &market.description);
        if market_keywords.is_empty() {
            continue;
        }

        for (url, source) in sources {
            if !source.accessible {
                continue;
            }

            let relevance = relevance_score(&market_keywords, &source.found_keywords);
            if relevance <= RELEVANCE_FLOOR {
                continue;
            }

            let roi = roi_cache.get_or_compute(market.probability, roi_params);

            let opportunity = ArbitrageOpportunity {
                market_id: market.id.clone(),
                source_url: url.clone(),
                relevance_score: relevance,
                confidence: Confidence::from_relevance(relevance),
                reason: format!("Source {url} relevant to market (score: {relevance:.2})"),
                potential_roi_v1: (0.5 - market.probability).abs() * 100.0,
                potential_roi_v2: roi * 100.0,
                created_at: Utc::now(),
            };

            debug!(
                market_id = %market.id,
                source = %url,
                relevance,
                roi_v2 = opportunity.potential_roi_v2,
                "Opportunity detected"
            );

            opportunities.push(opportunity);
        }
    }

    opportunities
}

/// Additive relevance over keyword pairs: every source keyword that
/// contains a market keyword as a substring counts once. Monotonically
/// non-decreasing in the number of matching pairs.
fn relevance_score(market_keywords: &[String], source_keywords: &[String]) -> f64 {
    let mut relevance = 0.0;
    for market_kw in market_keywords {
        for source_kw in source_keywords {
            if source_kw.contains(market_kw.as_str()) {
                relevance += RELEVANCE_INCREMENT;
            }
        }
    }
    relevance
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
