//! Signal generation and prioritization.
//!
//! Converts opportunities into trading signals, orders them by the
//! probabilistic ROI figure, collapses duplicates per market, and
//! promotes the single best actionable signal to executed status. The
//! whole pipeline is deterministic for a given input set.

use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info};

use crate::types::{ArbitrageOpportunity, TradeAction, TradingSignal};

/// Minimum v2 (probabilistic ROI, in percent) for a BUY signal.
const BUY_THRESHOLD: f64 = 2.0;

/// Minimum v2 for a SELL signal; below this the market is only watched.
const SELL_THRESHOLD: f64 = 0.5;

/// Flat execution-latency allowance charged to every signal.
const EXECUTION_TIME_MS: u64 = 1000;

/// Convert detected opportunities into trading signals, one per
/// opportunity, action from the v2 thresholds. Unordered; feed the
/// result through [`prioritize`].
pub fn generate_signals(opportunities: &[ArbitrageOpportunity]) -> Vec<TradingSignal> {
    let started = Instant::now();
    opportunities
        .iter()
        .map(|opp| to_signal(opp, started))
        .collect()
}

/// Order, deduplicate, and promote signals.
///
/// Steps, in order:
/// 1. sort by v2 descending (ties broken by market id, then source
///    URL, so reordering the input cannot change the outcome);
/// 2. keep only the first signal per market;
/// 3. mark the top-ranked non-MONITOR signal as executed.
pub fn prioritize(mut signals: Vec<TradingSignal>) -> Vec<TradingSignal> {
    signals.sort_by(|a, b| {
        b.v2.total_cmp(&a.v2)
            .then_with(|| a.market_id.cmp(&b.market_id))
            .then_with(|| a.source_url.cmp(&b.source_url))
    });

    let before = signals.len();
    let mut seen = HashSet::new();
    signals.retain(|s| seen.insert(s.market_id.clone()));
    if signals.len() < before {
        debug!(
            dropped = before - signals.len(),
            "Duplicate market signals collapsed"
        );
    }

    // Actions are monotone in v2 (higher v2 never maps to a weaker
    // action), so for pipeline-generated input the first non-monitor
    // signal is also the list head; `find` only differs for hand-built
    // inputs where a monitor outranks an actionable signal.
    if let Some(best) = signals.iter_mut().find(|s| !s.action.is_monitor()) {
        best.action = best.action.executed();
        info!(
            market_id = %best.market_id,
            action = %best.action,
            v2 = best.v2,
            "Top signal auto-executed"
        );
    }

    signals
}

fn to_signal(opp: &ArbitrageOpportunity, started: Instant) -> TradingSignal {
    let action = action_for(opp.potential_roi_v2);
    let reaction_time_ms = started.elapsed().as_millis() as u64;

    TradingSignal {
        market_id: opp.market_id.clone(),
        action,
        confidence: opp.confidence,
        v1: opp.potential_roi_v1,
        v2: opp.potential_roi_v2,
        source_url: opp.source_url.clone(),
        reason: opp.reason.clone(),
        reaction_time_ms,
        execution_time_ms: EXECUTION_TIME_MS,
        total_time_ms: reaction_time_ms + EXECUTION_TIME_MS,
        grade: "B".to_string(),
    }
}

fn action_for(v2: f64) -> TradeAction {
    if v2 > BUY_THRESHOLD {
        TradeAction::Buy
    } else if v2 > SELL_THRESHOLD {
        TradeAction::Sell
    } else {
        TradeAction::Monitor
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Confidence;
    use chrono::Utc;

    fn pipeline(opps: &[ArbitrageOpportunity]) -> Vec<TradingSignal> {
        prioritize(generate_signals(opps))
    }

    fn make_opp(market_id: &str, source_url: &str, v2: f64) -> ArbitrageOpportunity {
        ArbitrageOpportunity {
            market_id: market_id.to_string(),
            source_url: source_url.to_string(),
            relevance_score: 0.4,
            confidence: Confidence::Medium,
            reason: format!("Source {source_url} relevant to market (score: 0.40)"),
            potential_roi_v1: 20.0,
            potential_roi_v2: v2,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_action_thresholds() {
        assert_eq!(action_for(2.1), TradeAction::Buy);
        assert_eq!(action_for(2.0), TradeAction::Sell); // strict >
        assert_eq!(action_for(0.6), TradeAction::Sell);
        assert_eq!(action_for(0.5), TradeAction::Monitor); // strict >
        assert_eq!(action_for(-3.0), TradeAction::Monitor);
    }

    #[test]
    fn test_sorted_by_v2_descending() {
        let opps = vec![
            make_opp("m1", "https://a.example.com", 1.0),
            make_opp("m2", "https://b.example.com", 5.0),
            make_opp("m3", "https://c.example.com", 3.0),
        ];
        let signals = pipeline(&opps);
        let v2s: Vec<f64> = signals.iter().map(|s| s.v2).collect();
        assert_eq!(v2s, vec![5.0, 3.0, 1.0]);
    }

    #[test]
    fn test_dedup_keeps_best_per_market() {
        let opps = vec![
            make_opp("m1", "https://weak.example.com", 1.0),
            make_opp("m1", "https://strong.example.com", 4.0),
        ];
        let signals = pipeline(&opps);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].source_url, "https://strong.example.com");
        assert_eq!(signals[0].v2, 4.0);
    }

    #[test]
    fn test_tie_break_is_deterministic() {
        // Equal v2 for the same market: lower source URL wins, and the
        // result must not depend on input order.
        let forward = vec![
            make_opp("m1", "https://a.example.com", 3.0),
            make_opp("m1", "https://b.example.com", 3.0),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let from_forward = pipeline(&forward);
        let from_reversed = pipeline(&reversed);

        assert_eq!(from_forward.len(), 1);
        assert_eq!(from_forward[0].source_url, "https://a.example.com");
        assert_eq!(from_reversed[0].source_url, from_forward[0].source_url);
    }

    #[test]
    fn test_tie_break_across_markets() {
        let opps = vec![
            make_opp("m2", "https://x.example.com", 3.0),
            make_opp("m1", "https://x.example.com", 3.0),
        ];
        let signals = pipeline(&opps);
        assert_eq!(signals[0].market_id, "m1");
        assert_eq!(signals[1].market_id, "m2");
    }

    #[test]
    fn test_top_signal_auto_executed() {
        let opps = vec![
            make_opp("m1", "https://a.example.com", 5.0),
            make_opp("m2", "https://b.example.com", 3.0),
        ];
        let signals = pipeline(&opps);
        assert_eq!(signals[0].action, TradeAction::ExecutedBuy);
        assert_eq!(signals[0].action.to_string(), "EXECUTED_BUY");
        // Only the top one is promoted
        assert_eq!(signals[1].action, TradeAction::Buy);
    }

    #[test]
    fn test_sell_promotes_to_executed_sell() {
        let opps = vec![make_opp("m1", "https://a.example.com", 1.0)];
        let signals = pipeline(&opps);
        assert_eq!(signals[0].action, TradeAction::ExecutedSell);
    }

    #[test]
    fn test_monitor_never_executed() {
        let opps = vec![
            make_opp("m1", "https://a.example.com", 0.2),
            make_opp("m2", "https://b.example.com", -1.0),
        ];
        let signals = pipeline(&opps);
        assert_eq!(signals.len(), 2);
        assert!(signals.iter().all(|s| s.action == TradeAction::Monitor));
    }

    #[test]
    fn test_single_actionable_in_monitor_slate() {
        let opps = vec![
            make_opp("m1", "https://a.example.com", 0.4),
            make_opp("m2", "https://b.example.com", 0.3),
            make_opp("m3", "https://c.example.com", 1.5),
        ];
        let signals = pipeline(&opps);
        // m3 sorts first (1.5) and is executed
        assert_eq!(signals[0].market_id, "m3");
        assert_eq!(signals[0].action, TradeAction::ExecutedSell);
        assert_eq!(signals[1].action, TradeAction::Monitor);
    }

    #[test]
    fn test_prioritize_promotes_past_leading_monitor() {
        // The pipeline cannot produce a MONITOR outranking an
        // actionable signal, but a direct caller can; the promotion
        // must still land on the best actionable entry.
        fn raw_signal(market_id: &str, action: TradeAction, v2: f64) -> TradingSignal {
            TradingSignal {
                market_id: market_id.to_string(),
                action,
                confidence: Confidence::Medium,
                v1: 0.0,
                v2,
                source_url: "https://x.example.com".to_string(),
                reason: "test".to_string(),
                reaction_time_ms: 0,
                execution_time_ms: 1000,
                total_time_ms: 1000,
                grade: "B".to_string(),
            }
        }

        let signals = prioritize(vec![
            raw_signal("m1", TradeAction::Monitor, 10.0),
            raw_signal("m2", TradeAction::Buy, 5.0),
        ]);
        assert_eq!(signals[0].action, TradeAction::Monitor);
        assert_eq!(signals[1].action, TradeAction::ExecutedBuy);
    }

    #[test]
    fn test_timing_fields_consistent() {
        let opps = vec![make_opp("m1", "https://a.example.com", 5.0)];
        let signals = pipeline(&opps);
        let s = &signals[0];
        assert_eq!(s.execution_time_ms, EXECUTION_TIME_MS);
        assert_eq!(s.total_time_ms, s.reaction_time_ms + s.execution_time_ms);
        assert_eq!(s.grade, "B");
    }

    #[test]
    fn test_empty_input() {
        assert!(generate_signals(&[]).is_empty());
        assert!(prioritize(Vec::new()).is_empty());
    }
}
