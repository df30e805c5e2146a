//! ROI estimation for binary prediction markets.
//!
//! A pure, total model: for any price in [0,1] it picks a side, applies
//! a heuristic slippage add, and returns the expected return after fees
//! and fixed costs. Fees apply to profit only (Polymarket convention).
//! There is no error path — out-of-range entry prices are clamped, not
//! rejected.

pub mod cache;

use std::fmt;

pub use crate::config::RoiParams;

/// Subjective probability that the underlying event resolves YES.
/// A fixed prior; the friction terms are configurable but this is not.
const PI_YES: f64 = 0.55;

/// Effective entry price is clamped to this realistic band.
const MIN_ENTRY_PRICE: f64 = 0.05;
const MAX_ENTRY_PRICE: f64 = 0.95;

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// Bet direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Yes,
    No,
}

impl Side {
    /// If the price is strictly below 50%, YES is the cheap side.
    /// Exactly 0.5 bets NO.
    pub fn for_price(current_price: f64) -> Self {
        if current_price < 0.5 {
            Side::Yes
        } else {
            Side::No
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Yes => write!(f, "YES"),
            Side::No => write!(f, "NO"),
        }
    }
}

// ---------------------------------------------------------------------------
// Estimator
// ---------------------------------------------------------------------------

/// Full estimator output, kept for structured logging.
#[derive(Debug, Clone, Copy)]
pub struct RoiBreakdown {
    pub side: Side,
    /// Effective entry price after slippage and clamping.
    pub entry_price: f64,
    /// Break-even YES-probability π* at which expected ROI is zero.
    pub break_even: f64,
    pub expected_profit: f64,
    pub roi: f64,
}

/// Expected return of betting on a market at `current_price` under the
/// given friction parameters. Signed; can be negative.
pub fn estimate_roi(current_price: f64, params: RoiParams) -> f64 {
    estimate_roi_detailed(current_price, params).roi
}

/// As [`estimate_roi`], exposing the intermediate quantities.
pub fn estimate_roi_detailed(current_price: f64, params: RoiParams) -> RoiBreakdown {
    let fee = params.fee;
    let g = params.fixed_cost;
    let slippage = params.catchup_speed * params.action_time;

    let side = Side::for_price(current_price);

    let raw_entry = match side {
        Side::Yes => current_price + slippage,
        Side::No => (1.0 - current_price) + slippage,
    };
    let p = raw_entry.clamp(MIN_ENTRY_PRICE, MAX_ENTRY_PRICE);

    // payout on a win is (1-p) per share, taxed by the fee; a loss
    // forfeits the stake p; g is paid either way.
    let (expected_profit, break_even) = match side {
        Side::Yes => {
            let profit = PI_YES * (1.0 - p) * (1.0 - fee) - (1.0 - PI_YES) * p - g;
            let pi_star = (p + g) / (p + (1.0 - p) * (1.0 - fee));
            (profit, pi_star)
        }
        Side::No => {
            let profit = (1.0 - PI_YES) * (1.0 - p) * (1.0 - fee) - PI_YES * p - g;
            let pi_star = 1.0 - (p + g) / (p + (1.0 - p) * (1.0 - fee));
            (profit, pi_star)
        }
    };

    RoiBreakdown {
        side,
        entry_price: p,
        break_even,
        expected_profit,
        roi: expected_profit / (p + g),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
