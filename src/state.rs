//! Shared engine state.
//!
//! All cycle results live in one immutable snapshot behind a single
//! `RwLock<Arc<_>>`. A cycle builds its snapshot off to the side and
//! swaps it in atomically on success; readers always see a consistent
//! set of markets, sources, opportunities and signals, never a mix of
//! two cycles. A failed cycle swaps nothing, so the previous snapshot
//! stays serviceable.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::types::{ArbitrageOpportunity, Market, SourceData, TradingSignal};

/// Immutable result set of one completed update cycle.
#[derive(Debug, Default)]
pub struct EngineSnapshot {
    pub markets: Vec<Market>,
    pub sources: HashMap<String, SourceData>,
    pub opportunities: Vec<ArbitrageOpportunity>,
    pub signals: Vec<TradingSignal>,
    /// Cycle counter; 0 until the first successful cycle.
    pub cycle: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl EngineSnapshot {
    pub fn new(
        markets: Vec<Market>,
        sources: HashMap<String, SourceData>,
        opportunities: Vec<ArbitrageOpportunity>,
        signals: Vec<TradingSignal>,
        cycle: u64,
    ) -> Self {
        Self {
            markets,
            sources,
            opportunities,
            signals,
            cycle,
            updated_at: Some(Utc::now()),
        }
    }
}

/// Handle to the current snapshot. Cheap to clone and share across
/// tasks.
#[derive(Clone)]
pub struct SharedState {
    current: Arc<RwLock<Arc<EngineSnapshot>>>,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(EngineSnapshot::default()))),
        }
    }

    /// The current snapshot. The returned Arc stays valid even if a
    /// newer snapshot is swapped in while the caller holds it.
    pub fn load(&self) -> Arc<EngineSnapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            // A poisoned lock still holds a consistent Arc.
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Atomically replace the current snapshot.
    pub fn replace(&self, snapshot: EngineSnapshot) {
        let next = Arc::new(snapshot);
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    pub fn markets_count(&self) -> usize {
        self.load().markets.len()
    }

    pub fn opportunities_count(&self) -> usize {
        self.load().opportunities.len()
    }

    pub fn signals_count(&self) -> usize {
        self.load().signals.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
