//! Bounded memoization in front of the ROI estimator.
//!
//! Keys are bit-exact over the full estimator input tuple; there is no
//! tolerance matching. The eviction policy is a wholesale clear once the
//! bound is reached — crude, but O(1) and memory-bounded. Callers hold
//! the lock only for lookup and insert; never while holding any state
//! lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use super::{estimate_roi, RoiParams};

/// Composite key over the price and every friction parameter,
/// compared by exact bit patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoiKey([u64; 5]);

impl RoiKey {
    pub fn new(current_price: f64, params: RoiParams) -> Self {
        RoiKey([
            current_price.to_bits(),
            params.fee.to_bits(),
            params.catchup_speed.to_bits(),
            params.action_time.to_bits(),
            params.fixed_cost.to_bits(),
        ])
    }
}

/// Memoization layer over [`estimate_roi`].
pub struct RoiCache {
    entries: Mutex<HashMap<RoiKey, f64>>,
    max_entries: usize,
    /// Number of estimator invocations (cache misses).
    computed: AtomicU64,
}

impl RoiCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries,
            computed: AtomicU64::new(0),
        }
    }

    // The map stays internally consistent even if a panic poisons the
    // lock; recover the guard rather than propagating the poison.
    fn entries(&self) -> MutexGuard<'_, HashMap<RoiKey, f64>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Return the memoized ROI for this input tuple, computing and
    /// storing it on a miss. When the map has reached the bound it is
    /// cleared in full before the new entry is inserted.
    pub fn get_or_compute(&self, current_price: f64, params: RoiParams) -> f64 {
        let key = RoiKey::new(current_price, params);

        if let Some(&roi) = self.entries().get(&key) {
            return roi;
        }

        // Miss: compute outside the lock — the estimator is cheap and
        // a duplicate computation under contention is harmless.
        let roi = estimate_roi(current_price, params);
        self.computed.fetch_add(1, Ordering::Relaxed);

        let mut entries = self.entries();
        if entries.len() >= self.max_entries {
            debug!(size = entries.len(), "ROI cache full, resetting");
            entries.clear();
        }
        entries.insert(key, roi);

        roi
    }

    /// Current entry count.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times the estimator has actually run.
    pub fn computed_count(&self) -> u64 {
        self.computed.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_skips_recomputation() {
        let cache = RoiCache::new(100);
        let params = RoiParams::default();

        let first = cache.get_or_compute(0.30, params);
        let second = cache.get_or_compute(0.30, params);

        assert_eq!(first.to_bits(), second.to_bits());
        assert_eq!(cache.computed_count(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_tuples_miss() {
        let cache = RoiCache::new(100);
        let params = RoiParams::default();

        cache.get_or_compute(0.30, params);
        cache.get_or_compute(0.31, params);

        let mut other_fee = params;
        other_fee.fee = 0.02;
        cache.get_or_compute(0.30, other_fee);

        assert_eq!(cache.computed_count(), 3);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_every_param_is_part_of_the_key() {
        // Each friction parameter alone must produce a fresh entry; a
        // stale hit here would serve an ROI computed under old params.
        let cache = RoiCache::new(100);
        let base = RoiParams::default();
        let baseline = cache.get_or_compute(0.30, base);

        let mut costly = base;
        costly.fixed_cost = 0.05;
        let recomputed = cache.get_or_compute(0.30, costly);

        assert_eq!(cache.computed_count(), 2);
        assert_ne!(baseline.to_bits(), recomputed.to_bits());
        assert_eq!(recomputed.to_bits(), estimate_roi(0.30, costly).to_bits());

        let mut slow = base;
        slow.action_time = 0.1;
        cache.get_or_compute(0.30, slow);
        let mut volatile = base;
        volatile.catchup_speed = 2.0;
        cache.get_or_compute(0.30, volatile);

        assert_eq!(cache.computed_count(), 4);
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn test_exact_key_no_tolerance() {
        let cache = RoiCache::new(100);
        let params = RoiParams::default();

        cache.get_or_compute(0.30, params);
        cache.get_or_compute(0.30 + 1e-15, params);

        // Even an ulp-scale difference is a different key
        assert_eq!(cache.computed_count(), 2);
    }

    #[test]
    fn test_full_clear_at_bound() {
        let cache = RoiCache::new(10);
        let params = RoiParams::default();

        for i in 0..10 {
            cache.get_or_compute(i as f64 / 100.0, params);
            assert!(cache.len() <= 10);
        }
        assert_eq!(cache.len(), 10);

        // Next insert triggers the wholesale reset first
        cache.get_or_compute(0.99, params);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.computed_count(), 11);
    }

    #[test]
    fn test_size_never_exceeds_bound() {
        let cache = RoiCache::new(8);
        let params = RoiParams::default();
        for i in 0..100 {
            cache.get_or_compute(i as f64 / 1000.0, params);
            assert!(cache.len() <= 8, "cache grew past bound at insert {i}");
        }
    }

    #[test]
    fn test_matches_estimator() {
        let cache = RoiCache::new(100);
        let params = RoiParams::default();
        let cached = cache.get_or_compute(0.42, params);
        let direct = estimate_roi(0.42, params);
        assert_eq!(cached.to_bits(), direct.to_bits());
    }

    #[test]
    fn test_concurrent_access() {
        use std::sync::Arc;

        let cache = Arc::new(RoiCache::new(1000));
        let params = RoiParams::default();

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let price = ((t * 100 + i) % 50) as f64 / 100.0;
                        let roi = cache.get_or_compute(price, params);
                        assert!(roi.is_finite());
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }
        assert!(cache.len() <= 1000);
    }
}
