//! Cache Statistics Module
//!
//! Tracks cache performance counters and builds statistics snapshots.

use serde::Serialize;

use crate::store::StoreStats;

// == Cache Counters ==
/// Per-instance operation counters.
///
/// Plain integers: a layer shared across threads must be wrapped in a lock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheCounters {
    /// Reads served from a live entry
    pub hits: u64,
    /// Reads that found nothing usable (absent, expired or corrupt)
    pub misses: u64,
    /// Entries written by `set` or `warm_cache`
    pub writes: u64,
    /// Entries removed by `delete` or `clear_expired`
    pub evictions: u64,
}

impl CacheCounters {
    // == Constructor ==
    /// Creates counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the hit rate as a percentage.
    ///
    /// Returns hits / (hits + misses) * 100, or 0.0 if no reads have been made.
    pub fn hit_rate_percent(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Writes ==
    /// Adds `count` entries to the write counter.
    pub fn record_writes(&mut self, count: u64) {
        self.writes += count;
    }

    // == Record Evictions ==
    /// Adds `count` entries to the eviction counter.
    pub fn record_evictions(&mut self, count: u64) {
        self.evictions += count;
    }
}

// == Cache Stats ==
/// Point-in-time statistics for a cache layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub evictions: u64,
    pub hit_rate_percent: f64,
    /// Metadata records present, including entries not yet lazily expired
    pub current_entries: usize,
    /// Sum of `size_bytes` over those records
    pub total_cached_size: usize,
    /// Engine metrics passed through from the store
    pub store: StoreStats,
}

impl CacheStats {
    /// Combines local counters with figures derived from the store.
    pub fn new(
        counters: &CacheCounters,
        current_entries: usize,
        total_cached_size: usize,
        store: StoreStats,
    ) -> Self {
        Self {
            hits: counters.hits,
            misses: counters.misses,
            writes: counters.writes,
            evictions: counters.evictions,
            hit_rate_percent: counters.hit_rate_percent(),
            current_entries,
            total_cached_size,
            store,
        }
    }
}
