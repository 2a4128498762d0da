//! Cache Statistics Module
//!
//! Tracks cache performance metrics and reports a diagnostic snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Cache Counters ==
/// Running counters kept by a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheCounters {
    /// Number of reads served from the store
    pub hits: u64,
    /// Number of reads that found nothing fresh
    pub misses: u64,
    /// Number of entries evicted for capacity
    pub evictions: u64,
    /// Number of entries removed by explicit invalidation
    pub invalidations: u64,
}

impl CacheCounters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    pub fn record_invalidations(&mut self, count: usize) {
        self.invalidations += count as u64;
    }
}

// == Cache Stats ==
/// Read-only snapshot of a cache instance, for diagnostics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Entries currently held, fresh or not
    pub size: usize,
    /// Entries still servable
    pub valid_entries: usize,
    /// Entries past expiry but not yet swept
    pub expired_entries: usize,
    /// Operations currently in flight
    pub pending_requests: usize,
    /// Configured ceiling
    pub max_size: usize,
    /// Configured default TTL in milliseconds
    pub ttl_ms: u64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub invalidations: u64,
    /// Wall-clock time the snapshot was taken
    pub captured_at: DateTime<Utc>,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
