//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with TTL expiration,
//! insertion-order capacity eviction and pattern invalidation.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheCounters, CacheEntry, CacheStats, CascadeTable, InvalidationPattern};
use crate::config::CacheConfig;

// == Cache Store ==
/// Key/value storage with per-entry expiry and a bounded entry count.
///
/// The store is a plain single-owner structure; callers that share it across
/// tasks wrap it in a lock (see `RequestCoordinator`).
#[derive(Debug)]
pub struct CacheStore<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Store configuration
    config: CacheConfig,
    /// Cascade rules used by `invalidate_related`
    cascade: CascadeTable,
    /// Running counters
    counters: CacheCounters,
    /// Next insertion sequence number
    next_seq: u64,
}

impl<T: Clone> CacheStore<T> {
    // == Constructor ==
    /// Creates an empty store with the default cascade table.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_cascade(config, CascadeTable::default())
    }

    /// Creates an empty store with a custom cascade table.
    pub fn with_cascade(config: CacheConfig, cascade: CascadeTable) -> Self {
        Self {
            entries: HashMap::new(),
            config,
            cascade,
            counters: CacheCounters::default(),
            next_seq: 0,
        }
    }

    // == Get ==
    /// Returns the value stored under `key` if it has not expired.
    ///
    /// `None` means not found; a cached value that is itself "empty" (for
    /// example `serde_json::Value::Null`) is still returned as `Some`.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired_at(now) {
                let value = entry.value.clone();
                self.counters.record_hit();
                return Some(value);
            }
            // Lazily drop the stale entry
            self.entries.remove(key);
        }

        self.counters.record_miss();
        None
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any prior entry.
    ///
    /// Expiry is `now + ttl` (capped far in the future when that overflows),
    /// falling back to the configured TTL. The insert is
    /// followed by a cleanup pass: expired entries are dropped, then the oldest
    /// insertions are evicted until the store fits `max_size`.
    pub fn set(&mut self, key: impl Into<String>, value: T, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.config.ttl());
        let seq = self.next_seq;
        self.next_seq += 1;

        let entry = CacheEntry::new(value, Instant::now(), ttl, seq);
        self.entries.insert(key.into(), entry);

        self.cleanup();
    }

    // == Invalidate ==
    /// Removes every key selected by `pattern`, fresh or not.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate(&mut self, pattern: &InvalidationPattern) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !pattern.matches(key));
        let removed = before - self.entries.len();

        self.counters.record_invalidations(removed);
        debug!(?pattern, removed, "invalidated cache entries");
        removed
    }

    // == Invalidate Related ==
    /// Invalidates the families the cascade table lists for `key`.
    ///
    /// Only the first matching rule is applied. Returns the total number of
    /// entries removed.
    pub fn invalidate_related(&mut self, key: &str) -> usize {
        let related: Vec<String> = match self.cascade.related_to(key) {
            Some(related) => related.to_vec(),
            None => return 0,
        };

        related
            .into_iter()
            .map(|fragment| self.invalidate(&InvalidationPattern::Substring(fragment)))
            .sum()
    }

    // == Clear ==
    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Stats ==
    /// Returns a snapshot of the store. Pending requests are filled in by the
    /// owner of the pending registry.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let expired_entries = self
            .entries
            .values()
            .filter(|entry| entry.is_expired_at(now))
            .count();

        CacheStats {
            size: self.entries.len(),
            valid_entries: self.entries.len() - expired_entries,
            expired_entries,
            pending_requests: 0,
            max_size: self.config.max_size(),
            ttl_ms: self.config.ttl().as_millis() as u64,
            hits: self.counters.hits,
            misses: self.counters.misses,
            evictions: self.counters.evictions,
            invalidations: self.counters.invalidations,
            captured_at: Utc::now(),
        }
    }

    // == Purge Expired ==
    /// Removes all expired entries.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - self.entries.len()
    }

    /// Remaining lifetime of the entry under `key`, if present and fresh.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.ttl_remaining())
    }

    /// Keys currently held, fresh or not.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Length ==
    /// Returns the current number of entries, including unswept expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Cleanup ==
    fn cleanup(&mut self) {
        self.purge_expired();

        let excess = self.entries.len().saturating_sub(self.config.max_size());
        if excess == 0 {
            return;
        }

        let mut order: Vec<(Instant, u64, String)> = self
            .entries
            .iter()
            .map(|(key, entry)| (entry.stored_at, entry.seq, key.clone()))
            .collect();
        order.sort_unstable();

        for (_, _, key) in order.into_iter().take(excess) {
            self.entries.remove(&key);
        }

        self.counters.record_evictions(excess);
        debug!(evicted = excess, max_size = self.config.max_size(), "evicted oldest entries");
    }
}
