//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

/// Expiry used when `now + ttl` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 86_400);

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// When the entry was stored
    pub stored_at: Instant,
    /// When the entry stops being served
    pub expires_at: Instant,
    /// Insertion sequence number, breaks ties between equal timestamps
    pub seq: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` after `now`.
    ///
    /// A TTL too large to represent (e.g. `Duration::MAX` for "never") is
    /// capped at a far-future instant.
    pub fn new(value: T, now: Instant, ttl: Duration, seq: u64) -> Self {
        let expires_at = now.checked_add(ttl).unwrap_or_else(|| now + FAR_FUTURE);

        Self {
            value,
            stored_at: now,
            expires_at,
            seq,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is only served while its expiry is strictly in the future, so
    /// it is expired once `now >= expires_at`. A zero TTL is expired at birth.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Checks if the entry has expired at the current instant.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}
