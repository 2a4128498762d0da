//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, bounded size and
//! pattern-based invalidation.

mod cascade;
mod entry;
mod key;
mod pattern;
mod stats;
mod store;


// Re-export public types
pub use cascade::{CascadeRule, CascadeTable};
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use pattern::InvalidationPattern;
pub use stats::{CacheCounters, CacheStats};
pub use store::CacheStore;
