//! Request Cache - a client-side request cache and deduplication layer
//!
//! Sits in front of network calls: holds short-lived copies of fetched data,
//! lets at most one request per key be in flight, and exposes pattern-based
//! invalidation so writes can evict stale reads.
//!
//! # Example
//! ```ignore
//! let policies = CachePolicies::<serde_json::Value>::new(&PoliciesConfig::default())?;
//! let profile = policies
//!     .user_profiles()
//!     .resolve("GET:/users/1", || fetch_user(1), ResolveOptions::default())
//!     .await?;
//! policies.user_profiles().invalidate("/users/1").await;
//! ```

pub mod cache;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod http;
pub mod policy;
pub mod tasks;

pub use cache::{CacheKey, CacheStats, CacheStore, CascadeTable, InvalidationPattern};
pub use config::{CacheConfig, PoliciesConfig};
pub use coordinator::{RequestCoordinator, ResolveOptions};
pub use error::{CacheError, Result};
pub use http::{FetchError, HttpFetcher, HttpRequest};
pub use policy::{CachePolicies, PolicyKind};
pub use tasks::spawn_cleanup_task;
