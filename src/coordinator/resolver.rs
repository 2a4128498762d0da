//! Request Coordinator
//!
//! Resolves keys through the store, deduplicating concurrent misses so that
//! each key has at most one operation in flight.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, CacheStore, CascadeTable, InvalidationPattern};
use crate::config::CacheConfig;
use crate::coordinator::{PendingRegistry, ResolveOptions, SharedOutcome};
use crate::error::{CacheError, Result};

// == Cache State ==
/// Store and pending registry, guarded together by one lock.
struct CacheState<T> {
    store: CacheStore<T>,
    pending: PendingRegistry<T>,
}

// == Request Coordinator ==
/// A cache instance: a store paired with its pending request registry.
///
/// Cloning is cheap and yields a handle to the same instance.
pub struct RequestCoordinator<T> {
    name: Arc<str>,
    state: Arc<RwLock<CacheState<T>>>,
}

impl<T> Clone for RequestCoordinator<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> RequestCoordinator<T>
where
    T: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an empty instance named `name` for logging.
    pub fn new(name: impl Into<Arc<str>>, config: CacheConfig) -> Self {
        Self::with_cascade(name, config, CascadeTable::default())
    }

    /// Creates an empty instance with a custom cascade table.
    pub fn with_cascade(
        name: impl Into<Arc<str>>,
        config: CacheConfig,
        cascade: CascadeTable,
    ) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(RwLock::new(CacheState {
                store: CacheStore::with_cascade(config, cascade),
                pending: PendingRegistry::new(),
            })),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Resolve ==
    /// Returns the value for `key`, running `operation` only when needed.
    ///
    /// 1. Unless `skip_cache` is set, a fresh stored value is returned at once.
    /// 2. If an operation for `key` is already in flight, its outcome is
    ///    shared with this caller.
    /// 3. Otherwise `operation` is started and registered before anything is
    ///    awaited. On success the value is stored (with `options.ttl` if set).
    ///
    /// The operation runs on its own task, so it completes even if every
    /// caller stops waiting. Failures reach every waiting caller as
    /// `CacheError::Operation` and are never stored.
    pub async fn resolve<F, Fut>(
        &self,
        key: impl AsRef<str>,
        operation: F,
        options: ResolveOptions,
    ) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let key = key.as_ref();

        let outcome = {
            let mut state = self.state.write().await;

            if !options.skip_cache {
                if let Some(value) = state.store.get(key) {
                    debug!(cache = %self.name, key, "cache hit");
                    return Ok(value);
                }
            }

            match state.pending.get(key) {
                Some(outcome) => {
                    debug!(cache = %self.name, key, "joining in-flight request");
                    outcome
                }
                None => {
                    debug!(cache = %self.name, key, "cache miss, starting operation");
                    let id = state.pending.reserve_id();
                    let outcome = self.spawn_operation(key.to_string(), id, operation(), options.ttl);
                    state.pending.insert(key.to_string(), id, outcome.clone());
                    outcome
                }
            }
        };

        outcome.await
    }

    fn spawn_operation<Fut>(
        &self,
        key: String,
        id: u64,
        operation: Fut,
        ttl: Option<Duration>,
    ) -> SharedOutcome<T>
    where
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        let name = Arc::clone(&self.name);

        let handle = tokio::spawn(async move {
            let outcome = match AssertUnwindSafe(operation).catch_unwind().await {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(err)) => Err(CacheError::Operation(Arc::new(err))),
                Err(_) => Err(CacheError::Aborted("operation panicked".to_string())),
            };

            let mut state = state.write().await;
            let elapsed = state.pending.complete(&key, id);

            match (&outcome, elapsed) {
                (Ok(value), Some(elapsed)) => {
                    debug!(cache = %name, key = %key, ?elapsed, "operation succeeded, caching result");
                    state.store.set(key.clone(), value.clone(), ttl);
                }
                (Ok(_), None) => {
                    debug!(cache = %name, key = %key, "registration cleared in flight, result not cached");
                }
                (Err(err), _) => {
                    warn!(cache = %name, key = %key, error = %err, "operation failed");
                }
            }

            outcome
        });

        async move {
            match handle.await {
                Ok(outcome) => outcome,
                Err(err) => Err(CacheError::Aborted(err.to_string())),
            }
        }
        .boxed()
        .shared()
    }

    // == Store Pass-throughs ==
    /// Returns the fresh value stored under `key`, if any.
    pub async fn get(&self, key: impl AsRef<str>) -> Option<T> {
        self.state.write().await.store.get(key.as_ref())
    }

    /// Stores `value` under `key`, see `CacheStore::set`.
    pub async fn set(&self, key: impl Into<String>, value: T, ttl: Option<Duration>) {
        self.state.write().await.store.set(key, value, ttl);
    }

    /// Removes every stored key matching `pattern`.
    ///
    /// Operations already in flight are not affected and will store their
    /// result when they settle.
    pub async fn invalidate(&self, pattern: impl Into<InvalidationPattern>) -> usize {
        let pattern = pattern.into();
        let removed = self.state.write().await.store.invalidate(&pattern);
        if removed > 0 {
            info!(cache = %self.name, ?pattern, removed, "invalidated entries");
        }
        removed
    }

    /// Invalidates the families related to `key` by the cascade table.
    pub async fn invalidate_related(&self, key: impl AsRef<str>) -> usize {
        let key = key.as_ref();
        let removed = self.state.write().await.store.invalidate_related(key);
        if removed > 0 {
            info!(cache = %self.name, key, removed, "cascade invalidation");
        }
        removed
    }

    /// Drops every entry and every pending registration.
    ///
    /// Operations already running finish, but their results are not stored.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        let entries = state.store.len();
        state.store.clear();
        let pending = state.pending.clear();
        info!(cache = %self.name, entries, pending, "cache cleared");
    }

    /// Removes expired entries, returning how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        self.state.write().await.store.purge_expired()
    }

    /// Returns a diagnostic snapshot of the instance.
    pub async fn stats(&self) -> CacheStats {
        let state = self.state.read().await;
        let mut stats = state.store.stats();
        stats.pending_requests = state.pending.len();
        stats
    }

    /// Number of operations currently in flight.
    pub async fn pending_count(&self) -> usize {
        self.state.read().await.pending.len()
    }

    /// Remaining lifetime of the entry under `key`, if present and fresh.
    pub async fn ttl_remaining(&self, key: impl AsRef<str>) -> Option<Duration> {
        self.state.read().await.store.ttl_remaining(key.as_ref())
    }
}
