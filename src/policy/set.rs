//! The application's set of named cache instances.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::cache::CacheStats;
use crate::config::PoliciesConfig;
use crate::coordinator::RequestCoordinator;
use crate::error::Result;
use crate::policy::PolicyKind;

/// One `RequestCoordinator` per `PolicyKind`.
///
/// Built once by the application's composition root and passed to the call
/// sites that need it. Instances are independent: invalidating one never
/// touches another, so a write must invalidate every instance whose cached
/// shapes embed the written data.
pub struct CachePolicies<T> {
    instances: HashMap<PolicyKind, RequestCoordinator<T>>,
}

impl<T> Clone for CachePolicies<T> {
    fn clone(&self) -> Self {
        Self {
            instances: self.instances.clone(),
        }
    }
}

impl<T> CachePolicies<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Builds every instance from `config`.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if any instance has `max_size == 0`.
    pub fn new(config: &PoliciesConfig) -> Result<Self> {
        config.validate()?;

        let instances = PolicyKind::ALL
            .into_iter()
            .map(|kind| {
                let cache_config = kind.config(config);
                debug!(
                    policy = %kind,
                    ttl_ms = cache_config.ttl().as_millis() as u64,
                    max_size = cache_config.max_size(),
                    "creating cache instance"
                );
                (kind, RequestCoordinator::new(kind.as_str(), cache_config))
            })
            .collect();

        info!(instances = PolicyKind::ALL.len(), "cache policies initialized");
        Ok(Self { instances })
    }

    /// Returns the instance for `kind`.
    pub fn get(&self, kind: PolicyKind) -> &RequestCoordinator<T> {
        // every kind is inserted by `new`
        &self.instances[&kind]
    }

    pub fn api(&self) -> &RequestCoordinator<T> {
        self.get(PolicyKind::Api)
    }

    pub fn user_profiles(&self) -> &RequestCoordinator<T> {
        self.get(PolicyKind::UserProfiles)
    }

    pub fn posts(&self) -> &RequestCoordinator<T> {
        self.get(PolicyKind::Posts)
    }

    pub fn follow_state(&self) -> &RequestCoordinator<T> {
        self.get(PolicyKind::FollowState)
    }

    pub fn notifications(&self) -> &RequestCoordinator<T> {
        self.get(PolicyKind::Notifications)
    }

    /// Clears every instance, e.g. on logout.
    pub async fn clear_all(&self) {
        for kind in PolicyKind::ALL {
            self.get(kind).clear().await;
        }
    }

    /// Sweeps expired entries from every instance.
    pub async fn purge_expired_all(&self) -> usize {
        let mut removed = 0;
        for kind in PolicyKind::ALL {
            removed += self.get(kind).purge_expired().await;
        }
        removed
    }

    /// Snapshots every instance.
    pub async fn stats_all(&self) -> Vec<(PolicyKind, CacheStats)> {
        let mut stats = Vec::with_capacity(PolicyKind::ALL.len());
        for kind in PolicyKind::ALL {
            stats.push((kind, self.get(kind).stats().await));
        }
        stats
    }
}
