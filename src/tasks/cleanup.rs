//! TTL Cleanup Task
//!
//! Background task that periodically removes expired entries from every
//! policy instance.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::policy::CachePolicies;

/// Spawns a background task that periodically sweeps expired entries.
///
/// Stores already sweep on every write; this keeps rarely-written instances
/// from holding dead entries. The returned handle is aborted by the owner on
/// shutdown.
///
/// # Example
/// ```ignore
/// let policies = CachePolicies::<serde_json::Value>::new(&config)?;
/// let cleanup_handle = spawn_cleanup_task(policies.clone(), config.cleanup_interval);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<T>(policies: CachePolicies<T>, interval: Duration) -> JoinHandle<()>
where
    T: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "starting TTL cleanup task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = policies.purge_expired_all().await;

            if removed > 0 {
                info!(removed, "TTL cleanup: removed expired entries");
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
