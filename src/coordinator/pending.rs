//! Pending Request Registry
//!
//! Tracks the single in-flight operation resolving each key.

use std::collections::HashMap;

use futures::future::{BoxFuture, Shared};
use tokio::time::Instant;

use crate::error::Result;

/// Outcome of an in-flight operation, awaitable by any number of callers.
pub type SharedOutcome<T> = Shared<BoxFuture<'static, Result<T>>>;

// == Pending Request ==
struct PendingRequest<T> {
    /// Registration id, distinguishes a re-registration after `clear`
    id: u64,
    started_at: Instant,
    outcome: SharedOutcome<T>,
}

// == Pending Registry ==
/// Maps a key to the operation currently resolving it.
///
/// Holds at most one registration per key. A registration is removed by
/// `complete` with its own id, so a stale completion never removes a newer
/// registration for the same key.
pub struct PendingRegistry<T> {
    requests: HashMap<String, PendingRequest<T>>,
    next_id: u64,
}

impl<T: Clone> PendingRegistry<T> {
    pub fn new() -> Self {
        Self {
            requests: HashMap::new(),
            next_id: 0,
        }
    }

    /// Returns the shared outcome of the operation in flight for `key`.
    pub fn get(&self, key: &str) -> Option<SharedOutcome<T>> {
        self.requests.get(key).map(|req| req.outcome.clone())
    }

    /// Hands out the id for the next registration.
    pub fn reserve_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Registers `outcome` as the in-flight operation for `key`.
    pub fn insert(&mut self, key: String, id: u64, outcome: SharedOutcome<T>) {
        self.requests.insert(
            key,
            PendingRequest {
                id,
                started_at: Instant::now(),
                outcome,
            },
        );
    }

    /// Removes the registration for `key` if it is still registration `id`.
    ///
    /// Returns how long the operation was in flight, or `None` when the
    /// registration had already been cleared or replaced.
    pub fn complete(&mut self, key: &str, id: u64) -> Option<std::time::Duration> {
        if !self.requests.get(key).is_some_and(|req| req.id == id) {
            return None;
        }
        self.requests
            .remove(key)
            .map(|req| req.started_at.elapsed())
    }

    /// Drops every registration. In-flight operations keep running.
    pub fn clear(&mut self) -> usize {
        let count = self.requests.len();
        self.requests.clear();
        count
    }

    #[allow(dead_code)]
    pub fn contains(&self, key: &str) -> bool {
        self.requests.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl<T: Clone> Default for PendingRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
