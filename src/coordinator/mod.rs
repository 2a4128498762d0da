//! Request Coordinator Module
//!
//! Wraps asynchronous fetch operations with cache reads, in-flight
//! deduplication and cache writes.

mod options;
mod pending;
mod resolver;

pub use options::ResolveOptions;
pub(crate) use pending::{PendingRegistry, SharedOutcome};
pub use resolver::RequestCoordinator;
