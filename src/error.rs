//! Error types for the request cache
//!
//! Provides unified error handling using thiserror.

use std::sync::Arc;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the request cache.
///
/// `Clone` so that a single shared outcome can be handed to every caller
/// waiting on the same in-flight resolution.
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// Key derivation failed (e.g. body could not be serialized)
    #[error("Key computation failed: {0}")]
    KeyComputation(String),

    /// Regular expression invalidation pattern failed to compile
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Store configuration rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The wrapped operation failed; the original error lives inside the Arc
    #[error("Operation failed: {0}")]
    Operation(Arc<anyhow::Error>),

    /// The spawned operation panicked or was cancelled by the runtime
    #[error("Operation aborted: {0}")]
    Aborted(String),
}

impl CacheError {
    /// Returns the underlying operation error, if this is an operation failure.
    pub fn operation_error(&self) -> Option<&anyhow::Error> {
        match self {
            CacheError::Operation(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the request cache.
pub type Result<T> = std::result::Result<T, CacheError>;
