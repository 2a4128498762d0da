//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the cache lives.
//!
//! # Tasks
//! - TTL Cleanup: removes expired entries from every policy instance

mod cleanup;

pub use cleanup::spawn_cleanup_task;
