//! Configuration Module
//!
//! Per-instance store configuration and the default policy table.
//!
//! Configuration is chosen in code by the integrating application. Both types
//! implement serde traits so an application may load them from its own
//! configuration source; `ttl` is expressed in milliseconds.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Store configuration for a single cache instance.
///
/// Fields are private so every value, including deserialized ones, has
/// passed `validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawCacheConfig")]
pub struct CacheConfig {
    /// TTL applied to entries stored without an explicit override.
    /// Zero means every entry is stale as soon as it is written.
    #[serde(with = "duration_ms")]
    ttl: Duration,
    /// Maximum number of entries retained after a cleanup pass
    max_size: usize,
}

impl CacheConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    /// Returns `InvalidConfig` when `max_size` is zero.
    pub fn new(ttl: Duration, max_size: usize) -> Result<Self> {
        let config = Self { ttl, max_size };
        config.validate()?;
        Ok(config)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Checks the `max_size >= 1` invariant.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(CacheError::InvalidConfig(
                "max_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Wire shape of `CacheConfig`, checked before it becomes one.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCacheConfig {
    #[serde(with = "duration_ms")]
    ttl: Duration,
    max_size: usize,
}

impl TryFrom<RawCacheConfig> for CacheConfig {
    type Error = CacheError;

    fn try_from(raw: RawCacheConfig) -> Result<Self> {
        Self::new(raw.ttl, raw.max_size)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            max_size: 100,
        }
    }
}

/// Configuration for every named policy instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoliciesConfig {
    /// General-purpose API responses
    pub api: CacheConfig,
    /// User profiles change rarely
    pub user_profiles: CacheConfig,
    pub posts: CacheConfig,
    /// Follow state flips often and is cheap to refetch
    pub follow_state: CacheConfig,
    pub notifications: CacheConfig,
    /// Interval between background expiry sweeps
    #[serde(with = "duration_ms")]
    pub cleanup_interval: Duration,
}

impl PoliciesConfig {
    /// Validates every instance configuration.
    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.user_profiles.validate()?;
        self.posts.validate()?;
        self.follow_state.validate()?;
        self.notifications.validate()?;
        Ok(())
    }
}

impl Default for PoliciesConfig {
    fn default() -> Self {
        Self {
            api: CacheConfig::default(),
            user_profiles: CacheConfig {
                ttl: Duration::from_secs(10 * 60),
                max_size: 500,
            },
            posts: CacheConfig {
                ttl: Duration::from_secs(2 * 60),
                max_size: 200,
            },
            follow_state: CacheConfig {
                ttl: Duration::from_secs(30),
                max_size: 1000,
            },
            notifications: CacheConfig {
                ttl: Duration::from_secs(30),
                max_size: 100,
            },
            cleanup_interval: Duration::from_secs(60),
        }
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
