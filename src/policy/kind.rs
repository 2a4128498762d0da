//! Policy kinds and their configuration lookup.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{CacheConfig, PoliciesConfig};

/// Data domains with their own TTL and capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// General-purpose API responses
    Api,
    UserProfiles,
    Posts,
    FollowState,
    Notifications,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 5] = [
        PolicyKind::Api,
        PolicyKind::UserProfiles,
        PolicyKind::Posts,
        PolicyKind::FollowState,
        PolicyKind::Notifications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Api => "api",
            PolicyKind::UserProfiles => "user_profiles",
            PolicyKind::Posts => "posts",
            PolicyKind::FollowState => "follow_state",
            PolicyKind::Notifications => "notifications",
        }
    }

    /// Selects this kind's configuration.
    pub fn config(&self, config: &PoliciesConfig) -> CacheConfig {
        match self {
            PolicyKind::Api => config.api,
            PolicyKind::UserProfiles => config.user_profiles,
            PolicyKind::Posts => config.posts,
            PolicyKind::FollowState => config.follow_state,
            PolicyKind::Notifications => config.notifications,
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
