//! Presence record - a user's membership state within one room

use serde::{Deserialize, Serialize};

use crate::value_objects::{LivenessPolicy, Timestamp};

/// Presence of one user in one room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceRecord {
    pub user_id: String,
    pub user_name: String,
    /// Set once at join
    pub join_time: Timestamp,
    /// Refreshed by every accepted heartbeat
    pub heartbeat_time: Timestamp,
}

impl PresenceRecord {
    /// Create a record joined at `now`
    pub fn new(user_id: impl Into<String>, user_name: impl Into<String>, now: Timestamp) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: user_name.into(),
            join_time: now,
            heartbeat_time: now,
        }
    }

    /// Refresh the heartbeat. Never moves the timestamp backwards.
    pub fn touch(&mut self, now: Timestamp) {
        self.heartbeat_time = self.heartbeat_time.max(now);
    }

    /// Milliseconds since the last heartbeat
    #[inline]
    pub fn heartbeat_age(&self, now: Timestamp) -> i64 {
        now.saturating_sub(self.heartbeat_time)
    }

    /// Check whether the last heartbeat is older than the policy allows
    #[inline]
    pub fn is_expired(&self, policy: &LivenessPolicy, now: Timestamp) -> bool {
        policy.is_expired(self.heartbeat_time, now)
    }
}
