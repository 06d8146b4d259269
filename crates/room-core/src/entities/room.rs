//! Room entity - a named, hosted collection of present users

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::PresenceRecord;
use crate::error::{RoomError, RoomResult};
use crate::value_objects::{LivenessPolicy, Timestamp};

/// Room entity.
///
/// The serialized form is the value stored per room key by the persistent
/// backend, so field names are part of the storage format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub room_id: String,
    pub room_name: String,
    pub host_id: String,
    /// Present users keyed by user ID
    #[serde(default)]
    pub users: BTreeMap<String, PresenceRecord>,
}

/// Room projection returned by room listings (presence detail omitted)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub room_id: String,
    pub room_name: String,
    pub host_id: String,
}

impl Room {
    /// Create an empty room
    pub fn new(
        room_id: impl Into<String>,
        room_name: impl Into<String>,
        host_id: impl Into<String>,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            room_name: room_name.into(),
            host_id: host_id.into(),
            users: BTreeMap::new(),
        }
    }

    /// Summary without presence detail
    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            room_id: self.room_id.clone(),
            room_name: self.room_name.clone(),
            host_id: self.host_id.clone(),
        }
    }

    /// Check if a user is present
    #[inline]
    pub fn has_user(&self, user_id: &str) -> bool {
        self.users.contains_key(user_id)
    }

    /// Number of present users
    #[inline]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Present users ordered by user ID
    pub fn presence_records(&self) -> Vec<PresenceRecord> {
        self.users.values().cloned().collect()
    }

    /// Add a presence record. Re-joining while present is rejected.
    pub fn add_user(&mut self, record: PresenceRecord) -> RoomResult<()> {
        if self.has_user(&record.user_id) {
            return Err(RoomError::AlreadyJoined {
                room_id: self.room_id.clone(),
                user_id: record.user_id,
            });
        }
        self.users.insert(record.user_id.clone(), record);
        Ok(())
    }

    /// Remove a presence record
    pub fn remove_user(&mut self, user_id: &str) -> RoomResult<PresenceRecord> {
        self.users
            .remove(user_id)
            .ok_or_else(|| self.user_not_present(user_id))
    }

    /// Mutable access to a presence record
    pub fn user_mut(&mut self, user_id: &str) -> RoomResult<&mut PresenceRecord> {
        let room_id = &self.room_id;
        self.users
            .get_mut(user_id)
            .ok_or_else(|| RoomError::UserNotPresent {
                room_id: room_id.clone(),
                user_id: user_id.to_string(),
            })
    }

    /// IDs of users whose heartbeat is older than the policy allows, computed
    /// from this snapshot at a single instant
    pub fn expired_user_ids(&self, policy: &LivenessPolicy, now: Timestamp) -> Vec<String> {
        self.users
            .values()
            .filter(|record| record.is_expired(policy, now))
            .map(|record| record.user_id.clone())
            .collect()
    }

    /// Remove the given users, returning how many were present
    pub fn evict(&mut self, user_ids: &[String]) -> usize {
        user_ids
            .iter()
            .filter(|user_id| self.users.remove(user_id.as_str()).is_some())
            .count()
    }

    fn user_not_present(&self, user_id: &str) -> RoomError {
        RoomError::UserNotPresent {
            room_id: self.room_id.clone(),
            user_id: user_id.to_string(),
        }
    }
}
