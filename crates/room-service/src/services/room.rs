//! Room service
//!
//! Creates and ends rooms, tracks who is present in each one, accepts
//! heartbeats, and evicts users whose heartbeat went stale. All validation and
//! semantics live here; the store only provides atomic primitives.

use futures::stream::{self, StreamExt};
use room_core::{
    LivenessPolicy, PresenceRecord, Room, RoomError, RoomResult, RoomSummary, Timestamp,
    UpdateOutcome,
};
use tracing::{debug, info, instrument, warn};

use crate::dto::requests::{MAX_ID_LEN, MAX_NAME_LEN};
use crate::dto::SweepReport;

use super::context::ServiceContext;

/// Room service
#[derive(Debug, Clone)]
pub struct RoomService {
    ctx: ServiceContext,
}

impl RoomService {
    /// Create a new RoomService
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ServiceContext {
        &self.ctx
    }

    pub fn policy(&self) -> LivenessPolicy {
        *self.ctx.policy()
    }

    /// Create an empty room. The first creation of an ID wins.
    #[instrument(skip(self))]
    pub async fn create_room(
        &self,
        room_id: &str,
        room_name: &str,
        host_id: &str,
    ) -> RoomResult<()> {
        require("room_id", room_id, MAX_ID_LEN)?;
        require("room_name", room_name, MAX_NAME_LEN)?;
        require("host_id", host_id, MAX_ID_LEN)?;

        let room = Room::new(room_id, room_name, host_id);
        if !self.ctx.store().insert_room(&room).await? {
            return Err(RoomError::RoomAlreadyExists(room_id.to_string()));
        }

        info!(room_id, host_id, "Room created");
        Ok(())
    }

    /// Delete a room together with every presence record in it
    #[instrument(skip(self))]
    pub async fn end_room(&self, room_id: &str) -> RoomResult<()> {
        require("room_id", room_id, MAX_ID_LEN)?;

        if !self.ctx.store().remove_room(room_id).await? {
            return Err(RoomError::RoomNotFound(room_id.to_string()));
        }

        info!(room_id, "Room ended");
        Ok(())
    }

    /// Summaries of every room, ordered by room ID
    #[instrument(skip(self))]
    pub async fn list_rooms(&self) -> RoomResult<Vec<RoomSummary>> {
        let mut rooms: Vec<RoomSummary> = self
            .ctx
            .store()
            .list_rooms()
            .await?
            .iter()
            .map(Room::summary)
            .collect();
        rooms.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        Ok(rooms)
    }

    /// Add a user to a room. Joining while already present is rejected and
    /// leaves the existing record untouched.
    #[instrument(skip(self))]
    pub async fn join_room(&self, room_id: &str, user_id: &str, user_name: &str) -> RoomResult<()> {
        require("room_id", room_id, MAX_ID_LEN)?;
        require("user_id", user_id, MAX_ID_LEN)?;
        require("user_name", user_name, MAX_NAME_LEN)?;

        let now = self.ctx.now();
        let outcome = self
            .ctx
            .store()
            .update_room(room_id, &mut |room: &mut Room| -> RoomResult<bool> {
                room.add_user(PresenceRecord::new(user_id, user_name, now))?;
                Ok(true)
            })
            .await?;
        found(room_id, outcome)?;

        info!(room_id, user_id, "User joined room");
        Ok(())
    }

    /// Remove a user from a room
    #[instrument(skip(self))]
    pub async fn leave_room(&self, room_id: &str, user_id: &str) -> RoomResult<()> {
        require("room_id", room_id, MAX_ID_LEN)?;
        require("user_id", user_id, MAX_ID_LEN)?;

        let outcome = self
            .ctx
            .store()
            .update_room(room_id, &mut |room: &mut Room| -> RoomResult<bool> {
                room.remove_user(user_id)?;
                Ok(true)
            })
            .await?;
        found(room_id, outcome)?;

        info!(room_id, user_id, "User left room");
        Ok(())
    }

    /// Presence records of a room, ordered by user ID
    #[instrument(skip(self))]
    pub async fn list_users(&self, room_id: &str) -> RoomResult<Vec<PresenceRecord>> {
        require("room_id", room_id, MAX_ID_LEN)?;

        self.ctx
            .store()
            .get_room(room_id)
            .await?
            .map(|room| room.presence_records())
            .ok_or_else(|| RoomError::RoomNotFound(room_id.to_string()))
    }

    /// Refresh a user's heartbeat.
    ///
    /// A heartbeat arriving after the threshold already elapsed is rejected
    /// and does not revive the record; the sweeper removes it.
    #[instrument(skip(self))]
    pub async fn heartbeat(&self, room_id: &str, user_id: &str) -> RoomResult<()> {
        require("room_id", room_id, MAX_ID_LEN)?;
        require("user_id", user_id, MAX_ID_LEN)?;

        let now = self.ctx.now();
        let policy = self.policy();
        let outcome = self
            .ctx
            .store()
            .update_room(room_id, &mut |room: &mut Room| -> RoomResult<bool> {
                let room_id = room.room_id.clone();
                let record = room.user_mut(user_id)?;
                if record.is_expired(&policy, now) {
                    return Err(RoomError::HeartbeatTimeout {
                        room_id,
                        user_id: user_id.to_string(),
                        elapsed_ms: record.heartbeat_age(now),
                    });
                }
                let previous = record.heartbeat_time;
                record.touch(now);
                Ok(record.heartbeat_time != previous)
            })
            .await
            .inspect_err(|e| {
                if let RoomError::HeartbeatTimeout { elapsed_ms, .. } = e {
                    warn!(room_id, user_id, elapsed_ms, "Late heartbeat");
                }
            })?;
        found(room_id, outcome)?;

        debug!(room_id, user_id, "Heartbeat accepted");
        Ok(())
    }

    /// Evict every user whose heartbeat is older than the threshold.
    ///
    /// Rooms are swept concurrently, at most `sweep_concurrency` at a time.
    /// A room that fails is reported and left as it was; the others are
    /// still swept.
    #[instrument(skip(self))]
    pub async fn sweep_expired(&self) -> RoomResult<SweepReport> {
        let room_ids = self.ctx.store().room_ids().await?;
        let now = self.ctx.now();

        // Results come back in room order
        let sweeps: Vec<_> = room_ids
            .iter()
            .map(|room_id| self.sweep_room(room_id, now))
            .collect();
        let results: Vec<RoomResult<usize>> = stream::iter(sweeps)
            .buffered(self.ctx.sweep_concurrency())
            .collect()
            .await;

        let mut report = SweepReport {
            rooms_scanned: room_ids.len(),
            ..SweepReport::default()
        };
        for (room_id, result) in room_ids.iter().zip(results) {
            match result {
                Ok(0) => {}
                Ok(evicted) => {
                    report.rooms_updated += 1;
                    report.users_evicted += evicted;
                }
                Err(e) => {
                    warn!(room_id = %room_id, error = %e, "Failed to sweep room");
                    report.failed_rooms.push(room_id.clone());
                }
            }
        }

        debug!(
            rooms_scanned = report.rooms_scanned,
            rooms_updated = report.rooms_updated,
            users_evicted = report.users_evicted,
            failed = report.failed_rooms.len(),
            "Sweep finished"
        );
        Ok(report)
    }

    /// Evict the expired users of one room, returning how many were removed
    async fn sweep_room(&self, room_id: &str, now: Timestamp) -> RoomResult<usize> {
        let policy = self.policy();
        let mut evicted: Vec<String> = Vec::new();

        let outcome = self
            .ctx
            .store()
            .update_room(room_id, &mut |room: &mut Room| -> RoomResult<bool> {
                // One snapshot, one instant: the set is not recomputed per user
                evicted = room.expired_user_ids(&policy, now);
                if evicted.is_empty() {
                    return Ok(false);
                }
                room.evict(&evicted);
                Ok(true)
            })
            .await?;

        if outcome != UpdateOutcome::Written {
            return Ok(0);
        }
        for user_id in &evicted {
            info!(room_id, user_id = %user_id, "Evicted user after heartbeat timeout");
        }
        Ok(evicted.len())
    }
}

/// Reject empty or over-long arguments
fn require(field: &str, value: &str, max_len: u64) -> RoomResult<()> {
    if value.is_empty() {
        return Err(RoomError::invalid(format!("{field} must not be empty")));
    }
    if value.chars().count() as u64 > max_len {
        return Err(RoomError::invalid(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(())
}

fn found(room_id: &str, outcome: UpdateOutcome) -> RoomResult<()> {
    match outcome {
        UpdateOutcome::Missing => Err(RoomError::RoomNotFound(room_id.to_string())),
        UpdateOutcome::Unchanged | UpdateOutcome::Written => Ok(()),
    }
}
