//! Redis room store
//!
//! Each room, with its full user map, is one JSON value under
//! `<key_prefix><room_id>`. Updates are optimistic: `WATCH` the key, read and
//! mutate, then commit with `MULTI`/`EXEC`; an aborted `EXEC` retries from a
//! fresh read.

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::Connection;
use rand::Rng;
use room_core::{Room, RoomError, RoomMutation, RoomResult, RoomStore, UpdateOutcome};
use tracing::{debug, warn};

use crate::pool::{RedisPool, RedisResult};

/// Default number of retries after an aborted commit
pub const DEFAULT_MAX_WRITE_RETRIES: u32 = 8;

/// Upper bound of the randomized back-off per attempt
const RETRY_BACKOFF_STEP_MS: u64 = 5;

/// Redis-backed `RoomStore`
#[derive(Debug, Clone)]
pub struct RedisRoomStore {
    pool: RedisPool,
    key_prefix: String,
    max_write_retries: u32,
}

impl RedisRoomStore {
    /// Create a store keying rooms by their bare ID
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            key_prefix: String::new(),
            max_write_retries: DEFAULT_MAX_WRITE_RETRIES,
        }
    }

    /// Create a store from room-common config
    pub fn from_config(pool: RedisPool, config: &room_common::RedisConfig) -> Self {
        Self::new(pool)
            .with_key_prefix(config.key_prefix.clone())
            .with_max_write_retries(config.max_write_retries)
    }

    #[must_use]
    pub fn with_key_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }

    #[must_use]
    pub fn with_max_write_retries(mut self, max_write_retries: u32) -> Self {
        self.max_write_retries = max_write_retries;
        self
    }

    /// Redis key holding a room
    pub fn room_key(&self, room_id: &str) -> String {
        format!("{}{}", self.key_prefix, room_id)
    }

    /// `SCAN` pattern matching every room key
    fn key_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.key_prefix.len() + 1);
        for c in self.key_prefix.chars() {
            if matches!(c, '*' | '?' | '[' | ']' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('*');
        pattern
    }

    fn room_id_from_key<'k>(&self, key: &'k str) -> Option<&'k str> {
        key.strip_prefix(self.key_prefix.as_str())
    }

    fn encode(room: &Room) -> RoomResult<String> {
        Ok(serde_json::to_string(room)?)
    }

    fn decode(raw: &str) -> RoomResult<Room> {
        Ok(serde_json::from_str(raw)?)
    }

    /// One optimistic attempt. `None` means the commit was aborted by a
    /// concurrent writer. Leaves the key watched unless it wrote.
    async fn try_update(
        &self,
        conn: &mut Connection,
        key: &str,
        mutation: RoomMutation<'_>,
    ) -> RoomResult<Option<UpdateOutcome>> {
        self.pool
            .bounded(redis::cmd("WATCH").arg(key).query_async::<()>(conn))
            .await?;

        let raw: Option<String> = self
            .pool
            .bounded(redis::cmd("GET").arg(key).query_async(conn))
            .await?;
        let Some(raw) = raw else {
            return Ok(Some(UpdateOutcome::Missing));
        };

        let mut room = Self::decode(&raw)?;
        if !mutation(&mut room)? {
            return Ok(Some(UpdateOutcome::Unchanged));
        }
        let encoded = Self::encode(&room)?;

        let committed: Option<()> = self
            .pool
            .bounded(
                redis::pipe()
                    .atomic()
                    .set(key, encoded)
                    .ignore()
                    .query_async(conn),
            )
            .await?;

        Ok(committed.map(|()| UpdateOutcome::Written))
    }

    /// Best-effort release of a watch left by an attempt that did not commit
    async fn unwatch(&self, conn: &mut Connection) {
        let released: RedisResult<()> = self
            .pool
            .bounded(redis::cmd("UNWATCH").query_async(conn))
            .await;
        if let Err(e) = released {
            debug!(error = %e, "UNWATCH failed");
        }
    }
}

fn retry_backoff(attempt: u32) -> Duration {
    let ceiling = RETRY_BACKOFF_STEP_MS * u64::from(attempt);
    Duration::from_millis(rand::thread_rng().gen_range(1..=ceiling))
}

#[async_trait]
impl RoomStore for RedisRoomStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn insert_room(&self, room: &Room) -> RoomResult<bool> {
        let encoded = Self::encode(room)?;
        Ok(self
            .pool
            .set_if_absent(&self.room_key(&room.room_id), &encoded)
            .await?)
    }

    async fn remove_room(&self, room_id: &str) -> RoomResult<bool> {
        Ok(self.pool.delete(&self.room_key(room_id)).await?)
    }

    async fn get_room(&self, room_id: &str) -> RoomResult<Option<Room>> {
        self.pool
            .get_raw(&self.room_key(room_id))
            .await?
            .map(|raw| Self::decode(&raw))
            .transpose()
    }

    async fn list_rooms(&self) -> RoomResult<Vec<Room>> {
        let keys = self.pool.scan_keys(&self.key_pattern()).await?;
        let values = self.pool.get_many_raw(&keys).await?;

        let rooms = keys
            .iter()
            .zip(values)
            // Keys removed between SCAN and MGET come back empty
            .filter_map(|(key, raw)| raw.map(|raw| (key, raw)))
            .filter_map(|(key, raw)| match Self::decode(&raw) {
                Ok(room) => Some(room),
                Err(e) => {
                    warn!(key = %key, error = %e, "Skipping undecodable room value");
                    None
                }
            })
            .collect();

        Ok(rooms)
    }

    async fn room_ids(&self) -> RoomResult<Vec<String>> {
        let keys = self.pool.scan_keys(&self.key_pattern()).await?;
        Ok(keys
            .iter()
            .filter_map(|key| self.room_id_from_key(key))
            .map(String::from)
            .collect())
    }

    async fn update_room(
        &self,
        room_id: &str,
        mutation: RoomMutation<'_>,
    ) -> RoomResult<UpdateOutcome> {
        let key = self.room_key(room_id);
        let mut conn = self.pool.get().await?;
        let attempts = self.max_write_retries.saturating_add(1);

        for attempt in 1..=attempts {
            match self.try_update(&mut conn, &key, &mut *mutation).await {
                Ok(Some(UpdateOutcome::Written)) => {
                    debug!(room_id, attempt, "Room written");
                    return Ok(UpdateOutcome::Written);
                }
                Ok(Some(outcome)) => {
                    self.unwatch(&mut conn).await;
                    return Ok(outcome);
                }
                Ok(None) => {
                    debug!(room_id, attempt, "Room changed during update, retrying");
                    if attempt < attempts {
                        tokio::time::sleep(retry_backoff(attempt)).await;
                    }
                }
                Err(e) => {
                    self.unwatch(&mut conn).await;
                    return Err(e);
                }
            }
        }

        warn!(room_id, attempts, "Giving up on contended room update");
        Err(RoomError::WriteConflict {
            room_id: room_id.to_string(),
            attempts,
        })
    }

    async fn health_check(&self) -> RoomResult<()> {
        Ok(self.pool.health_check().await?)
    }
}
