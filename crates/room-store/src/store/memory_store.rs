//! Volatile room store
//!
//! Rooms live in a process-local concurrent map and are lost on restart.
//! Only valid for a single-process deployment.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use room_core::{Room, RoomMutation, RoomResult, RoomStore, UpdateOutcome};

/// In-memory `RoomStore` backed by a `DashMap`
#[derive(Debug, Default)]
pub struct MemoryRoomStore {
    rooms: DashMap<String, Room>,
}

impl MemoryRoomStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store behind an `Arc`
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of rooms held
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert_room(&self, room: &Room) -> RoomResult<bool> {
        match self.rooms.entry(room.room_id.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(room.clone());
                Ok(true)
            }
        }
    }

    async fn remove_room(&self, room_id: &str) -> RoomResult<bool> {
        Ok(self.rooms.remove(room_id).is_some())
    }

    async fn get_room(&self, room_id: &str) -> RoomResult<Option<Room>> {
        Ok(self.rooms.get(room_id).map(|entry| entry.value().clone()))
    }

    async fn list_rooms(&self) -> RoomResult<Vec<Room>> {
        Ok(self
            .rooms
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn room_ids(&self) -> RoomResult<Vec<String>> {
        Ok(self.rooms.iter().map(|entry| entry.key().clone()).collect())
    }

    async fn update_room(
        &self,
        room_id: &str,
        mutation: RoomMutation<'_>,
    ) -> RoomResult<UpdateOutcome> {
        // The shard write lock is held for the whole read-modify-write
        let Some(mut entry) = self.rooms.get_mut(room_id) else {
            return Ok(UpdateOutcome::Missing);
        };

        let mut draft = entry.value().clone();
        if mutation(&mut draft)? {
            *entry.value_mut() = draft;
            Ok(UpdateOutcome::Written)
        } else {
            Ok(UpdateOutcome::Unchanged)
        }
    }

    async fn health_check(&self) -> RoomResult<()> {
        Ok(())
    }
}
