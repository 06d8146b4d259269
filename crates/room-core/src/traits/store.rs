//! Room store trait (port) - storage primitives shared by the volatile and
//! persistent backends
//!
//! Operation semantics and validation live in the service layer; a backend
//! only decides how rooms are kept and how a read-modify-write is made atomic.

use std::sync::Arc;

use async_trait::async_trait;

use crate::entities::Room;
use crate::error::RoomResult;

/// In-place change applied to a room snapshot.
///
/// Returns `Ok(true)` when the room changed and must be written back,
/// `Ok(false)` when nothing changed. An `Err` aborts the update without
/// writing. Backends may invoke the mutation more than once (optimistic
/// retry), each time on a fresh snapshot.
pub type RoomMutation<'a> = &'a mut (dyn FnMut(&mut Room) -> RoomResult<bool> + Send);

/// Outcome of an atomic read-modify-write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No room with that ID
    Missing,
    /// Mutation reported no change; nothing was written
    Unchanged,
    /// Mutated room was committed
    Written,
}

#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Backend name used in logs
    fn backend(&self) -> &'static str;

    /// Insert a room unless one with the same ID exists.
    /// Returns `false` if the ID was taken.
    async fn insert_room(&self, room: &Room) -> RoomResult<bool>;

    /// Delete a room with all its presence records.
    /// Returns `false` if the room did not exist.
    async fn remove_room(&self, room_id: &str) -> RoomResult<bool>;

    /// Fetch a single room
    async fn get_room(&self, room_id: &str) -> RoomResult<Option<Room>>;

    /// Fetch every room
    async fn list_rooms(&self) -> RoomResult<Vec<Room>>;

    /// Enumerate room IDs
    async fn room_ids(&self) -> RoomResult<Vec<String>>;

    /// Atomically apply `mutation` to the current state of a room
    async fn update_room(&self, room_id: &str, mutation: RoomMutation<'_>)
        -> RoomResult<UpdateOutcome>;

    /// Check that the backend is reachable
    async fn health_check(&self) -> RoomResult<()>;
}

/// Shared store handle selected at construction time
pub type SharedRoomStore = Arc<dyn RoomStore>;
