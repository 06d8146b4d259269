//! # room-core
//!
//! Domain layer containing the room and presence entities, the liveness policy,
//! the error taxonomy, and the storage contract implemented by each backend.
//! This crate has zero dependencies on infrastructure (Redis, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{PresenceRecord, Room, RoomSummary};
pub use error::{RoomError, RoomResult};
pub use traits::{
    Clock, RoomMutation, RoomStore, SharedClock, SharedRoomStore, SystemClock, UpdateOutcome,
};
#[cfg(any(test, feature = "test-util"))]
pub use traits::ManualClock;
pub use value_objects::{LivenessPolicy, Timestamp};
