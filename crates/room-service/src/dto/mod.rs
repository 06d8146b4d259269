//! Data transfer objects for room operations
//!
//! This module provides:
//! - Request DTOs with validation for operation inputs
//! - The result envelope and sweep report returned to callers

pub mod requests;
pub mod responses;

pub use requests::{CreateRoomRequest, JoinRoomRequest, RoomRequest, RoomUserRequest};
pub use responses::{OpResponse, RoomOperation, SweepReport};
