//! Request DTOs
//!
//! Field names on the wire are the query parameter names clients send
//! (`RoomID`, `UserID`, ...).

use serde::Deserialize;
use validator::Validate;

/// Longest accepted room or user ID
pub const MAX_ID_LEN: u64 = 128;
/// Longest accepted room or user display name
pub const MAX_NAME_LEN: u64 = 256;

/// Create room request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoomRequest {
    #[serde(rename = "RoomID")]
    #[validate(length(
        min = 1,
        max = MAX_ID_LEN,
        message = "RoomID must be 1-128 characters"
    ))]
    pub room_id: String,

    #[serde(rename = "RoomName")]
    #[validate(length(
        min = 1,
        max = MAX_NAME_LEN,
        message = "RoomName must be 1-256 characters"
    ))]
    pub room_name: String,

    #[serde(rename = "HostID")]
    #[validate(length(
        min = 1,
        max = MAX_ID_LEN,
        message = "HostID must be 1-128 characters"
    ))]
    pub host_id: String,
}

/// Request naming a single room (end room, list users)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RoomRequest {
    #[serde(rename = "RoomID")]
    #[validate(length(
        min = 1,
        max = MAX_ID_LEN,
        message = "RoomID must be 1-128 characters"
    ))]
    pub room_id: String,
}

/// Join room request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JoinRoomRequest {
    #[serde(rename = "RoomID")]
    #[validate(length(
        min = 1,
        max = MAX_ID_LEN,
        message = "RoomID must be 1-128 characters"
    ))]
    pub room_id: String,

    #[serde(rename = "UserID")]
    #[validate(length(
        min = 1,
        max = MAX_ID_LEN,
        message = "UserID must be 1-128 characters"
    ))]
    pub user_id: String,

    #[serde(rename = "UserName")]
    #[validate(length(
        min = 1,
        max = MAX_NAME_LEN,
        message = "UserName must be 1-256 characters"
    ))]
    pub user_name: String,
}

/// Request naming a user within a room (leave, heartbeat)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RoomUserRequest {
    #[serde(rename = "RoomID")]
    #[validate(length(
        min = 1,
        max = MAX_ID_LEN,
        message = "RoomID must be 1-128 characters"
    ))]
    pub room_id: String,

    #[serde(rename = "UserID")]
    #[validate(length(
        min = 1,
        max = MAX_ID_LEN,
        message = "UserID must be 1-128 characters"
    ))]
    pub user_id: String,
}
