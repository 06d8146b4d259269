//! Response DTOs
//!
//! Every operation answers with the same `{code, message, data?}` envelope.
//! `code = 0` is success; any other code is a failure described by `message`.

use room_core::{RoomError, RoomResult};
use serde::{Deserialize, Serialize};
use tracing::error;

/// The room operations, used to pick envelope messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomOperation {
    CreateRoom,
    EndRoom,
    ListRooms,
    JoinRoom,
    LeaveRoom,
    ListUsers,
    Heartbeat,
    Sweep,
}

impl RoomOperation {
    /// Name used in logs
    pub fn name(self) -> &'static str {
        match self {
            Self::CreateRoom => "create_room",
            Self::EndRoom => "end_room",
            Self::ListRooms => "get_room_list",
            Self::JoinRoom => "join_room",
            Self::LeaveRoom => "leave_room",
            Self::ListUsers => "get_room_user_list",
            Self::Heartbeat => "heartbeat",
            Self::Sweep => "check_heartbeat",
        }
    }

    /// Message reported on success
    pub fn success_message(self) -> &'static str {
        match self {
            Self::Heartbeat => "heartbeat success",
            _ => "success",
        }
    }

    /// Generic message reported when an unexpected fault is downgraded
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::CreateRoom => "create room failed",
            Self::EndRoom => "end room failed",
            Self::ListRooms => "get room list failed",
            Self::JoinRoom => "join room failed",
            Self::LeaveRoom => "leave room failed",
            Self::ListUsers => "get user list failed",
            Self::Heartbeat => "heartbeat failed",
            Self::Sweep => "check heartbeat failed",
        }
    }
}

/// Result envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpResponse<T = serde_json::Value> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> OpResponse<T> {
    /// Success without data
    pub fn ok(op: RoomOperation) -> Self {
        Self {
            code: 0,
            message: op.success_message().to_string(),
            data: None,
        }
    }

    /// Success carrying `data`
    pub fn with_data(op: RoomOperation, data: T) -> Self {
        Self {
            code: 0,
            message: op.success_message().to_string(),
            data: Some(data),
        }
    }

    /// Failure envelope.
    ///
    /// Unexpected faults are logged and reported with the operation's generic
    /// message and code `1`; every other error keeps its own code and message.
    pub fn failure(op: RoomOperation, err: &RoomError) -> Self {
        if err.is_unexpected() {
            error!(operation = op.name(), error = %err, "Room operation failed unexpectedly");
            return Self {
                code: RoomError::GENERIC_FAILURE_CODE,
                message: op.failure_message().to_string(),
                data: None,
            };
        }
        Self {
            code: err.result_code(),
            message: err.to_string(),
            data: None,
        }
    }

    /// Envelope for an operation returning no data
    pub fn from_unit(op: RoomOperation, result: RoomResult<()>) -> Self {
        match result {
            Ok(()) => Self::ok(op),
            Err(e) => Self::failure(op, &e),
        }
    }

    /// Envelope for an operation returning data
    pub fn from_result(op: RoomOperation, result: RoomResult<T>) -> Self {
        match result {
            Ok(data) => Self::with_data(op, data),
            Err(e) => Self::failure(op, &e),
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Outcome of one expiry sweep
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Rooms enumerated
    pub rooms_scanned: usize,
    /// Rooms rewritten because at least one user expired
    pub rooms_updated: usize,
    /// Presence records removed
    pub users_evicted: usize,
    /// Rooms whose sweep failed and were left as they were
    pub failed_rooms: Vec<String>,
}

impl SweepReport {
    pub fn is_clean(&self) -> bool {
        self.failed_rooms.is_empty()
    }
}
