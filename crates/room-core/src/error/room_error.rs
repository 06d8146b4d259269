//! Room errors - the error taxonomy shared by every store backend and the service layer

use thiserror::Error;

/// Result type for room and store operations
pub type RoomResult<T> = Result<T, RoomError>;

/// Errors produced by room operations and store backends
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("room not exists: {0}")]
    RoomNotFound(String),

    #[error("user {user_id} not exists in room {room_id}")]
    UserNotPresent { room_id: String, user_id: String },

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("room already exists: {0}")]
    RoomAlreadyExists(String),

    #[error("user {user_id} already joined room {room_id}")]
    AlreadyJoined { room_id: String, user_id: String },

    #[error("write conflict on room {room_id} after {attempts} attempts")]
    WriteConflict { room_id: String, attempts: u32 },

    // =========================================================================
    // Liveness Errors
    // =========================================================================
    #[error("heartbeat timeout: user {user_id} in room {room_id} silent for {elapsed_ms}ms")]
    HeartbeatTimeout {
        room_id: String,
        user_id: String,
        elapsed_ms: i64,
    },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl RoomError {
    /// Result code reported for unexpected faults
    pub const GENERIC_FAILURE_CODE: i32 = 1;

    /// Create an invalid argument error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create a backend unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::BackendUnavailable(msg.into())
    }

    /// Get an error code string for logs and API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::RoomNotFound(_) => "ROOM_NOT_FOUND",
            Self::UserNotPresent { .. } => "USER_NOT_PRESENT",
            Self::RoomAlreadyExists(_) => "ROOM_ALREADY_EXISTS",
            Self::AlreadyJoined { .. } => "ALREADY_JOINED",
            Self::WriteConflict { .. } => "WRITE_CONFLICT",
            Self::HeartbeatTimeout { .. } => "HEARTBEAT_TIMEOUT",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::BackendUnavailable(_) => "BACKEND_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get the numeric result code carried in the `{code, message}` envelope.
    ///
    /// `0` is reserved for success and `1` for downgraded internal faults.
    pub fn result_code(&self) -> i32 {
        match self {
            Self::RoomNotFound(_) => 1001,
            Self::UserNotPresent { .. } => 1002,
            Self::RoomAlreadyExists(_) => 1003,
            Self::AlreadyJoined { .. } => 1004,
            Self::HeartbeatTimeout { .. } => 1005,
            Self::BackendUnavailable(_) => 1006,
            Self::WriteConflict { .. } => 1007,
            Self::InvalidArgument(_) => 1008,
            Self::Internal(_) => Self::GENERIC_FAILURE_CODE,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RoomNotFound(_) | Self::UserNotPresent { .. })
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::RoomAlreadyExists(_) | Self::AlreadyJoined { .. } | Self::WriteConflict { .. }
        )
    }

    /// Check if this error is outside the expected taxonomy and should be
    /// downgraded to a generic failure before reaching a caller
    pub fn is_unexpected(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}

impl From<serde_json::Error> for RoomError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("room codec: {err}"))
    }
}
