//! # room-service
//!
//! Application layer: the room operations shared by every store backend,
//! the `{code, message, data}` result envelope, and the expiry sweeper.

pub mod dto;
pub mod services;

pub use dto::{
    CreateRoomRequest, JoinRoomRequest, OpResponse, RoomOperation, RoomRequest, RoomUserRequest,
    SweepReport,
};
pub use services::{
    ExpirySweeper, RoomService, ServiceContext, ServiceContextBuilder, SweeperHandle,
    DEFAULT_SWEEP_CONCURRENCY,
};
