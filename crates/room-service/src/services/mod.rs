//! Room services
//!
//! The room operations, validated and implemented once over any
//! `RoomStore`, and the background task that evicts expired users.

pub mod context;
pub mod room;
pub mod sweeper;

pub use context::{ServiceContext, ServiceContextBuilder, DEFAULT_SWEEP_CONCURRENCY};
pub use room::RoomService;
pub use sweeper::{ExpirySweeper, SweeperHandle};
