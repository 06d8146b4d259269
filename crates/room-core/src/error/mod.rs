//! Domain errors

mod room_error;

pub use room_error::{RoomError, RoomResult};
