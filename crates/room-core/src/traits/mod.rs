//! Traits (ports) - the interfaces infrastructure implements for the domain

mod clock;
mod store;

pub use clock::{Clock, SharedClock, SystemClock};
#[cfg(any(test, feature = "test-util"))]
pub use clock::ManualClock;
pub use store::{RoomMutation, RoomStore, SharedRoomStore, UpdateOutcome};
