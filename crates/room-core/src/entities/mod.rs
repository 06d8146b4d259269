//! Domain entities - core business objects

mod presence;
mod room;

pub use presence::PresenceRecord;
pub use room::{Room, RoomSummary};
