//! `RoomStore` implementations

mod memory_store;
mod redis_store;

#[cfg(test)]
pub(crate) mod contract;

pub use memory_store::MemoryRoomStore;
pub use redis_store::RedisRoomStore;
