//! # room-store
//!
//! Storage backends for rooms and their presence records.
//!
//! ## Features
//!
//! - **Volatile store**: process-local concurrent map, lost on restart
//! - **Redis store**: one JSON value per room key, shared between processes
//! - **Connection Pool**: Managed Redis connection pool with deadpool and
//!   bounded round-trips
//!
//! ## Example
//!
//! ```ignore
//! use room_store::{MemoryRoomStore, RedisPool, RedisRoomStore};
//!
//! // Volatile
//! let store = MemoryRoomStore::shared();
//!
//! // Persistent
//! let pool = RedisPool::from_config(&redis_config)?;
//! let store = RedisRoomStore::from_config(pool, &redis_config);
//! ```

pub mod pool;
pub mod store;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

// Re-export store implementations
pub use store::{MemoryRoomStore, RedisRoomStore};
