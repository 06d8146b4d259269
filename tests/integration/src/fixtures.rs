//! Test fixtures and data generators
//!
//! Provides unique room and user identifiers so tests sharing a store never
//! collide.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Room used by a test
#[derive(Debug, Clone)]
pub struct RoomFixture {
    pub room_id: String,
    pub room_name: String,
    pub host_id: String,
}

impl RoomFixture {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            room_id: format!("room{suffix}"),
            room_name: format!("Room {suffix}"),
            host_id: format!("host{suffix}"),
        }
    }

    /// Query for create_room
    pub fn create_query(&self) -> [(&str, &str); 3] {
        [
            ("RoomID", self.room_id.as_str()),
            ("RoomName", self.room_name.as_str()),
            ("HostID", self.host_id.as_str()),
        ]
    }

    /// Query naming only the room
    pub fn room_query(&self) -> [(&str, &str); 1] {
        [("RoomID", self.room_id.as_str())]
    }

    /// Query for join_room
    pub fn join_query<'a>(&'a self, user: &'a UserFixture) -> [(&'a str, &'a str); 3] {
        [
            ("RoomID", self.room_id.as_str()),
            ("UserID", user.user_id.as_str()),
            ("UserName", user.user_name.as_str()),
        ]
    }

    /// Query for leave_room and heartbeat
    pub fn user_query<'a>(&'a self, user: &'a UserFixture) -> [(&'a str, &'a str); 2] {
        [
            ("RoomID", self.room_id.as_str()),
            ("UserID", user.user_id.as_str()),
        ]
    }
}

/// User joining rooms in a test
#[derive(Debug, Clone)]
pub struct UserFixture {
    pub user_id: String,
    pub user_name: String,
}

impl UserFixture {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            user_id: format!("user{suffix}"),
            user_name: format!("User {suffix}"),
        }
    }
}

/// Room operation paths
pub mod paths {
    pub const CREATE_ROOM: &str = "/api/room/create_room";
    pub const END_ROOM: &str = "/api/room/end_room";
    pub const GET_ROOM_LIST: &str = "/api/room/get_room_list";
    pub const JOIN_ROOM: &str = "/api/room/join_room";
    pub const LEAVE_ROOM: &str = "/api/room/leave_room";
    pub const GET_ROOM_USER_LIST: &str = "/api/room/get_room_user_list";
    pub const HEARTBEAT: &str = "/api/room/heartbeat";
    pub const CHECK_HEARTBEAT: &str = "/api/room/check_heartbeat";
}
