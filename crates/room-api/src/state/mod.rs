//! Application state
//!
//! Holds the shared state for the Axum application: the room service and
//! the configuration it was built from.

use std::sync::Arc;

use room_common::AppConfig;
use room_service::RoomService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Room operations, shared with the expiry sweeper
    rooms: Arc<RoomService>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(rooms: Arc<RoomService>, config: AppConfig) -> Self {
        Self {
            rooms,
            config: Arc::new(config),
        }
    }

    /// Get the room service
    pub fn rooms(&self) -> &RoomService {
        &self.rooms
    }

    /// Shared handle to the room service
    pub fn rooms_handle(&self) -> Arc<RoomService> {
        Arc::clone(&self.rooms)
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("rooms", &self.rooms)
            .field("config", &"AppConfig")
            .finish()
    }
}
