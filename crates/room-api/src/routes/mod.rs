//! Route definitions
//!
//! Room operations are mounted under /api/room and accept GET or POST with
//! parameters in the query string.

use axum::{routing::get, Router};

use crate::handlers::{health, rooms};
use crate::state::AppState;

/// Create the main router with room and health routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api/room", room_routes())
        .merge(health_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Room operation routes
fn room_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/create_room",
            get(rooms::create_room).post(rooms::create_room),
        )
        .route("/end_room", get(rooms::end_room).post(rooms::end_room))
        .route(
            "/get_room_list",
            get(rooms::get_room_list).post(rooms::get_room_list),
        )
        .route("/join_room", get(rooms::join_room).post(rooms::join_room))
        .route("/leave_room", get(rooms::leave_room).post(rooms::leave_room))
        .route(
            "/get_room_user_list",
            get(rooms::get_room_user_list).post(rooms::get_room_user_list),
        )
        .route("/heartbeat", get(rooms::heartbeat).post(rooms::heartbeat))
        .route(
            "/check_heartbeat",
            get(rooms::check_heartbeat).post(rooms::check_heartbeat),
        )
}
