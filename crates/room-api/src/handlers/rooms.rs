//! Room operation handlers
//!
//! Each handler maps query parameters onto one room operation and answers
//! with its result envelope.

use axum::{extract::State, Json};
use room_core::{PresenceRecord, RoomSummary};
use room_service::{
    CreateRoomRequest, JoinRoomRequest, OpResponse, RoomOperation, RoomRequest, RoomUserRequest,
    SweepReport,
};

use crate::extractors::ValidatedQuery;
use crate::state::AppState;

/// Create a room
///
/// GET|POST /api/room/create_room?RoomID=&RoomName=&HostID=
pub async fn create_room(
    State(state): State<AppState>,
    ValidatedQuery(req): ValidatedQuery<CreateRoomRequest>,
) -> Json<OpResponse> {
    let result = state
        .rooms()
        .create_room(&req.room_id, &req.room_name, &req.host_id)
        .await;
    Json(OpResponse::from_unit(RoomOperation::CreateRoom, result))
}

/// End a room
///
/// GET|POST /api/room/end_room?RoomID=
pub async fn end_room(
    State(state): State<AppState>,
    ValidatedQuery(req): ValidatedQuery<RoomRequest>,
) -> Json<OpResponse> {
    let result = state.rooms().end_room(&req.room_id).await;
    Json(OpResponse::from_unit(RoomOperation::EndRoom, result))
}

/// List rooms
///
/// GET|POST /api/room/get_room_list
pub async fn get_room_list(State(state): State<AppState>) -> Json<OpResponse<Vec<RoomSummary>>> {
    let result = state.rooms().list_rooms().await;
    Json(OpResponse::from_result(RoomOperation::ListRooms, result))
}

/// Join a room
///
/// GET|POST /api/room/join_room?RoomID=&UserID=&UserName=
pub async fn join_room(
    State(state): State<AppState>,
    ValidatedQuery(req): ValidatedQuery<JoinRoomRequest>,
) -> Json<OpResponse> {
    let result = state
        .rooms()
        .join_room(&req.room_id, &req.user_id, &req.user_name)
        .await;
    Json(OpResponse::from_unit(RoomOperation::JoinRoom, result))
}

/// Leave a room
///
/// GET|POST /api/room/leave_room?RoomID=&UserID=
pub async fn leave_room(
    State(state): State<AppState>,
    ValidatedQuery(req): ValidatedQuery<RoomUserRequest>,
) -> Json<OpResponse> {
    let result = state.rooms().leave_room(&req.room_id, &req.user_id).await;
    Json(OpResponse::from_unit(RoomOperation::LeaveRoom, result))
}

/// List the users present in a room
///
/// GET|POST /api/room/get_room_user_list?RoomID=
pub async fn get_room_user_list(
    State(state): State<AppState>,
    ValidatedQuery(req): ValidatedQuery<RoomRequest>,
) -> Json<OpResponse<Vec<PresenceRecord>>> {
    let result = state.rooms().list_users(&req.room_id).await;
    Json(OpResponse::from_result(RoomOperation::ListUsers, result))
}

/// Refresh a user's heartbeat
///
/// GET|POST /api/room/heartbeat?RoomID=&UserID=
pub async fn heartbeat(
    State(state): State<AppState>,
    ValidatedQuery(req): ValidatedQuery<RoomUserRequest>,
) -> Json<OpResponse> {
    let result = state.rooms().heartbeat(&req.room_id, &req.user_id).await;
    Json(OpResponse::from_unit(RoomOperation::Heartbeat, result))
}

/// Run an expiry sweep now
///
/// GET|POST /api/room/check_heartbeat
pub async fn check_heartbeat(State(state): State<AppState>) -> Json<OpResponse<SweepReport>> {
    let result = state.rooms().sweep_expired().await;
    Json(OpResponse::from_result(RoomOperation::Sweep, result))
}
