//! API integration tests
//!
//! Each test starts its own server on an ephemeral port. Tests named
//! `redis_*` need a reachable Redis at `REDIS_URL` and are skipped otherwise.

use integration_tests::paths::*;
use integration_tests::*;
use reqwest::StatusCode;
use room_core::{PresenceRecord, RoomSummary};
use room_service::{OpResponse, SweepReport};
use serde_json::Value;

async fn room_ids(server: &TestServer) -> Vec<String> {
    let rooms: OpResponse<Vec<RoomSummary>> = server.op(GET_ROOM_LIST, &[]).await.unwrap();
    assert_eq!(rooms.code, 0);
    rooms
        .data
        .unwrap_or_default()
        .into_iter()
        .map(|room| room.room_id)
        .collect()
}

async fn users(server: &TestServer, room: &RoomFixture) -> OpResponse<Vec<PresenceRecord>> {
    server
        .op(GET_ROOM_USER_LIST, &room.room_query())
        .await
        .unwrap()
}

// ============================================================================
// Health Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/health").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ok");

    let response = server.get("/health/ready").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["backend"], "memory");
}

#[tokio::test]
async fn test_request_id_echoed() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/health").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Room Tests
// ============================================================================

#[tokio::test]
async fn test_create_room_and_duplicate() {
    let server = TestServer::start().await.unwrap();
    let room = RoomFixture::unique();

    let created: OpResponse = server.op(CREATE_ROOM, &room.create_query()).await.unwrap();
    assert!(created.is_success());
    assert_eq!(created.message, "success");

    let again: OpResponse = server.op(CREATE_ROOM, &room.create_query()).await.unwrap();
    assert_eq!(again.code, 1003);
    assert_eq!(again.message, format!("room already exists: {}", room.room_id));

    assert_eq!(room_ids(&server).await, vec![room.room_id.clone()]);
}

#[tokio::test]
async fn test_post_accepts_query_parameters() {
    let server = TestServer::start().await.unwrap();
    let room = RoomFixture::unique();

    let response = server
        .post_query(CREATE_ROOM, &room.create_query())
        .await
        .unwrap();
    let body: OpResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.is_success());
}

#[tokio::test]
async fn test_end_room_removes_it() {
    let server = TestServer::start().await.unwrap();
    let room = RoomFixture::unique();
    let other = RoomFixture::unique();

    server.op::<Value>(CREATE_ROOM, &room.create_query()).await.unwrap();
    server.op::<Value>(CREATE_ROOM, &other.create_query()).await.unwrap();

    let ended: OpResponse = server.op(END_ROOM, &room.room_query()).await.unwrap();
    assert!(ended.is_success());
    assert_eq!(room_ids(&server).await, vec![other.room_id.clone()]);

    let again: OpResponse = server.op(END_ROOM, &room.room_query()).await.unwrap();
    assert_eq!(again.code, 1001);
}

#[tokio::test]
async fn test_missing_parameter_rejected() {
    let server = TestServer::start().await.unwrap();
    let room = RoomFixture::unique();

    let response = server
        .get_query(CREATE_ROOM, &room.room_query())
        .await
        .unwrap();
    let body: OpResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.code, 1008);

    // Nothing was created
    assert!(room_ids(&server).await.is_empty());
}

#[tokio::test]
async fn test_empty_parameter_rejected() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .get_query(END_ROOM, &[("RoomID", "")])
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Presence Tests
// ============================================================================

#[tokio::test]
async fn test_join_and_leave() {
    let server = TestServer::start().await.unwrap();
    let room = RoomFixture::unique();
    let alice = UserFixture::unique();
    let bob = UserFixture::unique();

    server.op::<Value>(CREATE_ROOM, &room.create_query()).await.unwrap();

    let joined: OpResponse = server.op(JOIN_ROOM, &room.join_query(&alice)).await.unwrap();
    assert!(joined.is_success());
    let joined: OpResponse = server.op(JOIN_ROOM, &room.join_query(&bob)).await.unwrap();
    assert!(joined.is_success());

    let twice: OpResponse = server.op(JOIN_ROOM, &room.join_query(&alice)).await.unwrap();
    assert_eq!(twice.code, 1004);

    let listed = users(&server, &room).await;
    let records = listed.data.unwrap();
    assert_eq!(records.len(), 2);
    let record = records.iter().find(|r| r.user_id == alice.user_id).unwrap();
    assert_eq!(record.user_name, alice.user_name);
    assert_eq!(record.join_time, record.heartbeat_time);

    let left: OpResponse = server.op(LEAVE_ROOM, &room.user_query(&alice)).await.unwrap();
    assert!(left.is_success());
    let again: OpResponse = server.op(LEAVE_ROOM, &room.user_query(&alice)).await.unwrap();
    assert_eq!(again.code, 1002);

    let remaining = users(&server, &room).await.data.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].user_id, bob.user_id);
}

#[tokio::test]
async fn test_join_unknown_room() {
    let server = TestServer::start().await.unwrap();
    let room = RoomFixture::unique();
    let alice = UserFixture::unique();

    let joined: OpResponse = server.op(JOIN_ROOM, &room.join_query(&alice)).await.unwrap();
    assert_eq!(joined.code, 1001);
    assert_eq!(joined.message, format!("room not exists: {}", room.room_id));
}

#[tokio::test]
async fn test_heartbeat_keeps_user_alive() {
    let server = TestServer::start().await.unwrap();
    let room = RoomFixture::unique();
    let alice = UserFixture::unique();

    server.op::<Value>(CREATE_ROOM, &room.create_query()).await.unwrap();
    server.op::<Value>(JOIN_ROOM, &room.join_query(&alice)).await.unwrap();

    for _ in 0..3 {
        tokio::time::sleep(std::time::Duration::from_millis(TEST_HEARTBEAT_TIMEOUT_MS / 3)).await;
        let beat: OpResponse = server.op(HEARTBEAT, &room.user_query(&alice)).await.unwrap();
        assert_eq!(beat.code, 0);
        assert_eq!(beat.message, "heartbeat success");
    }

    let report: OpResponse<SweepReport> = server.op(CHECK_HEARTBEAT, &[]).await.unwrap();
    assert_eq!(report.data.unwrap().users_evicted, 0);

    let records = users(&server, &room).await.data.unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].heartbeat_time > records[0].join_time);
}

#[tokio::test]
async fn test_stale_heartbeat_rejected() {
    let server = TestServer::start().await.unwrap();
    let room = RoomFixture::unique();
    let alice = UserFixture::unique();

    server.op::<Value>(CREATE_ROOM, &room.create_query()).await.unwrap();
    server.op::<Value>(JOIN_ROOM, &room.join_query(&alice)).await.unwrap();

    wait_past_threshold().await;

    let beat: OpResponse = server.op(HEARTBEAT, &room.user_query(&alice)).await.unwrap();
    assert_eq!(beat.code, 1005);
}

// ============================================================================
// End-to-end Scenarios
// ============================================================================

async fn expiry_scenario(server: &TestServer) {
    let room = RoomFixture::unique();
    let alice = UserFixture::unique();

    server.op::<Value>(CREATE_ROOM, &room.create_query()).await.unwrap();
    server.op::<Value>(JOIN_ROOM, &room.join_query(&alice)).await.unwrap();
    assert_eq!(users(server, &room).await.data.unwrap().len(), 1);

    wait_past_threshold().await;

    let report: OpResponse<SweepReport> = server.op(CHECK_HEARTBEAT, &[]).await.unwrap();
    let report = report.data.unwrap();
    assert!(report.users_evicted >= 1);
    assert!(report.is_clean());

    // The user is gone but the room stays until it is ended
    assert!(users(server, &room).await.data.unwrap().is_empty());
    assert!(room_ids(server).await.contains(&room.room_id));

    let ended: OpResponse = server.op(END_ROOM, &room.room_query()).await.unwrap();
    assert!(ended.is_success());
    assert!(!room_ids(server).await.contains(&room.room_id));
}

#[tokio::test]
async fn test_expired_user_evicted_and_room_ended() {
    let server = TestServer::start().await.unwrap();
    expiry_scenario(&server).await;
}

#[tokio::test]
async fn test_background_sweeper_evicts() {
    let mut server = TestServer::start_with_sweeper().await.unwrap();
    let room = RoomFixture::unique();
    let alice = UserFixture::unique();

    server.op::<Value>(CREATE_ROOM, &room.create_query()).await.unwrap();
    server.op::<Value>(JOIN_ROOM, &room.join_query(&alice)).await.unwrap();

    // Past the threshold plus a few sweep periods
    tokio::time::sleep(std::time::Duration::from_millis(TEST_HEARTBEAT_TIMEOUT_MS * 3)).await;

    assert!(users(&server, &room).await.data.unwrap().is_empty());
    server.stop_sweeper().await;
}

// ============================================================================
// Redis Tests
// ============================================================================

#[tokio::test]
async fn redis_expired_user_evicted_and_room_ended() {
    let Some(config) = check_redis_env() else {
        return;
    };
    let server = TestServer::start_with_config(config, false).await.unwrap();

    let response = server.get("/health/ready").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["backend"], "redis");

    expiry_scenario(&server).await;
}

#[tokio::test]
async fn redis_concurrent_joins_all_recorded() {
    let Some(config) = check_redis_env() else {
        return;
    };
    let server = std::sync::Arc::new(TestServer::start_with_config(config, false).await.unwrap());
    let room = RoomFixture::unique();
    server.op::<Value>(CREATE_ROOM, &room.create_query()).await.unwrap();

    let joins = (0..8).map(|_| {
        let server = server.clone();
        let room = room.clone();
        tokio::spawn(async move {
            let user = UserFixture::unique();
            let joined: OpResponse = server.op(JOIN_ROOM, &room.join_query(&user)).await.unwrap();
            assert!(joined.is_success(), "{}", joined.message);
        })
    });
    for join in joins.collect::<Vec<_>>() {
        join.await.unwrap();
    }

    assert_eq!(users(&server, &room).await.data.unwrap().len(), 8);

    server.op::<Value>(END_ROOM, &room.room_query()).await.unwrap();
}
