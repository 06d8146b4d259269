//! Behaviour every `RoomStore` backend must share, run against each backend

use std::sync::Arc;

use room_core::{PresenceRecord, Room, RoomError, RoomResult, RoomStore, UpdateOutcome};

pub(crate) async fn insert_is_exclusive(store: &dyn RoomStore) {
    let first = Room::new("r1", "R1", "h1");
    assert!(store.insert_room(&first).await.unwrap());

    let second = Room::new("r1", "Other", "h2");
    assert!(!store.insert_room(&second).await.unwrap());

    let stored = store.get_room("r1").await.unwrap().unwrap();
    assert_eq!(stored.room_name, "R1");
    assert_eq!(stored.host_id, "h1");
}

pub(crate) async fn remove_room(store: &dyn RoomStore) {
    let mut room = Room::new("r1", "R1", "h1");
    room.add_user(PresenceRecord::new("u1", "Alice", 1)).unwrap();
    store.insert_room(&room).await.unwrap();

    assert!(store.remove_room("r1").await.unwrap());
    assert!(store.get_room("r1").await.unwrap().is_none());
    assert!(!store.remove_room("r1").await.unwrap());
}

pub(crate) async fn listing(store: &dyn RoomStore) {
    assert!(store.list_rooms().await.unwrap().is_empty());

    store.insert_room(&Room::new("r1", "R1", "h1")).await.unwrap();
    store.insert_room(&Room::new("r2", "R2", "h2")).await.unwrap();

    let mut ids = store.room_ids().await.unwrap();
    ids.sort();
    assert_eq!(ids, vec!["r1".to_string(), "r2".to_string()]);

    let mut names: Vec<String> = store
        .list_rooms()
        .await
        .unwrap()
        .into_iter()
        .map(|room| room.room_name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["R1".to_string(), "R2".to_string()]);
}

pub(crate) async fn update_outcomes(store: &dyn RoomStore) {
    let missing = store
        .update_room("ghost", &mut |_: &mut Room| -> RoomResult<bool> { Ok(true) })
        .await
        .unwrap();
    assert_eq!(missing, UpdateOutcome::Missing);

    store.insert_room(&Room::new("r1", "R1", "h1")).await.unwrap();

    let unchanged = store
        .update_room("r1", &mut |_: &mut Room| -> RoomResult<bool> { Ok(false) })
        .await
        .unwrap();
    assert_eq!(unchanged, UpdateOutcome::Unchanged);

    let written = store
        .update_room("r1", &mut |room: &mut Room| -> RoomResult<bool> {
            room.add_user(PresenceRecord::new("u1", "Alice", 10))?;
            Ok(true)
        })
        .await
        .unwrap();
    assert_eq!(written, UpdateOutcome::Written);

    let stored = store.get_room("r1").await.unwrap().unwrap();
    assert_eq!(stored.users["u1"].user_name, "Alice");
    assert_eq!(stored.users["u1"].heartbeat_time, 10);
}

pub(crate) async fn failed_mutation_writes_nothing(store: &dyn RoomStore) {
    let mut room = Room::new("r1", "R1", "h1");
    room.add_user(PresenceRecord::new("u1", "Alice", 1)).unwrap();
    store.insert_room(&room).await.unwrap();

    let err = store
        .update_room("r1", &mut |room: &mut Room| -> RoomResult<bool> {
            room.add_user(PresenceRecord::new("u1", "Imposter", 2))?;
            Ok(true)
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RoomError::AlreadyJoined { .. }));

    let stored = store.get_room("r1").await.unwrap().unwrap();
    assert_eq!(stored.users["u1"].user_name, "Alice");
}

pub(crate) async fn concurrent_joins_all_survive(store: Arc<dyn RoomStore>) {
    store.insert_room(&Room::new("r1", "R1", "h1")).await.unwrap();

    let joins = (0..32).map(|i| {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            let user_id = format!("u{i:02}");
            store
                .update_room("r1", &mut |room: &mut Room| -> RoomResult<bool> {
                    room.add_user(PresenceRecord::new(user_id.clone(), "user", i))?;
                    Ok(true)
                })
                .await
        })
    });

    for outcome in futures::future::join_all(joins).await {
        assert_eq!(outcome.unwrap().unwrap(), UpdateOutcome::Written);
    }

    let room = store.get_room("r1").await.unwrap().unwrap();
    assert_eq!(room.user_count(), 32);
}
