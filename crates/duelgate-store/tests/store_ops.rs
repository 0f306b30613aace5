//! Integration tests for the match store's conditional operations.

use duelgate_protocol::{
    AttackRange, Fighter, PlayerRef, Room, RoomCode, RoomEvent, RoomStatus,
};
use duelgate_store::{LeaveOutcome, MatchStore, StoreError};

fn code(s: &str) -> RoomCode {
    RoomCode::parse(s).unwrap()
}

fn fighter(id: &str) -> Fighter {
    Fighter {
        player: PlayerRef::new(id),
        display_name: None,
        health: 100,
        attack_range: AttackRange { min: 20, max: 80 },
    }
}

fn player(id: &str) -> PlayerRef {
    PlayerRef::new(id)
}

/// A room with both fighters seated, in `ready`.
async fn seated_room(store: &MatchStore, c: &RoomCode) {
    store
        .insert_room(Room::new(c.clone(), fighter("p1")))
        .await
        .unwrap();
    store.join_room(c, fighter("p2")).await.unwrap();
}

// =========================================================================
// Insert / code uniqueness
// =========================================================================

#[tokio::test]
async fn test_insert_room_rejects_active_duplicate() {
    let store = MatchStore::new();
    let c = code("ABCD");
    store
        .insert_room(Room::new(c.clone(), fighter("p1")))
        .await
        .unwrap();

    let err = store
        .insert_room(Room::new(c.clone(), fighter("p9")))
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::CodeTaken(c));
}

#[tokio::test]
async fn test_completed_room_code_is_recycled_with_clean_log() {
    let store = MatchStore::new();
    let c = code("ABCD");
    seated_room(&store, &c).await;
    store.start_room(&c).await.unwrap();

    // One hit for the win.
    let outcome = store
        .commit_attack(&c, &player("p1"), 100)
        .await
        .unwrap();
    assert!(outcome.game_over);
    assert_eq!(store.room(&c).await.unwrap().status, RoomStatus::Completed);

    // The code is free again; the stale log must not leak through.
    store
        .insert_room(Room::new(c.clone(), fighter("p3")))
        .await
        .unwrap();
    assert_eq!(store.recent_logs(&c, 10).await.unwrap(), vec![]);
    assert_eq!(store.last_attacker(&c).await.unwrap(), None);
    assert_eq!(store.room(&c).await.unwrap().status, RoomStatus::Open);
}

#[tokio::test]
async fn test_active_codes_excludes_terminal_rooms() {
    let store = MatchStore::new();
    let finished = code("AAAA");
    seated_room(&store, &finished).await;
    store.start_room(&finished).await.unwrap();
    store
        .commit_attack(&finished, &player("p1"), 100)
        .await
        .unwrap();

    let open = code("BBBB");
    store
        .insert_room(Room::new(open.clone(), fighter("p5")))
        .await
        .unwrap();

    assert_eq!(store.active_codes().await, vec![open]);
    assert_eq!(store.room_count().await, 2);
}

// =========================================================================
// Join
// =========================================================================

#[tokio::test]
async fn test_join_advances_room_to_ready() {
    let store = MatchStore::new();
    let c = code("ABCD");
    store
        .insert_room(Room::new(c.clone(), fighter("p1")))
        .await
        .unwrap();

    let room = store.join_room(&c, fighter("p2")).await.unwrap();
    assert_eq!(room.status, RoomStatus::Ready);
    assert_eq!(
        room.player_two.as_ref().map(|f| f.player.as_str()),
        Some("p2")
    );
    // Player one still moves first.
    assert_eq!(room.current_turn, Some(player("p1")));
}

#[tokio::test]
async fn test_join_unknown_code_is_not_found() {
    let store = MatchStore::new();
    let err = store
        .join_room(&code("QQQQ"), fighter("p2"))
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::NotFound(code("QQQQ")));
}

#[tokio::test]
async fn test_join_full_room_is_rejected() {
    let store = MatchStore::new();
    let c = code("ABCD");
    seated_room(&store, &c).await;

    let err = store.join_room(&c, fighter("p3")).await.unwrap_err();
    assert_eq!(err, StoreError::RoomFull(c));
}

#[tokio::test]
async fn test_creator_cannot_take_the_second_seat() {
    let store = MatchStore::new();
    let c = code("ABCD");
    store
        .insert_room(Room::new(c.clone(), fighter("p1")))
        .await
        .unwrap();

    let err = store.join_room(&c, fighter("p1")).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidState(_)));
}

// =========================================================================
// Start
// =========================================================================

#[tokio::test]
async fn test_start_is_idempotent_once_playing() {
    let store = MatchStore::new();
    let c = code("ABCD");
    seated_room(&store, &c).await;

    let room = store.start_room(&c).await.unwrap();
    assert_eq!(room.status, RoomStatus::Playing);
    let room = store.start_room(&c).await.unwrap();
    assert_eq!(room.status, RoomStatus::Playing);
}

#[tokio::test]
async fn test_start_requires_a_second_player() {
    let store = MatchStore::new();
    let c = code("ABCD");
    store
        .insert_room(Room::new(c.clone(), fighter("p1")))
        .await
        .unwrap();

    let err = store.start_room(&c).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidState(_)));
}

// =========================================================================
// Leave
// =========================================================================

#[tokio::test]
async fn test_creator_leaving_deletes_the_room() {
    let store = MatchStore::new();
    let c = code("ABCD");
    seated_room(&store, &c).await;

    let outcome = store.leave_room(&c, &player("p1")).await.unwrap();
    assert_eq!(outcome, LeaveOutcome::Deleted);
    assert_eq!(
        store.room(&c).await.unwrap_err(),
        StoreError::NotFound(c)
    );
}

#[tokio::test]
async fn test_player_two_leaving_reopens_the_room() {
    let store = MatchStore::new();
    let c = code("ABCD");
    seated_room(&store, &c).await;
    store.start_room(&c).await.unwrap();
    store
        .commit_attack(&c, &player("p1"), 30)
        .await
        .unwrap();

    let outcome = store.leave_room(&c, &player("p2")).await.unwrap();
    let LeaveOutcome::Reverted(room) = outcome else {
        panic!("expected revert, got {outcome:?}");
    };
    assert_eq!(room.status, RoomStatus::Open);
    assert!(room.player_two.is_none());
    assert_eq!(room.current_turn, Some(player("p1")));
    // The log resets with the match.
    assert_eq!(store.recent_logs(&c, 10).await.unwrap(), vec![]);
}

#[tokio::test]
async fn test_leave_is_idempotent_for_player_two() {
    let store = MatchStore::new();
    let c = code("ABCD");
    seated_room(&store, &c).await;

    let first = store.leave_room(&c, &player("p2")).await.unwrap();
    assert!(matches!(first, LeaveOutcome::Reverted(_)));

    // Second call: p2 is no longer a participant, so this is a no-op,
    // not an error, and the room stays open.
    let second = store.leave_room(&c, &player("p2")).await.unwrap();
    let LeaveOutcome::NoOp(room) = second else {
        panic!("expected no-op, got {second:?}");
    };
    assert_eq!(room.status, RoomStatus::Open);
    assert!(room.player_two.is_none());
}

#[tokio::test]
async fn test_player_two_leave_after_completion_is_a_noop() {
    let store = MatchStore::new();
    let c = code("ABCD");
    seated_room(&store, &c).await;
    store.start_room(&c).await.unwrap();
    store
        .commit_attack(&c, &player("p1"), 100)
        .await
        .unwrap();

    let outcome = store.leave_room(&c, &player("p2")).await.unwrap();
    assert!(matches!(outcome, LeaveOutcome::NoOp(_)));
    assert_eq!(store.room(&c).await.unwrap().status, RoomStatus::Completed);
}

// =========================================================================
// Attack transaction
// =========================================================================

#[tokio::test]
async fn test_player_one_must_move_first() {
    let store = MatchStore::new();
    let c = code("ABCD");
    seated_room(&store, &c).await;
    store.start_room(&c).await.unwrap();

    let err = store
        .commit_attack(&c, &player("p2"), 30)
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::OutOfTurn(player("p2"), c.clone()));

    let outcome = store
        .commit_attack(&c, &player("p1"), 30)
        .await
        .unwrap();
    assert_eq!(outcome.new_health, 70);
    assert_eq!(outcome.target_player, player("p2"));
    assert!(!outcome.game_over);
}

#[tokio::test]
async fn test_turns_strictly_alternate() {
    let store = MatchStore::new();
    let c = code("ABCD");
    seated_room(&store, &c).await;
    store.start_room(&c).await.unwrap();

    store.commit_attack(&c, &player("p1"), 10).await.unwrap();
    // Same attacker again: the stored turn moved on.
    let err = store
        .commit_attack(&c, &player("p1"), 10)
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::OutOfTurn(player("p1"), c.clone()));

    store.commit_attack(&c, &player("p2"), 10).await.unwrap();
    store.commit_attack(&c, &player("p1"), 10).await.unwrap();

    // The log alternates p1, p2, p1 with monotone sequence numbers.
    let logs = store.recent_logs(&c, 10).await.unwrap();
    let attackers: Vec<&str> =
        logs.iter().rev().map(|e| e.attacker.as_str()).collect();
    assert_eq!(attackers, vec!["p1", "p2", "p1"]);
    let seqs: Vec<u64> = logs.iter().rev().map(|e| e.seq).collect();
    assert_eq!(seqs, vec![1, 2, 3]);
    assert_eq!(store.last_attacker(&c).await.unwrap(), Some(player("p1")));
}

#[tokio::test]
async fn test_health_clamps_at_zero_and_completes_the_room() {
    let store = MatchStore::new();
    let c = code("ABCD");
    seated_room(&store, &c).await;
    store.start_room(&c).await.unwrap();

    store.commit_attack(&c, &player("p1"), 10).await.unwrap();
    // Overkill damage clamps to exactly zero.
    let outcome = store
        .commit_attack(&c, &player("p2"), 150)
        .await
        .unwrap();
    assert_eq!(outcome.new_health, 0);
    assert_eq!(outcome.target_player, player("p1"));
    assert!(outcome.game_over);

    let room = store.room(&c).await.unwrap();
    assert_eq!(room.status, RoomStatus::Completed);
    assert_eq!(room.current_turn, None);
    assert_eq!(room.player_one.health, 0);

    // Nobody can attack a completed room.
    let err = store
        .commit_attack(&c, &player("p1"), 10)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidState(_)));
}

#[tokio::test]
async fn test_first_attack_in_ready_starts_the_match() {
    let store = MatchStore::new();
    let c = code("ABCD");
    seated_room(&store, &c).await;

    // No explicit start(): the clients raced their countdowns and one
    // fired first.
    store.commit_attack(&c, &player("p1"), 20).await.unwrap();
    assert_eq!(store.room(&c).await.unwrap().status, RoomStatus::Playing);
}

#[tokio::test]
async fn test_attack_requires_an_opponent() {
    let store = MatchStore::new();
    let c = code("ABCD");
    store
        .insert_room(Room::new(c.clone(), fighter("p1")))
        .await
        .unwrap();

    let err = store
        .commit_attack(&c, &player("p1"), 30)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidState(_)));
}

#[tokio::test]
async fn test_attack_by_outsider_is_rejected() {
    let store = MatchStore::new();
    let c = code("ABCD");
    seated_room(&store, &c).await;
    store.start_room(&c).await.unwrap();

    let err = store
        .commit_attack(&c, &player("intruder"), 30)
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::NotParticipant(player("intruder"), c));
}

#[tokio::test]
async fn test_concurrent_attacks_admit_exactly_one() {
    let store = MatchStore::new();
    let c = code("ABCD");
    seated_room(&store, &c).await;
    store.start_room(&c).await.unwrap();

    // Both clients fire p1's turn at once (a retry after a timeout
    // looks exactly like this). The CAS lets one through.
    let p1 = player("p1");
    let (a, b) = tokio::join!(
        store.commit_attack(&c, &p1, 30),
        store.commit_attack(&c, &p1, 30),
    );
    assert_eq!(
        a.is_ok() as u8 + b.is_ok() as u8,
        1,
        "exactly one of two racing attacks must win: {a:?} / {b:?}"
    );
    let loser = if a.is_err() { a } else { b };
    assert_eq!(
        loser.unwrap_err(),
        StoreError::OutOfTurn(player("p1"), c.clone())
    );

    // Only one log entry landed, health dropped once.
    assert_eq!(store.recent_logs(&c, 10).await.unwrap().len(), 1);
    let room = store.room(&c).await.unwrap();
    assert_eq!(room.player_two.unwrap().health, 70);
}

// =========================================================================
// Change feed
// =========================================================================

#[tokio::test]
async fn test_feed_delivers_events_in_commit_order() {
    let store = MatchStore::new();
    let c = code("ABCD");
    store
        .insert_room(Room::new(c.clone(), fighter("p1")))
        .await
        .unwrap();

    let mut rx = store.subscribe(&c).await;
    store.join_room(&c, fighter("p2")).await.unwrap();
    store.start_room(&c).await.unwrap();
    store.commit_attack(&c, &player("p1"), 30).await.unwrap();

    // join → room, start → room, attack → room then log.
    let RoomEvent::Room(room) = rx.recv().await.unwrap() else {
        panic!("expected room event");
    };
    assert_eq!(room.status, RoomStatus::Ready);
    let RoomEvent::Room(room) = rx.recv().await.unwrap() else {
        panic!("expected room event");
    };
    assert_eq!(room.status, RoomStatus::Playing);
    let RoomEvent::Room(room) = rx.recv().await.unwrap() else {
        panic!("expected room event");
    };
    assert_eq!(
        room.player_two.as_ref().map(|f| f.health),
        Some(70)
    );
    let RoomEvent::Log(entry) = rx.recv().await.unwrap() else {
        panic!("expected log event");
    };
    assert_eq!(entry.damage, 30);
    assert_eq!(entry.seq, 1);
}

#[tokio::test]
async fn test_feed_reports_deletion_then_closes() {
    let store = MatchStore::new();
    let c = code("ABCD");
    store
        .insert_room(Room::new(c.clone(), fighter("p1")))
        .await
        .unwrap();

    let mut rx = store.subscribe(&c).await;
    store.leave_room(&c, &player("p1")).await.unwrap();

    assert_eq!(
        rx.recv().await.unwrap(),
        RoomEvent::RoomDeleted(c.clone())
    );
    assert!(rx.recv().await.is_err(), "feed should close after deletion");
}
