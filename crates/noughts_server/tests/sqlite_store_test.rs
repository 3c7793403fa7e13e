//! Tests for the SQLite directories.

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use noughts_engine::{Game, GameId, PlayerId, StatDelta};
use noughts_server::{GameDirectory, GameRecord, PlayerDirectory, SqliteStore, StoreError};
use tempfile::NamedTempFile;

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready store.
fn setup_test_db() -> (NamedTempFile, SqliteStore) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let store = SqliteStore::new(db_path);
    store.run_migrations().expect("Migrations failed");
    (db_file, store)
}

/// Writes `state` straight into a game row, bypassing the store.
fn overwrite_state(store: &SqliteStore, id: GameId, state: &str) {
    let mut conn = SqliteConnection::establish(store.db_path()).expect("Failed to connect");
    diesel::sql_query("UPDATE games SET state = ? WHERE id = ?")
        .bind::<Text, _>(state)
        .bind::<Integer, _>(id.get())
        .execute(&mut conn)
        .expect("Update failed");
}

fn play_top_row_win(store: &SqliteStore, mut record: GameRecord) -> GameRecord {
    let x = *record.game().player_x();
    let o = *record.game().player_o();
    for (player, row, col) in [(x, 0, 0), (o, 1, 0), (x, 0, 1), (o, 1, 1), (x, 0, 2)] {
        let report = record.game_mut().apply_move(player, row, col).unwrap();
        record = store.commit_game(&record, report.deltas()).unwrap();
    }
    record
}

fn two_players(store: &SqliteStore) -> (PlayerId, PlayerId) {
    let a = store.create_player("alice", Some("alice@example.com")).unwrap();
    let b = store.create_player("bob", None).unwrap();
    (*a.id(), *b.id())
}

#[test]
fn test_migrations_are_idempotent() {
    let (_db, store) = setup_test_db();
    assert_eq!(store.run_migrations().unwrap(), 0);
}

#[test]
fn test_create_player() {
    let (_db, store) = setup_test_db();
    let player = store.create_player("alice", Some("a@example.com")).unwrap();
    assert_eq!(player.name(), "alice");
    assert_eq!(player.email().as_deref(), Some("a@example.com"));
    assert_eq!(*player.games_in_progress(), 0);
    assert!(player.id().get() > 0);
}

#[test]
fn test_duplicate_name_fails() {
    let (_db, store) = setup_test_db();
    store.create_player("bob", None).unwrap();
    let err = store.create_player("bob", None).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateName { ref name } if name == "bob"));
}

#[test]
fn test_lookup_by_name_and_id() {
    let (_db, store) = setup_test_db();
    let (a, _) = two_players(&store);

    let found = store.player_by_name("alice").unwrap().unwrap();
    assert_eq!(*found.id(), a);
    assert!(store.player_by_name("nobody").unwrap().is_none());
    assert_eq!(store.player(a).unwrap().unwrap().name(), "alice");
    assert!(store.player(PlayerId::new(999)).unwrap().is_none());
}

#[test]
fn test_list_players_in_registration_order() {
    let (_db, store) = setup_test_db();
    for name in ["gamma", "alpha", "beta"] {
        store.create_player(name, None).unwrap();
    }
    let names: Vec<_> = store
        .list_players()
        .unwrap()
        .into_iter()
        .map(|p| p.name().clone())
        .collect();
    assert_eq!(names, ["gamma", "alpha", "beta"]);
}

#[test]
fn test_insert_game_bumps_in_progress() {
    let (_db, store) = setup_test_db();
    let (a, b) = two_players(&store);

    let (game, started) = Game::new(a, b).unwrap();
    let record = store.insert_game(&game, &started).unwrap();

    assert_eq!(*record.version(), 0);
    assert_eq!(store.game(*record.id()).unwrap().unwrap().game(), &game);
    assert_eq!(*store.player(a).unwrap().unwrap().games_in_progress(), 1);
    assert_eq!(*store.player(b).unwrap().unwrap().games_in_progress(), 1);
}

#[test]
fn test_commit_persists_snapshot_and_counters() {
    let (_db, store) = setup_test_db();
    let (a, b) = two_players(&store);
    let (game, started) = Game::new(a, b).unwrap();
    let mut record = store.insert_game(&game, &started).unwrap();

    for (player, row, col) in [(a, 0, 0), (b, 1, 0), (a, 0, 1), (b, 1, 1)] {
        let report = record.game_mut().apply_move(player, row, col).unwrap();
        record = store.commit_game(&record, report.deltas()).unwrap();
    }
    let report = record.game_mut().apply_move(a, 0, 2).unwrap();
    record = store.commit_game(&record, report.deltas()).unwrap();
    assert_eq!(*record.version(), 5);

    let loaded = store.game(*record.id()).unwrap().unwrap();
    assert_eq!(loaded.game().winner(), Some(a));
    assert_eq!(loaded.game().history().len(), 5);

    let alice = store.player(a).unwrap().unwrap();
    assert_eq!(*alice.games_won(), 1);
    assert_eq!(*alice.games_completed(), 1);
    assert_eq!(*alice.games_in_progress(), 0);
    let bob = store.player(b).unwrap().unwrap();
    assert_eq!(bob.games_lost(), 1);

    assert!(store.active_games_for(a).unwrap().is_empty());
}

#[test]
fn test_stale_commit_is_rejected_and_rolled_back() {
    let (_db, store) = setup_test_db();
    let (a, b) = two_players(&store);
    let (game, started) = Game::new(a, b).unwrap();
    let record = store.insert_game(&game, &started).unwrap();

    let mut first = record.clone();
    let report = first.game_mut().apply_move(a, 0, 0).unwrap();
    store.commit_game(&first, report.deltas()).unwrap();

    let mut second = record;
    let report = second.game_mut().apply_move(a, 2, 2).unwrap();
    let err = store.commit_game(&second, report.deltas()).unwrap_err();
    assert!(matches!(err, StoreError::StaleGame { .. }));

    let loaded = store.game(*second.id()).unwrap().unwrap();
    assert_eq!(loaded.game().board().rows()[0], "X__");
    assert_eq!(loaded.game().board().rows()[2], "___");
}

#[test]
fn test_unknown_player_delta_rolls_back_insert() {
    let (_db, store) = setup_test_db();
    let (a, _) = two_players(&store);
    let ghost = PlayerId::new(999);
    let (game, _) = Game::new(a, ghost).unwrap();

    let err = store
        .insert_game(&game, &[StatDelta::started(a), StatDelta::started(ghost)])
        .unwrap_err();
    assert!(matches!(err, StoreError::UnknownPlayer { id } if id == ghost));
    assert!(store.game(GameId::new(1)).unwrap().is_none());
    assert_eq!(*store.player(a).unwrap().unwrap().games_in_progress(), 0);
}

#[test]
fn test_delete_releases_in_progress() {
    let (_db, store) = setup_test_db();
    let (a, b) = two_players(&store);
    let (game, started) = Game::new(a, b).unwrap();
    let mut record = store.insert_game(&game, &started).unwrap();

    let released = record.game_mut().cancel().unwrap();
    store.delete_game(&record, &released).unwrap();

    assert!(store.game(*record.id()).unwrap().is_none());
    assert_eq!(*store.player(a).unwrap().unwrap().games_in_progress(), 0);
    assert_eq!(*store.player(b).unwrap().unwrap().games_in_progress(), 0);
}

#[test]
fn test_active_games_for_either_seat() {
    let (_db, store) = setup_test_db();
    let (a, b) = two_players(&store);
    let c = *store.create_player("carol", None).unwrap().id();

    let (g1, s1) = Game::new(a, b).unwrap();
    let (g2, s2) = Game::new(c, a).unwrap();
    let (g3, s3) = Game::new(b, c).unwrap();
    store.insert_game(&g1, &s1).unwrap();
    store.insert_game(&g2, &s2).unwrap();
    store.insert_game(&g3, &s3).unwrap();

    let ids: Vec<_> = store
        .active_games_for(a)
        .unwrap()
        .iter()
        .map(|r| r.id().get())
        .collect();
    assert_eq!(ids, [1, 2]);
}

#[test]
fn test_undecodable_snapshot_is_corrupt() {
    let (_db, store) = setup_test_db();
    let (a, b) = two_players(&store);
    let (game, started) = Game::new(a, b).unwrap();
    let record = store.insert_game(&game, &started).unwrap();

    overwrite_state(&store, *record.id(), "{ not json");

    let err = store.game(*record.id()).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { id, .. } if id == *record.id()));
    assert!(matches!(
        store.active_games_for(a).unwrap_err(),
        StoreError::Corrupt { .. }
    ));
}

#[test]
fn test_snapshot_breaking_invariants_is_corrupt() {
    let (_db, store) = setup_test_db();
    let (a, b) = two_players(&store);
    let (game, started) = Game::new(a, b).unwrap();
    let record = store.insert_game(&game, &started).unwrap();

    let mut tampered = serde_json::to_value(record.game()).unwrap();
    tampered["turns_played"] = serde_json::json!(3);
    overwrite_state(&store, *record.id(), &tampered.to_string());

    match store.game(*record.id()).unwrap_err() {
        StoreError::Corrupt { id, reason } => {
            assert_eq!(id, *record.id());
            assert!(!reason.is_empty());
        }
        other => panic!("expected Corrupt, got {other:?}"),
    }
}

#[test]
fn test_stale_delete_is_rejected_and_rolled_back() {
    let (_db, store) = setup_test_db();
    let (a, b) = two_players(&store);
    let (game, started) = Game::new(a, b).unwrap();
    let record = store.insert_game(&game, &started).unwrap();

    let mut moved = record.clone();
    let report = moved.game_mut().apply_move(a, 1, 1).unwrap();
    store.commit_game(&moved, report.deltas()).unwrap();

    let mut outdated = record;
    let released = outdated.game_mut().cancel().unwrap();
    let err = store.delete_game(&outdated, &released).unwrap_err();
    assert!(matches!(err, StoreError::StaleGame { id } if id == *outdated.id()));

    let loaded = store.game(*outdated.id()).unwrap().unwrap();
    assert_eq!(*loaded.version(), 1);
    assert_eq!(*store.player(a).unwrap().unwrap().games_in_progress(), 1);
    assert_eq!(*store.player(b).unwrap().unwrap().games_in_progress(), 1);
}

#[test]
fn test_independent_games_commit_concurrently() {
    let (_db, store) = setup_test_db();
    let mut records = Vec::new();
    for i in 0..8 {
        let x = *store.create_player(&format!("x{i}"), None).unwrap().id();
        let o = *store.create_player(&format!("o{i}"), None).unwrap().id();
        let (game, started) = Game::new(x, o).unwrap();
        records.push(store.insert_game(&game, &started).unwrap());
    }

    let finished: Vec<GameRecord> = std::thread::scope(|scope| {
        let store = &store;
        let handles: Vec<_> = records
            .into_iter()
            .map(|record| scope.spawn(move || play_top_row_win(store, record)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("Worker panicked"))
            .collect()
    });

    for record in &finished {
        assert_eq!(*record.version(), 5);
        let winner = store.player(*record.game().player_x()).unwrap().unwrap();
        assert_eq!(*winner.games_won(), 1);
        assert_eq!(*winner.games_in_progress(), 0);
        let loser = store.player(*record.game().player_o()).unwrap().unwrap();
        assert_eq!(loser.games_lost(), 1);
    }
}

#[test]
fn test_lock_timeout_error_points_at_store() {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let store = SqliteStore::with_busy_timeout(db_path.clone(), Duration::from_millis(50));
    store.run_migrations().expect("Migrations failed");
    let (a, b) = two_players(&store);

    let mut holder = SqliteConnection::establish(&db_path).expect("Failed to connect");
    holder.batch_execute("BEGIN EXCLUSIVE;").expect("Lock failed");

    let (game, started) = Game::new(a, b).unwrap();
    match store.insert_game(&game, &started).unwrap_err() {
        StoreError::Database(err) => {
            assert!(err.message.contains("locked"), "{}", err.message);
            assert!(err.file.ends_with("store.rs"), "{}", err.file);
        }
        other => panic!("expected Database, got {other:?}"),
    }

    holder.batch_execute("ROLLBACK;").expect("Unlock failed");
    store.insert_game(&game, &started).unwrap();
}
