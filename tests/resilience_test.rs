mod helpers;

use flashdeck::db;
use tempfile::TempDir;

#[test]
fn open_creates_new_db_at_nonexistent_path() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("subdir").join("new.db");

    assert!(!db_path.exists());

    let conn = db::open_database(&db_path).unwrap();

    assert!(db_path.exists());
    assert_eq!(helpers::count(&conn, "decks"), 0);
    assert_eq!(helpers::count(&conn, "schedules"), 0);
}

#[test]
fn reopen_keeps_data() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("study.db");

    let deck_id = {
        let mut conn = db::open_database(&db_path).unwrap();
        let (deck_id, _) = helpers::seed_deck(&mut conn, "alice", 2, helpers::t0());
        deck_id
    };

    let conn = db::open_database(&db_path).unwrap();
    let deck = flashdeck::study::decks::get_deck(&conn, "alice", &deck_id).unwrap();
    assert_eq!(deck.card_count, 2);
}

#[test]
fn health_check_passes_on_valid_db() {
    let conn = db::open_memory_database().unwrap();

    let report = db::check_database_health(&conn).unwrap();
    assert!(report.integrity_ok);
    assert_eq!(report.schema_version, db::migrations::CURRENT_SCHEMA_VERSION);
    assert!(!report.sqlite_version.is_empty());
    assert_eq!(report.deck_count, 0);
    assert_eq!(report.card_count, 0);
    assert_eq!(report.review_count, 0);
    assert_eq!(report.orphan_cards, 0);
}

#[test]
fn health_check_reports_orphan_cards() {
    let mut conn = helpers::test_db();
    let (_, cards) = helpers::seed_deck(&mut conn, "alice", 2, helpers::t0());

    conn.execute("DELETE FROM schedules WHERE card_id = ?1", [&cards[0].id])
        .unwrap();

    let report = db::check_database_health(&conn).unwrap();
    assert_eq!(report.card_count, 2);
    assert_eq!(report.schedule_count, 1);
    assert_eq!(report.orphan_cards, 1);
}

#[test]
fn busy_timeout_is_set() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("test.db");

    let conn = db::open_database(&db_path).unwrap();

    let timeout: i64 = conn
        .pragma_query_value(None, "busy_timeout", |row| row.get(0))
        .unwrap();
    assert_eq!(timeout, 5000);
}

#[test]
fn wal_mode_is_enabled() {
    let tmp = TempDir::new().unwrap();
    let conn = db::open_database(tmp.path().join("wal.db")).unwrap();

    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
}

#[test]
fn schema_rejects_ease_below_floor() {
    let mut conn = helpers::test_db();
    let (_, cards) = helpers::seed_deck(&mut conn, "alice", 1, helpers::t0());

    let result = conn.execute(
        "UPDATE schedules SET ease = 1.0 WHERE card_id = ?1",
        [&cards[0].id],
    );
    assert!(result.is_err());
}
