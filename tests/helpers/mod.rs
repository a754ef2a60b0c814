#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use flashdeck::db;
use flashdeck::study;
use flashdeck::study::types::{Card, NewCard};
use rusqlite::Connection;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.pragma_update(None, "foreign_keys", "ON").unwrap();
    db::schema::init_schema(&conn).unwrap();
    db::migrations::run_migrations(&conn).unwrap();
    conn
}

/// A fixed instant so due-date assertions are exact.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap()
}

pub fn new_card(front: &str, back: &str) -> NewCard {
    NewCard {
        front: front.to_string(),
        back: back.to_string(),
        ..Default::default()
    }
}

/// Create a deck for `user` holding `n` cards, all due at `now`. Returns (deck_id, cards).
pub fn seed_deck(
    conn: &mut Connection,
    user: &str,
    n: usize,
    now: DateTime<Utc>,
) -> (String, Vec<Card>) {
    let deck = study::decks::create_deck(conn, user, "Test deck", None).unwrap();
    let cards: Vec<NewCard> = (0..n)
        .map(|i| new_card(&format!("Q{i}"), &format!("A{i}")))
        .collect();
    let created = study::cards::add_cards(conn, user, &deck.id, &cards, now).unwrap();
    (deck.id, created)
}

/// Count rows in a table.
pub fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}
