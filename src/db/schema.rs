//! SQL DDL for all flashdeck tables.
//!
//! Defines `decks`, `cards`, `schedules` (one SM-2 record per card), the
//! append-only `reviews` log, and `schema_meta`. All DDL uses `IF NOT EXISTS`
//! for idempotent initialization.

use rusqlite::Connection;

/// All schema DDL statements for the core tables.
const SCHEMA_SQL: &str = r#"
-- Decks
CREATE TABLE IF NOT EXISTS decks (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    card_count INTEGER NOT NULL DEFAULT 0 CHECK(card_count >= 0),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_decks_user ON decks(user_id);

-- Cards
CREATE TABLE IF NOT EXISTS cards (
    id TEXT PRIMARY KEY,
    deck_id TEXT NOT NULL REFERENCES decks(id) ON DELETE CASCADE,
    front TEXT NOT NULL,
    back TEXT NOT NULL,
    code_snippet TEXT,
    difficulty INTEGER CHECK(difficulty IS NULL OR (difficulty >= 1 AND difficulty <= 5)),
    position INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_cards_deck ON cards(deck_id);

-- SM-2 scheduling state, one row per card
CREATE TABLE IF NOT EXISTS schedules (
    card_id TEXT PRIMARY KEY REFERENCES cards(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL,
    deck_id TEXT NOT NULL REFERENCES decks(id) ON DELETE CASCADE,
    ease REAL NOT NULL DEFAULT 2.5 CHECK(ease >= 1.3),
    interval INTEGER NOT NULL DEFAULT 0 CHECK(interval >= 0),
    reps INTEGER NOT NULL DEFAULT 0 CHECK(reps >= 0),
    lapses INTEGER NOT NULL DEFAULT 0 CHECK(lapses >= 0),
    due_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_schedules_user ON schedules(user_id);

-- Review log (append-only)
CREATE TABLE IF NOT EXISTS reviews (
    id TEXT PRIMARY KEY,
    card_id TEXT NOT NULL REFERENCES cards(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL,
    rating INTEGER NOT NULL CHECK(rating >= 0 AND rating <= 5),
    elapsed_ms INTEGER NOT NULL CHECK(elapsed_ms >= 0),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_reviews_card ON reviews(card_id);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
