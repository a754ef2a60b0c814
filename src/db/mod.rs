pub mod migrations;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

/// Milliseconds SQLite waits on a locked database before returning `SQLITE_BUSY`.
const BUSY_TIMEOUT_MS: u64 = 5000;

/// Open (or create) the flashdeck database at the given path, with schema
/// initialized and migrations applied.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open database at {}", path.display()))?;

    // WAL lets readers proceed while a review transaction holds the write lock
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(std::time::Duration::from_millis(BUSY_TIMEOUT_MS))?;

    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&conn).context("failed to run migrations")?;

    tracing::info!(path = %path.display(), "database initialized");
    Ok(conn)
}

/// Open an in-memory database with schema and migrations applied.
pub fn open_memory_database() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&conn).context("failed to run migrations")?;
    Ok(conn)
}

/// Result of [`check_database_health`].
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub schema_version: u32,
    pub sqlite_version: String,
    pub deck_count: u64,
    pub card_count: u64,
    pub schedule_count: u64,
    pub review_count: u64,
    /// Cards with no schedule row; should always be zero.
    pub orphan_cards: u64,
    pub integrity_ok: bool,
    pub integrity_details: String,
}

/// Run `PRAGMA integrity_check` and collect row counts.
pub fn check_database_health(conn: &Connection) -> rusqlite::Result<HealthReport> {
    let schema_version = migrations::get_schema_version(conn)?;
    let sqlite_version: String = conn.query_row("SELECT sqlite_version()", [], |r| r.get(0))?;

    let count = |table: &str| -> rusqlite::Result<u64> {
        let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
        Ok(n as u64)
    };

    let orphan_cards: i64 = conn.query_row(
        "SELECT COUNT(*) FROM cards c LEFT JOIN schedules s ON s.card_id = c.id WHERE s.card_id IS NULL",
        [],
        |r| r.get(0),
    )?;

    let integrity_details: String =
        conn.query_row("PRAGMA integrity_check", [], |r| r.get(0))?;

    Ok(HealthReport {
        schema_version,
        sqlite_version,
        deck_count: count("decks")?,
        card_count: count("cards")?,
        schedule_count: count("schedules")?,
        review_count: count("reviews")?,
        orphan_cards: orphan_cards as u64,
        integrity_ok: integrity_details == "ok",
        integrity_details,
    })
}
