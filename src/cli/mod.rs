pub mod doctor;
pub mod export;
pub mod import;
pub mod review;
pub mod stats;

use anyhow::Result;
use rusqlite::Connection;

use flashdeck::config::FlashdeckConfig;

/// Open the configured database for a one-shot CLI command.
fn open(config: &FlashdeckConfig) -> Result<Connection> {
    let db_path = config.resolved_db_path();
    flashdeck::db::open_database(&db_path)
}
