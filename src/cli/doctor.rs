//! CLI `doctor` command: run database diagnostics and print a health report.

use anyhow::{Context, Result};

use flashdeck::config::FlashdeckConfig;
use flashdeck::db;

/// Run database diagnostics and print a health report.
pub fn doctor(config: &FlashdeckConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `flashdeck serve` or `flashdeck import <file>` to initialize.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path)
        .map(|m| m.len())
        .unwrap_or(0);

    let conn = db::open_database(&db_path)
        .context("failed to open database (may be corrupt)")?;

    let report = db::check_database_health(&conn)
        .context("failed to run health check")?;

    println!("flashdeck Health Report");
    println!("=======================");
    println!();
    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!("SQLite:            v{}", report.sqlite_version);
    println!();
    println!("Row counts:");
    println!("  Decks:           {}", report.deck_count);
    println!("  Cards:           {}", report.card_count);
    println!("  Schedules:       {}", report.schedule_count);
    println!("  Reviews:         {}", report.review_count);
    if report.orphan_cards > 0 {
        println!("  WARNING: {} card(s) have no schedule and will never come due.", report.orphan_cards);
    }
    println!();
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
        println!();
        println!("Recovery steps:");
        println!("  1. Restore from a backup: cp backup.db ~/.flashdeck/flashdeck.db");
        println!("  2. Or export each deck from a good copy and reimport:");
        println!("     flashdeck export <deck-id> > deck.json");
        println!("     flashdeck import deck.json");
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
