use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use flashdeck::config::FlashdeckConfig;
use flashdeck::study;

use super::export::DeckFile;

/// Cards inserted per transaction.
const BATCH_SIZE: usize = 100;

/// Import a deck from a JSON file (the format written by `export`).
///
/// Always creates a new deck; imported cards start with fresh schedules.
/// Either every card is imported or no deck is left behind.
pub fn import(config: &FlashdeckConfig, file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read import file: {}", file.display()))?;

    let data: DeckFile = serde_json::from_str(&json).context("failed to parse import JSON")?;
    anyhow::ensure!(!data.cards.is_empty(), "import file contains no cards");
    for (i, card) in data.cards.iter().enumerate() {
        study::cards::validate_new_card(card).with_context(|| format!("card {} is invalid", i + 1))?;
    }

    let mut conn = super::open(config)?;
    let user_id = &config.storage.default_user;

    let deck = study::decks::create_deck(&conn, user_id, &data.title, data.description.as_deref())?;

    println!("Importing {} cards into '{}'...", data.cards.len(), deck.title);

    let pb = ProgressBar::new(data.cards.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:40.cyan/blue} {pos}/{len} cards")
            .context("invalid progress template")?
            .progress_chars("##-"),
    );

    let now = Utc::now();
    for batch in data.cards.chunks(BATCH_SIZE) {
        if let Err(e) = study::cards::add_cards(&mut conn, user_id, &deck.id, batch, now) {
            pb.abandon();
            if let Err(cleanup) = study::decks::delete_deck(&conn, user_id, &deck.id) {
                tracing::error!(deck_id = %deck.id, error = %cleanup, "failed to remove partial import");
            }
            return Err(e).with_context(|| format!("failed to import cards into deck {}", deck.id));
        }
        pb.inc(batch.len() as u64);
    }
    pb.finish_and_clear();

    println!("Import complete:");
    println!("  Deck:            {} ({})", deck.title, deck.id);
    println!("  Cards imported:  {}", data.cards.len());

    Ok(())
}
