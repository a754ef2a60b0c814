use anyhow::Result;
use chrono::Utc;

use flashdeck::config::FlashdeckConfig;

/// Display study statistics in the terminal.
pub fn stats(config: &FlashdeckConfig, deck_id: Option<&str>) -> Result<()> {
    let conn = super::open(config)?;
    let user_id = &config.storage.default_user;

    let response = flashdeck::study::stats::study_stats(&conn, user_id, deck_id, Utc::now())?;

    println!("Study Statistics");
    println!("{}", "=".repeat(40));
    println!("  Total cards:         {}", response.total_cards);
    println!("  Due now:             {}", response.due_today);
    println!("  New:                 {}", response.new_cards);
    println!("  Reviews logged:      {}", response.total_reviews);

    if deck_id.is_none() {
        let decks = flashdeck::study::decks::list_decks(&conn, user_id)?;
        if !decks.is_empty() {
            println!();
            println!("Decks:");
            for deck in &decks {
                println!("  {:<38} {:>5} cards  {}", deck.id, deck.card_count, deck.title);
            }
        }
    }

    Ok(())
}
