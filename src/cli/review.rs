//! CLI `review` and `next` commands: study a deck from the terminal.

use anyhow::{Context, Result};
use chrono::Utc;

use flashdeck::config::FlashdeckConfig;
use flashdeck::study::review::{next_due_card, submit_review, ReviewRequest};
use flashdeck::study::types::Card;

/// Rate a card and print its new schedule.
pub fn review(config: &FlashdeckConfig, deck_id: &str, card_id: &str, quality: i64) -> Result<()> {
    let mut conn = super::open(config)?;
    let request = ReviewRequest {
        deck_id: deck_id.to_string(),
        card_id: card_id.to_string(),
        quality,
        elapsed_ms: 0,
    };

    let response = submit_review(&mut conn, &config.storage.default_user, &request, Utc::now())
        .context("review failed")?;

    let s = &response.schedule;
    println!("Card {} rated {quality}", s.card_id);
    println!("  Ease:      {:.2}", s.ease);
    println!("  Interval:  {} day(s)", s.interval);
    println!("  Streak:    {}", s.reps);
    println!("  Lapses:    {}", s.lapses);
    println!("  Next due:  {}", s.due_at.to_rfc3339());
    println!();

    match response.next_card {
        Some(card) => print_card(&card),
        None => println!("No more cards due in this deck."),
    }
    Ok(())
}

/// Show the next due card in a deck.
pub fn next(config: &FlashdeckConfig, deck_id: &str, show_answer: bool) -> Result<()> {
    let conn = super::open(config)?;
    match next_due_card(&conn, &config.storage.default_user, deck_id, Utc::now())? {
        Some(card) => {
            print_card(&card);
            if show_answer {
                println!("  A: {}", card.back);
                if let Some(ref code) = card.code_snippet {
                    println!();
                    println!("{code}");
                }
            }
        }
        None => println!("Nothing due in deck {deck_id}."),
    }
    Ok(())
}

fn print_card(card: &Card) {
    println!("Next card: {}", card.id);
    println!("  Q: {}", card.front);
}
