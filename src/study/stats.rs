//! Aggregate card and review counts per user.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;

use crate::error::Result;

/// Response from [`study_stats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyStats {
    pub total_cards: u64,
    pub due_today: u64,
    /// Cards that have never passed a review (`reps == 0`, `interval == 0`).
    pub new_cards: u64,
    pub total_reviews: u64,
}

/// Card and review counts for `user_id`, optionally limited to one deck.
///
/// An unknown or foreign `deck_id` yields zero counts rather than an error.
pub fn study_stats(
    conn: &Connection,
    user_id: &str,
    deck_id: Option<&str>,
    now: DateTime<Utc>,
) -> Result<StudyStats> {
    let total_cards: i64 = conn.query_row(
        "SELECT COUNT(*) FROM cards c JOIN decks d ON d.id = c.deck_id \
         WHERE d.user_id = ?1 AND (?2 IS NULL OR d.id = ?2)",
        params![user_id, deck_id],
        |row| row.get(0),
    )?;

    let (due_today, new_cards): (i64, i64) = conn.query_row(
        "SELECT COALESCE(SUM(due_at <= ?3), 0), COALESCE(SUM(reps = 0 AND interval = 0), 0) \
         FROM schedules WHERE user_id = ?1 AND (?2 IS NULL OR deck_id = ?2)",
        params![user_id, deck_id, now.timestamp_millis()],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let total_reviews: i64 = conn.query_row(
        "SELECT COUNT(*) FROM reviews r JOIN cards c ON c.id = r.card_id \
         WHERE r.user_id = ?1 AND (?2 IS NULL OR c.deck_id = ?2)",
        params![user_id, deck_id],
        |row| row.get(0),
    )?;

    Ok(StudyStats {
        total_cards: total_cards as u64,
        due_today: due_today as u64,
        new_cards: new_cards as u64,
        total_reviews: total_reviews as u64,
    })
}
