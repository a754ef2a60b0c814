//! Review path: validate → load schedule → SM-2 update → log → persist → next card.
//!
//! [`submit_review`] performs the read-update-write of a schedule inside a single
//! `BEGIN IMMEDIATE` transaction, so two submissions for the same card serialize
//! instead of overwriting each other's result.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StudyError};
use crate::scheduler::Quality;

use super::types::{Card, ReviewLog, Schedule};

/// A learner's rating for one card, as received from a client.
///
/// Raw integers are kept so range checks happen in [`ReviewRequest::validate`]
/// with a precise error rather than as an opaque deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub deck_id: String,
    pub card_id: String,
    pub quality: i64,
    #[serde(default)]
    pub elapsed_ms: i64,
}

impl ReviewRequest {
    /// Closed range check on `quality`, non-negativity on `elapsed_ms`.
    pub fn validate(&self) -> Result<Quality> {
        if self.deck_id.is_empty() || self.card_id.is_empty() {
            return Err(StudyError::validation("deckId and cardId are required"));
        }
        if self.elapsed_ms < 0 {
            return Err(StudyError::validation(format!(
                "elapsedMs must be non-negative, got {}",
                self.elapsed_ms
            )));
        }
        Ok(Quality::new(self.quality)?)
    }
}

/// Result of a review: the stored schedule plus the next card to study.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub schedule: Schedule,
    pub next_card: Option<Card>,
}

/// Record a review for `user_id` and advance the card's schedule.
pub fn submit_review(
    conn: &mut Connection,
    user_id: &str,
    request: &ReviewRequest,
    now: DateTime<Utc>,
) -> Result<ReviewResponse> {
    let quality = request.validate()?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let schedule = tx
        .query_row(
            &format!("SELECT {} FROM schedules WHERE card_id = ?1", Schedule::COLUMNS),
            params![request.card_id],
            Schedule::from_row,
        )
        .optional()?
        .filter(|s| s.user_id == user_id && s.deck_id == request.deck_id)
        .ok_or_else(|| StudyError::not_found("schedule", &request.card_id))?;

    let next_state = schedule.state().review(quality, now);

    tx.execute(
        "INSERT INTO reviews (id, card_id, user_id, rating, elapsed_ms, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            uuid::Uuid::now_v7().to_string(),
            request.card_id,
            user_id,
            quality.value(),
            request.elapsed_ms,
            now.to_rfc3339(),
        ],
    )?;

    tx.execute(
        "UPDATE schedules SET ease = ?1, interval = ?2, reps = ?3, lapses = ?4, due_at = ?5 \
         WHERE card_id = ?6",
        params![
            next_state.ease,
            next_state.interval,
            next_state.reps,
            next_state.lapses,
            next_state.due_at.timestamp_millis(),
            request.card_id,
        ],
    )?;

    tx.commit()?;

    tracing::info!(
        card_id = %request.card_id,
        user_id,
        quality = quality.value(),
        ease = next_state.ease,
        interval = next_state.interval,
        reps = next_state.reps,
        "review recorded"
    );

    let next_card = next_due_card(conn, user_id, &request.deck_id, now)?;

    Ok(ReviewResponse {
        schedule: schedule.with_state(next_state),
        next_card,
    })
}

/// The card in `deck_id` with the earliest `due_at` not later than `now`.
pub fn next_due_card(
    conn: &Connection,
    user_id: &str,
    deck_id: &str,
    now: DateTime<Utc>,
) -> Result<Option<Card>> {
    let card = conn
        .query_row(
            &format!(
                "SELECT {} FROM cards c JOIN schedules s ON s.card_id = c.id \
                 WHERE c.deck_id = ?1 AND s.user_id = ?2 AND s.due_at <= ?3 \
                 ORDER BY s.due_at ASC, c.position ASC LIMIT 1",
                Card::COLUMNS
            ),
            params![deck_id, user_id, now.timestamp_millis()],
            Card::from_row,
        )
        .optional()?;
    Ok(card)
}

/// Load the schedule for a card owned by `user_id`.
pub fn get_schedule(conn: &Connection, user_id: &str, card_id: &str) -> Result<Schedule> {
    conn.query_row(
        &format!(
            "SELECT {} FROM schedules WHERE card_id = ?1 AND user_id = ?2",
            Schedule::COLUMNS
        ),
        params![card_id, user_id],
        Schedule::from_row,
    )
    .optional()?
    .ok_or_else(|| StudyError::not_found("schedule", card_id))
}

/// Review log for a card, oldest first.
pub fn review_history(conn: &Connection, user_id: &str, card_id: &str) -> Result<Vec<ReviewLog>> {
    // Confirms the card exists and belongs to the user
    super::cards::get_card(conn, user_id, card_id)?;

    let mut stmt = conn.prepare(
        "SELECT id, card_id, user_id, rating, elapsed_ms, created_at \
         FROM reviews WHERE card_id = ?1 AND user_id = ?2 ORDER BY rowid",
    )?;
    let logs = stmt
        .query_map(params![card_id, user_id], |row| {
            Ok(ReviewLog {
                id: row.get(0)?,
                card_id: row.get(1)?,
                user_id: row.get(2)?,
                rating: row.get(3)?,
                elapsed_ms: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(logs)
}
