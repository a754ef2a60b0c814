//! Card write path: creation with initial schedules, edits, and deletion.
//!
//! [`add_cards`] inserts cards and their SM-2 schedules in one transaction so
//! a card never exists without a schedule, and keeps `decks.card_count` in sync.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction};

use crate::error::{Result, StudyError};
use crate::scheduler::ScheduleState;

use super::types::{Card, CardPatch, NewCard};

/// Insert `cards` into a deck owned by `user_id`. Every card starts with a
/// fresh schedule due at `now`.
pub fn add_cards(
    conn: &mut Connection,
    user_id: &str,
    deck_id: &str,
    cards: &[NewCard],
    now: DateTime<Utc>,
) -> Result<Vec<Card>> {
    if cards.is_empty() {
        return Err(StudyError::validation("at least one card is required"));
    }
    for card in cards {
        validate_new_card(card)?;
    }

    let tx = conn.transaction()?;
    ensure_deck_owned(&tx, user_id, deck_id)?;

    let mut position: u32 = tx.query_row(
        "SELECT COALESCE(MAX(position) + 1, 0) FROM cards WHERE deck_id = ?1",
        params![deck_id],
        |row| row.get(0),
    )?;

    let stamp = now.to_rfc3339();
    let initial = ScheduleState::new(now);
    let mut created = Vec::with_capacity(cards.len());

    for new_card in cards {
        let id = uuid::Uuid::now_v7().to_string();
        let difficulty = new_card.difficulty.map(|d| d as u8);

        tx.execute(
            "INSERT INTO cards (id, deck_id, front, back, code_snippet, difficulty, position, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                id,
                deck_id,
                new_card.front.trim(),
                new_card.back.trim(),
                new_card.code_snippet,
                difficulty,
                position,
                stamp,
            ],
        )?;
        insert_schedule(&tx, &id, user_id, deck_id, &initial)?;

        created.push(Card {
            id,
            deck_id: deck_id.to_string(),
            front: new_card.front.trim().to_string(),
            back: new_card.back.trim().to_string(),
            code_snippet: new_card.code_snippet.clone(),
            difficulty,
            position,
            created_at: stamp.clone(),
            updated_at: stamp.clone(),
        });
        position += 1;
    }

    tx.execute(
        "UPDATE decks SET card_count = card_count + ?1, updated_at = ?2 WHERE id = ?3",
        params![created.len() as i64, stamp, deck_id],
    )?;
    tx.commit()?;

    tracing::info!(deck_id, user_id, count = created.len(), "cards added");
    Ok(created)
}

/// Cards in a deck owned by `user_id`, in deck order.
pub fn list_cards(conn: &Connection, user_id: &str, deck_id: &str) -> Result<Vec<Card>> {
    ensure_deck_owned(conn, user_id, deck_id)?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM cards c WHERE c.deck_id = ?1 ORDER BY c.position, c.id",
        Card::COLUMNS
    ))?;
    let cards = stmt
        .query_map(params![deck_id], Card::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(cards)
}

/// Fetch a card whose deck is owned by `user_id`.
pub fn get_card(conn: &Connection, user_id: &str, card_id: &str) -> Result<Card> {
    conn.query_row(
        &format!(
            "SELECT {} FROM cards c JOIN decks d ON d.id = c.deck_id WHERE c.id = ?1 AND d.user_id = ?2",
            Card::COLUMNS
        ),
        params![card_id, user_id],
        Card::from_row,
    )
    .optional()?
    .ok_or_else(|| StudyError::not_found("card", card_id))
}

/// Apply a partial edit to a card. Scheduling state is untouched.
pub fn update_card(
    conn: &Connection,
    user_id: &str,
    card_id: &str,
    patch: &CardPatch,
) -> Result<Card> {
    for (name, value) in [("front", &patch.front), ("back", &patch.back)] {
        if matches!(value, Some(v) if v.trim().is_empty()) {
            return Err(StudyError::validation(format!("{name} must not be empty")));
        }
    }
    if let Some(d) = patch.difficulty {
        validate_difficulty(d)?;
    }

    // Ownership check doubles as the existence check
    get_card(conn, user_id, card_id)?;

    conn.execute(
        "UPDATE cards SET front = COALESCE(?1, front), back = COALESCE(?2, back), \
         code_snippet = COALESCE(?3, code_snippet), difficulty = COALESCE(?4, difficulty), updated_at = ?5 \
         WHERE id = ?6",
        params![
            patch.front.as_deref().map(str::trim),
            patch.back.as_deref().map(str::trim),
            patch.code_snippet,
            patch.difficulty,
            Utc::now().to_rfc3339(),
            card_id,
        ],
    )?;

    get_card(conn, user_id, card_id)
}

/// Delete a card, its schedule, and its review log.
pub fn delete_card(conn: &mut Connection, user_id: &str, card_id: &str) -> Result<()> {
    let tx = conn.transaction()?;

    let deck_id: String = tx
        .query_row(
            "SELECT c.deck_id FROM cards c JOIN decks d ON d.id = c.deck_id WHERE c.id = ?1 AND d.user_id = ?2",
            params![card_id, user_id],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| StudyError::not_found("card", card_id))?;

    tx.execute("DELETE FROM cards WHERE id = ?1", params![card_id])?;
    tx.execute(
        "UPDATE decks SET card_count = MAX(card_count - 1, 0), updated_at = ?1 WHERE id = ?2",
        params![Utc::now().to_rfc3339(), deck_id],
    )?;
    tx.commit()?;

    tracing::info!(card_id, deck_id = %deck_id, "card deleted");
    Ok(())
}

fn insert_schedule(
    tx: &Transaction,
    card_id: &str,
    user_id: &str,
    deck_id: &str,
    state: &ScheduleState,
) -> Result<()> {
    tx.execute(
        "INSERT INTO schedules (card_id, user_id, deck_id, ease, interval, reps, lapses, due_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            card_id,
            user_id,
            deck_id,
            state.ease,
            state.interval,
            state.reps,
            state.lapses,
            state.due_at.timestamp_millis(),
        ],
    )?;
    Ok(())
}

pub(crate) fn ensure_deck_owned(conn: &Connection, user_id: &str, deck_id: &str) -> Result<()> {
    let owned: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM decks WHERE id = ?1 AND user_id = ?2",
        params![deck_id, user_id],
        |row| row.get(0),
    )?;
    if owned {
        Ok(())
    } else {
        Err(StudyError::not_found("deck", deck_id))
    }
}

/// Field checks applied to every card before it is inserted.
pub fn validate_new_card(card: &NewCard) -> Result<()> {
    if card.front.trim().is_empty() {
        return Err(StudyError::validation("front must not be empty"));
    }
    if card.back.trim().is_empty() {
        return Err(StudyError::validation("back must not be empty"));
    }
    if let Some(d) = card.difficulty {
        validate_difficulty(d)?;
    }
    Ok(())
}

fn validate_difficulty(difficulty: i64) -> Result<()> {
    if (1..=5).contains(&difficulty) {
        Ok(())
    } else {
        Err(StudyError::validation(format!(
            "difficulty must be between 1 and 5, got {difficulty}"
        )))
    }
}
