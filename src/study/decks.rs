//! Deck CRUD, always scoped to the owning user.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StudyError};

use super::types::Deck;

/// Create an empty deck for `user_id`.
pub fn create_deck(
    conn: &Connection,
    user_id: &str,
    title: &str,
    description: Option<&str>,
) -> Result<Deck> {
    let title = title.trim();
    if title.is_empty() {
        return Err(StudyError::validation("title must not be empty"));
    }

    let id = uuid::Uuid::now_v7().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO decks (id, user_id, title, description, card_count, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
        params![id, user_id, title, description, now],
    )?;

    tracing::debug!(deck_id = %id, user_id, "deck created");

    Ok(Deck {
        id,
        user_id: user_id.to_string(),
        title: title.to_string(),
        description: description.map(str::to_string),
        card_count: 0,
        created_at: now.clone(),
        updated_at: now,
    })
}

/// Fetch a deck owned by `user_id`.
pub fn get_deck(conn: &Connection, user_id: &str, deck_id: &str) -> Result<Deck> {
    conn.query_row(
        &format!("SELECT {} FROM decks WHERE id = ?1 AND user_id = ?2", Deck::COLUMNS),
        params![deck_id, user_id],
        Deck::from_row,
    )
    .optional()?
    .ok_or_else(|| StudyError::not_found("deck", deck_id))
}

/// All decks owned by `user_id`, newest first.
pub fn list_decks(conn: &Connection, user_id: &str) -> Result<Vec<Deck>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM decks WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
        Deck::COLUMNS
    ))?;
    let decks = stmt
        .query_map(params![user_id], Deck::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(decks)
}

/// Rename a deck or change its description. `None` leaves a field unchanged.
pub fn update_deck(
    conn: &Connection,
    user_id: &str,
    deck_id: &str,
    title: Option<&str>,
    description: Option<&str>,
) -> Result<Deck> {
    if let Some(t) = title {
        if t.trim().is_empty() {
            return Err(StudyError::validation("title must not be empty"));
        }
    }

    let now = chrono::Utc::now().to_rfc3339();
    let rows = conn.execute(
        "UPDATE decks SET title = COALESCE(?1, title), description = COALESCE(?2, description), updated_at = ?3 \
         WHERE id = ?4 AND user_id = ?5",
        params![title.map(str::trim), description, now, deck_id, user_id],
    )?;
    if rows == 0 {
        return Err(StudyError::not_found("deck", deck_id));
    }

    get_deck(conn, user_id, deck_id)
}

/// Delete a deck. Cards, schedules, and review logs go with it via `ON DELETE CASCADE`.
pub fn delete_deck(conn: &Connection, user_id: &str, deck_id: &str) -> Result<()> {
    let rows = conn.execute(
        "DELETE FROM decks WHERE id = ?1 AND user_id = ?2",
        params![deck_id, user_id],
    )?;
    if rows == 0 {
        return Err(StudyError::not_found("deck", deck_id));
    }
    tracing::info!(deck_id, user_id, "deck deleted");
    Ok(())
}
