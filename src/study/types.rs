//! Record types for the study store.
//!
//! [`Deck`], [`Card`], [`Schedule`], and [`ReviewLog`] mirror the `decks`,
//! `cards`, `schedules`, and `reviews` tables. All serialize as camelCase JSON.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::scheduler::ScheduleState;

/// A named collection of cards owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    /// UUID v7 primary key.
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Number of cards in the deck, maintained by the card write path.
    pub card_count: u32,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    pub updated_at: String,
}

impl Deck {
    pub(crate) const COLUMNS: &'static str =
        "id, user_id, title, description, card_count, created_at, updated_at";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            card_count: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

/// A single question/answer card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub deck_id: String,
    pub front: String,
    pub back: String,
    /// Optional code sample shown with the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    /// Author-estimated difficulty, 1 (easy) to 5 (hard).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u8>,
    /// Order within the deck, assigned at insert time.
    pub position: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl Card {
    pub(crate) const COLUMNS: &'static str =
        "c.id, c.deck_id, c.front, c.back, c.code_snippet, c.difficulty, c.position, c.created_at, c.updated_at";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            deck_id: row.get(1)?,
            front: row.get(2)?,
            back: row.get(3)?,
            code_snippet: row.get(4)?,
            difficulty: row.get(5)?,
            position: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}

/// Persisted SM-2 state for one card and its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub card_id: String,
    pub user_id: String,
    pub deck_id: String,
    pub ease: f64,
    pub interval: u32,
    pub reps: u32,
    pub lapses: u32,
    pub due_at: DateTime<Utc>,
}

impl Schedule {
    pub(crate) const COLUMNS: &'static str =
        "card_id, user_id, deck_id, ease, interval, reps, lapses, due_at";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let due_ms: i64 = row.get(7)?;
        Ok(Self {
            card_id: row.get(0)?,
            user_id: row.get(1)?,
            deck_id: row.get(2)?,
            ease: row.get(3)?,
            interval: row.get(4)?,
            reps: row.get(5)?,
            lapses: row.get(6)?,
            due_at: millis_to_datetime(due_ms, 7)?,
        })
    }

    /// The scheduler-facing view of this record.
    pub fn state(&self) -> ScheduleState {
        ScheduleState {
            ease: self.ease,
            interval: self.interval,
            reps: self.reps,
            lapses: self.lapses,
            due_at: self.due_at,
        }
    }

    pub fn with_state(mut self, state: ScheduleState) -> Self {
        self.ease = state.ease;
        self.interval = state.interval;
        self.reps = state.reps;
        self.lapses = state.lapses;
        self.due_at = state.due_at;
        self
    }
}

/// One immutable entry in the review log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLog {
    pub id: String,
    pub card_id: String,
    pub user_id: String,
    /// Quality rating given, 0–5.
    pub rating: u8,
    /// Time the learner spent on the card before rating it.
    pub elapsed_ms: i64,
    pub created_at: String,
}

/// Fields accepted when creating a card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub code_snippet: Option<String>,
    #[serde(default)]
    pub difficulty: Option<i64>,
}

/// Partial update for a card; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPatch {
    #[serde(default)]
    pub front: Option<String>,
    #[serde(default)]
    pub back: Option<String>,
    #[serde(default)]
    pub code_snippet: Option<String>,
    #[serde(default)]
    pub difficulty: Option<i64>,
}

pub(crate) fn millis_to_datetime(ms: i64, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ms).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Integer,
            format!("timestamp out of range: {ms}").into(),
        )
    })
}
