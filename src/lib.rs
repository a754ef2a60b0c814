//! Spaced-repetition flashcards with an SM-2 scheduler at the core.
//!
//! flashdeck stores decks of cards in SQLite and schedules each card with a
//! lenient SM-2 variant. After every review the learner rates recall from 0 to 5:
//!
//! | Rating | Outcome | Interval | Ease |
//! |--------|---------|----------|------|
//! | 0–2 | fail, streak resets | 1 day | unchanged |
//! | 3 | pass | 1 → 6 → `round(prev * ease)` days | −0.14 |
//! | 4 | pass | same | ±0 |
//! | 5 | pass | same | +0.1 |
//!
//! Ease never drops below 1.3.
//!
//! # Architecture
//!
//! - **Scheduler**: a pure function of the rating and prior `(ease, interval, reps)`
//! - **Storage**: SQLite with decks, cards, one schedule per card, and an append-only review log
//! - **Transport**: JSON HTTP API (axum) and MCP tools for study agents (stdio or Streamable HTTP)
//!
//! # Modules
//!
//! - [`scheduler`]: SM-2 update function and the validated [`scheduler::Quality`] rating
//! - [`study`]: Deck/card CRUD, the review write path, next-due selection, and stats
//! - [`api`]: HTTP routes over [`study`], identity passed via the `x-user-id` header
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`db`]: SQLite initialization, schema, migrations, and health checks
//! - [`error`]: Typed store errors

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod scheduler;
pub mod study;
