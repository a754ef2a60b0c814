//! SM-2 review scheduler.
//!
//! [`update`] maps a quality rating and the prior `(ease, interval, reps)` triple to the
//! next schedule. It is pure apart from reading the clock for `next_due`; [`update_at`]
//! takes the evaluation instant explicitly.
//!
//! | Transition | Interval | Reps | Ease |
//! |------------|----------|------|------|
//! | fail (`q < 3`) | 1 | 0 | unchanged |
//! | pass, first in streak | 1 | 1 | `+ delta(q)` |
//! | pass, second in streak | 6 | 2 | `+ delta(q)` |
//! | pass, later | `round(prev_interval * prev_ease)` | `+1` | `+ delta(q)` |
//!
//! Ease is floored at [`MIN_EASE`] on every transition and intervals are capped at
//! [`MAX_INTERVAL_DAYS`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Ease factor assigned to a card that has never been reviewed.
pub const INITIAL_EASE: f64 = 2.5;

/// Lower bound for the ease factor.
pub const MIN_EASE: f64 = 1.3;

/// Highest quality rating a learner can give.
pub const MAX_QUALITY: u8 = 5;

/// Ratings at or above this count as a successful recall.
pub const PASS_THRESHOLD: u8 = 3;

/// Longest interval the scheduler will assign, roughly a century.
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

const MS_PER_DAY: i64 = 86_400_000;

/// Quality rating outside `0..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("quality must be an integer between 0 and 5, got {0}")]
pub struct InvalidQuality(pub i64);

/// A learner's recall rating, `0` (blackout) to `5` (perfect).
///
/// Only constructible through a range check, so the scheduler never sees
/// a value the ease formula was not designed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: i64) -> Result<Self, InvalidQuality> {
        if (0..=i64::from(MAX_QUALITY)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(InvalidQuality(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_pass(self) -> bool {
        self.0 >= PASS_THRESHOLD
    }

    /// Every valid rating, lowest first.
    pub fn all() -> impl Iterator<Item = Quality> {
        (0..=MAX_QUALITY).map(Quality)
    }
}

impl TryFrom<i64> for Quality {
    type Error = InvalidQuality;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Quality {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Quality::new(raw).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of one scheduler step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sm2Update {
    pub ease: f64,
    pub interval: u32,
    pub reps: u32,
    pub next_due: DateTime<Utc>,
}

/// Run the SM-2 update against the current wall clock.
pub fn update(quality: Quality, prev_ease: f64, prev_interval: u32, prev_reps: u32) -> Sm2Update {
    update_at(quality, prev_ease, prev_interval, prev_reps, Utc::now())
}

/// Run the SM-2 update with `now` as the evaluation instant.
pub fn update_at(
    quality: Quality,
    prev_ease: f64,
    prev_interval: u32,
    prev_reps: u32,
    now: DateTime<Utc>,
) -> Sm2Update {
    let (ease, interval, reps) = if quality.is_pass() {
        let reps = prev_reps.saturating_add(1);
        let interval = match reps {
            1 => 1,
            2 => 6,
            // reps >= 3 with a zero prior interval only comes from hand-edited rows
            _ => ((f64::from(prev_interval) * prev_ease).round() as u32).clamp(1, MAX_INTERVAL_DAYS),
        };
        (prev_ease + ease_delta(quality), interval, reps)
    } else {
        (prev_ease, 1, 0)
    };

    let ease = ease.max(MIN_EASE);
    let next_due = now
        .checked_add_signed(Duration::milliseconds(i64::from(interval) * MS_PER_DAY))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    Sm2Update {
        ease,
        interval,
        reps,
        next_due,
    }
}

/// Classic SM-2 ease adjustment: `+0.1` at q=5, `0.0` at q=4, `-0.14` at q=3.
fn ease_delta(quality: Quality) -> f64 {
    let miss = f64::from(MAX_QUALITY - quality.value());
    0.1 - miss * (0.08 + miss * 0.02)
}

/// Per-card, per-user scheduling memory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleState {
    pub ease: f64,
    pub interval: u32,
    pub reps: u32,
    pub lapses: u32,
    pub due_at: DateTime<Utc>,
}

impl ScheduleState {
    /// State for a freshly created card: immediately due.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            ease: INITIAL_EASE,
            interval: 0,
            reps: 0,
            lapses: 0,
            due_at: now,
        }
    }

    /// Apply one review, counting a lapse when the rating is a fail.
    pub fn review(&self, quality: Quality, now: DateTime<Utc>) -> Self {
        let next = update_at(quality, self.ease, self.interval, self.reps, now);
        let lapses = if quality.is_pass() {
            self.lapses
        } else {
            self.lapses.saturating_add(1)
        };
        Self {
            ease: next.ease,
            interval: next.interval,
            reps: next.reps,
            lapses,
            due_at: next.next_due,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at <= now
    }
}
