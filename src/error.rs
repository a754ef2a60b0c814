//! Typed errors for the study store and review path.

use crate::scheduler::InvalidQuality;

/// Errors returned by [`crate::study`] operations.
#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    #[error(transparent)]
    InvalidQuality(#[from] InvalidQuality),

    /// Request failed a precondition check (empty field, negative count, ...).
    #[error("{0}")]
    Validation(String),

    /// The record does not exist or belongs to another user.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StudyError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// `true` for errors caused by the caller's input rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidQuality(_) | Self::Validation(_) | Self::NotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, StudyError>;
