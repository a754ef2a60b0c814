//! JSON HTTP API over the study store.
//!
//! Every `/api` route requires an `x-user-id` header set by the upstream auth
//! layer; the value is passed explicitly into each store call. Store work runs
//! on the blocking pool behind a shared connection mutex.

mod cards;
mod decks;
mod review;
mod stats;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use rusqlite::Connection;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::StudyError;

/// Header carrying the authenticated user's ID.
pub const USER_HEADER: &str = "x-user-id";

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }

    /// Run a store operation on the blocking pool with the connection locked.
    async fn with_db<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Connection) -> crate::error::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            // A panicked holder's transaction was rolled back on drop
            let mut conn = db.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut conn).map_err(ApiError::from)
        })
        .await
        .map_err(|e| ApiError::internal(format!("db task failed: {e}")))?
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/decks", get(decks::list).post(decks::create))
        .route(
            "/api/decks/{deck_id}",
            get(decks::show).patch(decks::update).delete(decks::remove),
        )
        .route("/api/decks/{deck_id}/cards", get(cards::list))
        .route("/api/cards", post(cards::create))
        .route(
            "/api/cards/{card_id}",
            patch(cards::update).delete(cards::remove),
        )
        .route("/api/cards/{card_id}/reviews", get(review::history))
        .route("/api/review", post(review::submit))
        .route("/api/review/next", get(review::next))
        .route("/api/stats", get(stats::show))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Authenticated caller, taken from the [`USER_HEADER`] header.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized"))?;
        Ok(AuthUser(user.to_string()))
    }
}

/// Error response: `{"error": "..."}` with a matching status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<StudyError> for ApiError {
    fn from(err: StudyError) -> Self {
        let status = match &err {
            StudyError::InvalidQuality(_) | StudyError::Validation(_) => StatusCode::BAD_REQUEST,
            StudyError::NotFound { .. } => StatusCode::NOT_FOUND,
            StudyError::Database(_) | StudyError::Serialization(_) => {
                tracing::error!(error = %err, "store operation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}
