use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ApiError, AppState, AuthUser};
use crate::study::review::{self, ReviewRequest, ReviewResponse};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckQuery {
    pub deck_id: Option<String>,
}

pub async fn submit(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    // Reject malformed ratings before taking the db lock
    request.validate()?;

    let response = state
        .with_db(move |conn| review::submit_review(conn, &user_id, &request, Utc::now()))
        .await?;
    Ok(Json(response))
}

pub async fn next(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<DeckQuery>,
) -> Result<Json<Value>, ApiError> {
    let deck_id = query
        .deck_id
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::bad_request("deckId required"))?;

    let card = state
        .with_db(move |conn| review::next_due_card(conn, &user_id, &deck_id, Utc::now()))
        .await?;
    Ok(Json(json!({ "card": card })))
}

pub async fn history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(card_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let reviews = state
        .with_db(move |conn| review::review_history(conn, &user_id, &card_id))
        .await?;
    Ok(Json(json!({ "reviews": reviews })))
}
