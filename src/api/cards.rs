use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ApiError, AppState, AuthUser};
use crate::study::cards;
use crate::study::types::{CardPatch, NewCard};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardsBody {
    deck_id: String,
    cards: Vec<NewCard>,
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(deck_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let cards = state
        .with_db(move |conn| cards::list_cards(conn, &user_id, &deck_id))
        .await?;
    Ok(Json(json!({ "cards": cards })))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateCardsBody>,
) -> Result<Json<Value>, ApiError> {
    let created = state
        .with_db(move |conn| {
            cards::add_cards(conn, &user_id, &body.deck_id, &body.cards, Utc::now())
        })
        .await?;
    Ok(Json(json!({ "cards": created })))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(card_id): Path<String>,
    Json(patch): Json<CardPatch>,
) -> Result<Json<Value>, ApiError> {
    let card = state
        .with_db(move |conn| cards::update_card(conn, &user_id, &card_id, &patch))
        .await?;
    Ok(Json(json!({ "card": card })))
}

pub async fn remove(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(card_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .with_db(move |conn| cards::delete_card(conn, &user_id, &card_id))
        .await?;
    Ok(Json(json!({ "success": true })))
}
