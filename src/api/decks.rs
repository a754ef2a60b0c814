use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ApiError, AppState, AuthUser};
use crate::study::decks;
use crate::study::types::Deck;

#[derive(Debug, Deserialize)]
pub struct CreateDeckBody {
    title: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDeckBody {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let decks = state
        .with_db(move |conn| decks::list_decks(conn, &user_id))
        .await?;
    Ok(Json(json!({ "decks": decks })))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateDeckBody>,
) -> Result<Json<Deck>, ApiError> {
    let deck = state
        .with_db(move |conn| {
            decks::create_deck(conn, &user_id, &body.title, body.description.as_deref())
        })
        .await?;
    Ok(Json(deck))
}

pub async fn show(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(deck_id): Path<String>,
) -> Result<Json<Deck>, ApiError> {
    let deck = state
        .with_db(move |conn| decks::get_deck(conn, &user_id, &deck_id))
        .await?;
    Ok(Json(deck))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(deck_id): Path<String>,
    Json(body): Json<UpdateDeckBody>,
) -> Result<Json<Value>, ApiError> {
    let deck = state
        .with_db(move |conn| {
            decks::update_deck(
                conn,
                &user_id,
                &deck_id,
                body.title.as_deref(),
                body.description.as_deref(),
            )
        })
        .await?;
    Ok(Json(json!({ "deck": deck })))
}

pub async fn remove(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(deck_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .with_db(move |conn| decks::delete_deck(conn, &user_id, &deck_id))
        .await?;
    Ok(Json(json!({ "success": true })))
}
