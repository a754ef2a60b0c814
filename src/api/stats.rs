use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;

use super::review::DeckQuery;
use super::{ApiError, AppState, AuthUser};
use crate::study::stats::{study_stats, StudyStats};

pub async fn show(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<DeckQuery>,
) -> Result<Json<StudyStats>, ApiError> {
    let stats = state
        .with_db(move |conn| study_stats(conn, &user_id, query.deck_id.as_deref(), Utc::now()))
        .await?;
    Ok(Json(stats))
}
