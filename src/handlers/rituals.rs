use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::auth::RequireApiKey;
use crate::database::models::Ritual;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RitualCreate {
    pub event_type: String,
    pub emotion: Option<String>,
    pub context: Option<String>,
}

/// GET /rituals - list rituals, newest first
pub async fn list_rituals(State(state): State<AppState>) -> Result<Json<Vec<Ritual>>, ApiError> {
    let rituals = sqlx::query_as::<_, Ritual>(
        "SELECT id, event_type, emotion, context, created_at FROM rituals \
         ORDER BY created_at DESC, id",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(rituals))
}

/// POST /rituals - log a ritual event
pub async fn create_ritual(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Json(payload): Json<RitualCreate>,
) -> Result<(StatusCode, Json<Ritual>), ApiError> {
    if payload.event_type.trim().is_empty() {
        return Err(ApiError::empty_field("event_type"));
    }

    let ritual = Ritual::new(payload.event_type, payload.emotion, payload.context);
    sqlx::query(
        "INSERT INTO rituals (id, event_type, emotion, context, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(&ritual.id)
    .bind(&ritual.event_type)
    .bind(&ritual.emotion)
    .bind(&ritual.context)
    .bind(ritual.created_at)
    .execute(&state.pool)
    .await?;

    Ok((StatusCode::CREATED, Json(ritual)))
}
