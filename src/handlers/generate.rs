use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::auth::RequireApiKey;
use crate::database::models::VaultRecord;
use crate::engine::generator::render_threadlight;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GeneratePayload {
    pub theme: String,
    pub prompt: Option<String>,
}

/// POST /generate - render a threadlight post and store it as a one-post
/// vault record
pub async fn generate(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Json(payload): Json<GeneratePayload>,
) -> Result<(StatusCode, Json<VaultRecord>), ApiError> {
    if payload.theme.trim().is_empty() {
        return Err(ApiError::empty_field("theme"));
    }

    let post = render_threadlight(&payload.theme, payload.prompt.as_deref());
    let record = VaultRecord::new(payload.theme, vec![post]);

    sqlx::query("INSERT INTO vault_records (id, theme, posts, created_at) VALUES (?1, ?2, ?3, ?4)")
        .bind(&record.id)
        .bind(&record.theme)
        .bind(&record.posts)
        .bind(record.created_at)
        .execute(&state.pool)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}
