use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::RequireApiKey;
use crate::database::models::Post;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuickPostPayload {
    pub theme: String,
    #[serde(default = "default_object")]
    pub content: Value,
    pub agent_id: Option<String>,
}

fn default_object() -> Value {
    json!({})
}

/// GET /posts - list posts, newest first
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = sqlx::query_as::<_, Post>(
        "SELECT id, agent_id, theme, content, created_at FROM posts ORDER BY created_at DESC, id",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(posts))
}

/// POST /quickpost - create a post, optionally attributed to an agent
pub async fn quickpost(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Json(payload): Json<QuickPostPayload>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    if payload.theme.trim().is_empty() {
        return Err(ApiError::empty_field("theme"));
    }

    if let Some(agent_id) = payload.agent_id.as_deref() {
        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM agents WHERE id = ?1")
            .bind(agent_id)
            .fetch_optional(&state.pool)
            .await?;
        if exists.is_none() {
            return Err(ApiError::not_found(format!("Agent {agent_id} not found")));
        }
    }

    let post = Post::new(payload.theme, payload.content, payload.agent_id);
    sqlx::query(
        "INSERT INTO posts (id, agent_id, theme, content, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(&post.id)
    .bind(&post.agent_id)
    .bind(&post.theme)
    .bind(&post.content)
    .bind(post.created_at)
    .execute(&state.pool)
    .await?;

    Ok((StatusCode::CREATED, Json(post)))
}
