use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::RequireApiKey;
use crate::database::models::Agent;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AgentCreate {
    pub name: String,
    #[serde(default = "default_object")]
    pub traits: Value,
}

fn default_object() -> Value {
    json!({})
}

/// GET /agents - list agents, newest first
pub async fn list_agents(State(state): State<AppState>) -> Result<Json<Vec<Agent>>, ApiError> {
    let agents = sqlx::query_as::<_, Agent>(
        "SELECT id, name, traits, created_at FROM agents ORDER BY created_at DESC, id",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(agents))
}

/// POST /agents - create an agent
pub async fn create_agent(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Json(payload): Json<AgentCreate>,
) -> Result<(StatusCode, Json<Agent>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::empty_field("name"));
    }

    let agent = Agent::new(payload.name, payload.traits);
    sqlx::query("INSERT INTO agents (id, name, traits, created_at) VALUES (?1, ?2, ?3, ?4)")
        .bind(&agent.id)
        .bind(&agent.name)
        .bind(&agent.traits)
        .bind(agent.created_at)
        .execute(&state.pool)
        .await?;

    Ok((StatusCode::CREATED, Json(agent)))
}
