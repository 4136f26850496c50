use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: String,
    pub agent_id: Option<String>,
    pub theme: String,
    pub content: Json<Value>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(theme: impl Into<String>, content: Value, agent_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            agent_id,
            theme: theme.into(),
            content: Json(content),
            created_at: Utc::now(),
        }
    }
}
