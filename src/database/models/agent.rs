use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub traits: Json<Value>,
    pub created_at: DateTime<Utc>,
}

impl Agent {
    pub fn new(name: impl Into<String>, traits: Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            traits: Json(traits),
            created_at: Utc::now(),
        }
    }
}
