use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// A stored vault record: a theme plus an ordered list of opaque post
/// payloads. Rows are only ever created (by the legacy migrator, the
/// generate endpoint, or the scheduler), never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VaultRecord {
    pub id: String,
    pub theme: String,
    pub posts: Json<Vec<Value>>,
    pub created_at: DateTime<Utc>,
}

impl VaultRecord {
    pub fn new(theme: impl Into<String>, posts: Vec<Value>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            theme: theme.into(),
            posts: Json(posts),
            created_at: Utc::now(),
        }
    }
}
