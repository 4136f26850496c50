use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A logged ritual event. Emotion and context are free-form annotations and
/// may be absent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ritual {
    pub id: String,
    pub event_type: String,
    pub emotion: Option<String>,
    pub context: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Ritual {
    pub fn new(
        event_type: impl Into<String>,
        emotion: Option<String>,
        context: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_type: event_type.into(),
            emotion,
            context,
            created_at: Utc::now(),
        }
    }
}
