use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::AppConfig;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(config: AppConfig, pool: SqlitePool) -> Self {
        Self { config: Arc::new(config), pool }
    }
}
