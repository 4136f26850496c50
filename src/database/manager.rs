use std::fs;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;

/// Errors from pool construction and connectivity checks
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Build the SQLite connection pool for the configured database path.
///
/// The pool is owned by the composition root and passed down; handlers and
/// the legacy migrator receive it rather than reaching for a global engine.
pub async fn connect_pool(config: &AppConfig) -> Result<SqlitePool, DatabaseError> {
    let db_path = &config.database.db_path;
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(options)
        .await?;

    info!("Opened database pool at {}", db_path.display());
    Ok(pool)
}

/// Pings the pool to ensure connectivity
pub async fn health_check(pool: &SqlitePool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
