use sqlx::SqlitePool;
use tracing::info;

/// Idempotent, additive-only schema DDL. Runs at startup before anything
/// touches the tables; the legacy migrator assumes it has already run.
static SCHEMA_DDL: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS agents (\
       id         TEXT PRIMARY KEY,\
       name       TEXT NOT NULL,\
       traits     TEXT NOT NULL DEFAULT '{}',\
       created_at TEXT NOT NULL\
     )",
    "CREATE TABLE IF NOT EXISTS posts (\
       id         TEXT PRIMARY KEY,\
       agent_id   TEXT REFERENCES agents(id),\
       theme      TEXT NOT NULL,\
       content    TEXT NOT NULL DEFAULT '{}',\
       created_at TEXT NOT NULL\
     )",
    "CREATE TABLE IF NOT EXISTS rituals (\
       id         TEXT PRIMARY KEY,\
       event_type TEXT NOT NULL,\
       emotion    TEXT,\
       context    TEXT,\
       created_at TEXT NOT NULL\
     )",
    "CREATE TABLE IF NOT EXISTS vault_records (\
       id         TEXT PRIMARY KEY,\
       theme      TEXT NOT NULL,\
       posts      TEXT NOT NULL DEFAULT '[]',\
       created_at TEXT NOT NULL\
     )",
];

/// Create database tables if they do not already exist.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for ddl in SCHEMA_DDL {
        sqlx::query(ddl).execute(pool).await?;
    }
    info!("Database schema initialized");
    Ok(())
}
