use std::env;
use std::path::PathBuf;

/// Application configuration, built once at the composition root and passed
/// down explicitly (axum state, CLI handlers). Tests construct their own
/// instance per case instead of sharing a cached global.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub security: SecurityConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub db_path: PathBuf,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for everything the service writes to disk; the
    /// quarantine directory for corrupt legacy files lives under it.
    pub data_dir: PathBuf,
    pub legacy_vault_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub api_key: Option<String>,
    /// Dev mode disables the API key check on mutating routes.
    pub dev_mode: bool,
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub interval_secs: u64,
}

impl AppConfig {
    /// Built-in defaults; db and vault paths are derived from the data dir.
    pub fn defaults() -> Self {
        let data_dir = PathBuf::from("./data");
        Self {
            server: ServerConfig { host: "127.0.0.1".to_string(), port: 8000 },
            database: DatabaseConfig {
                db_path: data_dir.join("agent_spark.sqlite3"),
                max_connections: 5,
            },
            storage: StorageConfig {
                legacy_vault_path: data_dir.join("vault.json"),
                data_dir,
            },
            security: SecurityConfig { api_key: None, dev_mode: false },
            scheduler: SchedulerConfig { enabled: true, interval_secs: 900 },
        }
    }

    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("AGENT_SPARK_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("AGENT_SPARK_PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Data dir first: db/vault defaults follow it unless overridden.
        if let Ok(v) = env::var("AGENT_SPARK_DATA_DIR") {
            let data_dir = PathBuf::from(v);
            self.database.db_path = data_dir.join("agent_spark.sqlite3");
            self.storage.legacy_vault_path = data_dir.join("vault.json");
            self.storage.data_dir = data_dir;
        }
        if let Ok(v) = env::var("AGENT_SPARK_DB_PATH") {
            self.database.db_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("AGENT_SPARK_LEGACY_VAULT_PATH") {
            self.storage.legacy_vault_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("AGENT_SPARK_DB_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }

        if let Ok(v) = env::var("AGENT_SPARK_API_KEY") {
            self.security.api_key = if v.is_empty() { None } else { Some(v) };
        }
        if let Ok(v) = env::var("AGENT_SPARK_DEV_MODE") {
            self.security.dev_mode = parse_bool(&v).unwrap_or(self.security.dev_mode);
        }

        if let Ok(v) = env::var("AGENT_SPARK_SCHEDULER_ENABLED") {
            self.scheduler.enabled = parse_bool(&v).unwrap_or(self.scheduler.enabled);
        }
        if let Ok(v) = env::var("AGENT_SPARK_SCHEDULER_INTERVAL_SECS") {
            self.scheduler.interval_secs = v.parse().unwrap_or(self.scheduler.interval_secs);
        }

        self
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::defaults();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.db_path, PathBuf::from("./data/agent_spark.sqlite3"));
        assert_eq!(config.storage.legacy_vault_path, PathBuf::from("./data/vault.json"));
        assert!(!config.security.dev_mode);
        assert!(config.security.api_key.is_none());
        assert!(config.scheduler.enabled);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
