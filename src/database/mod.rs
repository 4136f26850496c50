pub mod legacy;
pub mod lock;
pub mod manager;
pub mod migrate;
pub mod models;

pub use legacy::{migrate_legacy_vault, LegacyLoadError, MigrationError, MigrationOutcome};
pub use lock::{FileLock, LockError};
pub use manager::{connect_pool, health_check, DatabaseError};
pub use migrate::run_migrations;
