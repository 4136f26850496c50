//! One-time import of the legacy vault file into the relational store.
//!
//! The legacy vault is a JSON file predating the database. On startup (and
//! via `spark import-legacy`) the migrator parses it, inserts one
//! `vault_records` row per legacy record in a single transaction, and
//! renames the source file away so later runs see nothing to do. Concurrent
//! server replicas are serialized by an exclusive lock on a sibling lock
//! file; a replica that cannot take the lock within the timeout skips.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::database::lock::{FileLock, LockError};

const LOCK_SUFFIX: &str = ".lock";
const LOCK_TIMEOUT: Duration = Duration::from_secs(1);
const MIGRATED_SUFFIX: &str = "migrated";
const QUARANTINE_DIR: &str = "corrupt";
const DEFAULT_THEME: &str = "untitled";
const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// A legacy record normalized out of the loosely-shaped source file.
/// Unknown extra fields are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyRecord {
    pub theme: String,
    pub posts: Vec<Value>,
}

#[derive(Debug, Error)]
pub enum LegacyLoadError {
    /// The file content is not valid JSON. This is the corruption signal
    /// that sends the source file to quarantine.
    #[error("legacy vault is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// Decoded fine, but the top-level shape is unusable. Fatal to the
    /// invocation; the file stays in place.
    #[error("legacy vault format must be a list or object")]
    Schema,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Load(#[from] LegacyLoadError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// What a single migration invocation did. Exactly one of these occurs per
/// run; callers that only care about success use [`migrated`].
///
/// [`migrated`]: MigrationOutcome::migrated
#[derive(Debug)]
pub enum MigrationOutcome {
    /// Nothing at the legacy path; nothing to do.
    NoLegacyFile,
    /// Another holder had the lock for the whole timeout window. Soft skip,
    /// no state change; a later invocation may retry.
    Locked,
    /// The file failed to decode and was moved into the quarantine
    /// directory for manual inspection.
    Quarantined { moved_to: PathBuf },
    /// Rows committed and the source file renamed to its migrated marker.
    Migrated { records: usize },
}

impl MigrationOutcome {
    pub fn migrated(&self) -> bool {
        matches!(self, MigrationOutcome::Migrated { .. })
    }
}

/// Read and normalize the legacy vault file into a list of records.
///
/// Accepted top-level shapes: an array of record objects; an object whose
/// `records` or `vault` key holds such an array (first key holding an array
/// wins); or a single record object, treated as a one-element list. Any
/// other top level is a schema error. Non-object elements are dropped
/// silently.
pub fn load_legacy_records(path: &Path) -> Result<Vec<LegacyRecord>, LegacyLoadError> {
    let text = fs::read_to_string(path)?;
    let data: Value = serde_json::from_str(&text)?;

    let items = match data {
        Value::Array(items) => items,
        Value::Object(map) => unwrap_record_list(map),
        _ => return Err(LegacyLoadError::Schema),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(normalize_record(&map)),
            _ => None,
        })
        .collect())
}

fn unwrap_record_list(map: Map<String, Value>) -> Vec<Value> {
    for key in ["records", "vault"] {
        if let Some(Value::Array(items)) = map.get(key) {
            return items.clone();
        }
    }
    // No wrapped list: the object itself is a single record.
    vec![Value::Object(map)]
}

fn normalize_record(map: &Map<String, Value>) -> LegacyRecord {
    let theme = ["theme", "title"]
        .iter()
        .filter_map(|key| map.get(*key).and_then(Value::as_str))
        .find(|value| !value.is_empty())
        .unwrap_or(DEFAULT_THEME)
        .to_string();

    let posts = ["posts", "entries"]
        .iter()
        .filter_map(|key| map.get(*key).and_then(Value::as_array))
        .next()
        .cloned()
        .unwrap_or_default();

    LegacyRecord { theme, posts }
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(LOCK_SUFFIX);
    PathBuf::from(name)
}

fn file_name_of(path: &Path) -> String {
    path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Import the legacy vault file, if present, into `vault_records`.
///
/// Lock contention and corruption degrade to non-migrated outcomes; schema
/// errors, I/O failures outside the decode step, and insert/commit failures
/// propagate and leave the source file in place so a later run can retry.
/// The rename to the migrated marker happens only after commit, so a crash
/// between the two can produce duplicate rows on retry (at-least-once, by
/// documented policy).
pub async fn migrate_legacy_vault(
    pool: &SqlitePool,
    config: &AppConfig,
) -> Result<MigrationOutcome, MigrationError> {
    let path = &config.storage.legacy_vault_path;
    if !path.exists() {
        debug!("No legacy vault at {}", path.display());
        return Ok(MigrationOutcome::NoLegacyFile);
    }

    // One stamp per invocation so sibling artifacts share a name.
    let stamp = Utc::now().format(TIMESTAMP_FORMAT).to_string();
    let file_name = file_name_of(path);

    let lock_path = lock_path_for(path);
    let _lock = match FileLock::acquire(&lock_path, LOCK_TIMEOUT).await {
        Ok(lock) => lock,
        Err(LockError::Timeout { .. }) => {
            warn!("Could not acquire lock to migrate legacy vault at {}", path.display());
            return Ok(MigrationOutcome::Locked);
        }
        Err(err) => return Err(err.into()),
    };

    // A contender that waited out a faster replica sees the renamed-away
    // file here and has nothing left to do.
    if !path.exists() {
        debug!("Legacy vault at {} already migrated by another holder", path.display());
        return Ok(MigrationOutcome::NoLegacyFile);
    }

    let records = match load_legacy_records(path) {
        Ok(records) => records,
        Err(LegacyLoadError::Decode(err)) => {
            let quarantine_dir = config.storage.data_dir.join(QUARANTINE_DIR);
            fs::create_dir_all(&quarantine_dir)?;
            let moved_to = quarantine_dir.join(format!("{file_name}.{stamp}"));
            fs::rename(path, &moved_to)?;
            warn!(error = %err, "Legacy vault corrupted; moved to {}", moved_to.display());
            return Ok(MigrationOutcome::Quarantined { moved_to });
        }
        Err(err) => {
            error!("Failed to parse legacy vault: {err}");
            return Err(err.into());
        }
    };

    let mut tx = pool.begin().await?;
    let created_at = Utc::now();
    for record in &records {
        sqlx::query("INSERT INTO vault_records (id, theme, posts, created_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(Uuid::new_v4().to_string())
            .bind(&record.theme)
            .bind(Json(&record.posts))
            .bind(created_at)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    let migrated_path = path.with_file_name(format!("{file_name}.{MIGRATED_SUFFIX}.{stamp}"));
    fs::rename(path, &migrated_path)?;
    info!("Migrated {} legacy records into the vault", records.len());

    Ok(MigrationOutcome::Migrated { records: records.len() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_top_level_array() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "vault.json",
            r#"[{"theme": "aurora", "posts": [{"body": "light"}]}]"#,
        );

        let records = load_legacy_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].theme, "aurora");
        assert_eq!(records[0].posts, vec![json!({"body": "light"})]);
    }

    #[test]
    fn test_load_wrapped_records_and_vault_keys() {
        let dir = TempDir::new().unwrap();
        for key in ["records", "vault"] {
            let path = write_file(
                &dir,
                &format!("{key}.json"),
                &json!({ key: [{"theme": "ember", "posts": []}] }).to_string(),
            );
            let records = load_legacy_records(&path).unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].theme, "ember");
        }
    }

    #[test]
    fn test_records_key_wins_over_vault() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "vault.json",
            &json!({
                "records": [{"theme": "first"}],
                "vault": [{"theme": "second"}]
            })
            .to_string(),
        );

        let records = load_legacy_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].theme, "first");
    }

    #[test]
    fn test_single_object_wraps_to_one_record() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "vault.json", r#"{"theme": "tide", "posts": []}"#);

        let records = load_legacy_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].theme, "tide");
    }

    #[test]
    fn test_object_with_non_array_records_key_is_single_record() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "vault.json",
            &json!({"records": "not-a-list", "title": "archive"}).to_string(),
        );

        let records = load_legacy_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].theme, "archive");
    }

    #[test]
    fn test_non_object_elements_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "vault.json",
            r#"[{"theme": "kept"}, 42, "noise", null, ["nested"]]"#,
        );

        let records = load_legacy_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].theme, "kept");
    }

    #[test]
    fn test_scalar_top_level_is_schema_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "vault.json", r#""just a string""#);

        let result = load_legacy_records(&path);
        assert!(matches!(result, Err(LegacyLoadError::Schema)));
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "vault.json", "not json");

        let result = load_legacy_records(&path);
        assert!(matches!(result, Err(LegacyLoadError::Decode(_))));
    }

    #[test]
    fn test_theme_falls_back_to_title_then_default() {
        let with_title = json!({"title": "from-title"});
        let record = normalize_record(with_title.as_object().unwrap());
        assert_eq!(record.theme, "from-title");

        let empty_theme = json!({"theme": "", "title": "fallback"});
        let record = normalize_record(empty_theme.as_object().unwrap());
        assert_eq!(record.theme, "fallback");

        let neither = json!({"posts": []});
        let record = normalize_record(neither.as_object().unwrap());
        assert_eq!(record.theme, DEFAULT_THEME);
    }

    #[test]
    fn test_posts_falls_back_to_entries_then_empty() {
        let with_entries = json!({"entries": [{"body": "x"}]});
        let record = normalize_record(with_entries.as_object().unwrap());
        assert_eq!(record.posts, vec![json!({"body": "x"})]);

        // A non-array posts value falls through to entries.
        let bad_posts = json!({"posts": {"body": "x"}, "entries": [1, 2]});
        let record = normalize_record(bad_posts.as_object().unwrap());
        assert_eq!(record.posts, vec![json!(1), json!(2)]);

        let neither = json!({"theme": "bare"});
        let record = normalize_record(neither.as_object().unwrap());
        assert!(record.posts.is_empty());
    }

    #[test]
    fn test_lock_path_appends_suffix() {
        let path = Path::new("/tmp/data/vault.json");
        assert_eq!(lock_path_for(path), PathBuf::from("/tmp/data/vault.json.lock"));
    }
}
