// Shared between the numbered integration test binaries; not every helper
// is used by every binary.
#![allow(dead_code)]

use std::path::Path;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use agent_spark_api::app::router;
use agent_spark_api::config::AppConfig;
use agent_spark_api::database::{connect_pool, run_migrations};
use agent_spark_api::state::AppState;

/// In-process application instance backed by a per-test temp directory.
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    _dir: TempDir,
}

/// Config pointed at an isolated data dir: dev mode on, scheduler off.
pub fn test_config(data_dir: &Path) -> AppConfig {
    let mut config = AppConfig::defaults();
    config.database.db_path = data_dir.join("db.sqlite");
    config.storage.data_dir = data_dir.to_path_buf();
    config.storage.legacy_vault_path = data_dir.join("vault.json");
    config.security.dev_mode = true;
    config.scheduler.enabled = false;
    config
}

pub async fn spawn_app() -> Result<TestApp> {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(customize: impl FnOnce(&mut AppConfig)) -> Result<TestApp> {
    let dir = TempDir::new()?;
    let mut config = test_config(dir.path());
    customize(&mut config);

    let pool = connect_pool(&config).await?;
    run_migrations(&pool).await?;
    let state = AppState::new(config, pool);

    Ok(TestApp { router: router(state.clone()), state, _dir: dir })
}

/// Drive one request through the router and decode the JSON body.
pub async fn send(router: &Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, body))
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

pub fn post_json(path: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Like `post_json`, with explicit `X-API-Key` header values (zero or more,
/// so duplicated-header cases are expressible).
pub fn post_json_with_keys(path: &str, body: &Value, keys: &[&str]) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    for key in keys {
        builder = builder.header("x-api-key", *key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}
