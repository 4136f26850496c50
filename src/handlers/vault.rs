use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::database::models::VaultRecord;
use crate::error::ApiError;
use crate::state::AppState;

async fn fetch_vault_records(state: &AppState) -> Result<Vec<VaultRecord>, ApiError> {
    let records = sqlx::query_as::<_, VaultRecord>(
        "SELECT id, theme, posts, created_at FROM vault_records ORDER BY created_at DESC, id",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(records)
}

/// GET /vault - list vault records, newest first
pub async fn list_vault(State(state): State<AppState>) -> Result<Json<Vec<VaultRecord>>, ApiError> {
    Ok(Json(fetch_vault_records(&state).await?))
}

/// GET /vault/export - the full vault wrapped the way the legacy file was
pub async fn export_vault(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let records = fetch_vault_records(&state).await?;
    Ok(Json(json!({ "records": records })))
}
