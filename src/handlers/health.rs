use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::database::manager;
use crate::state::AppState;

/// GET /health - liveness plus a database ping
pub async fn healthcheck(State(state): State<AppState>) -> impl IntoResponse {
    match manager::health_check(&state.pool).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded", "database_error": err.to_string() })),
        ),
    }
}
