use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

const API_KEY_HEADER: &str = "x-api-key";

/// Extractor guarding mutating routes: requires a valid `X-API-Key` header
/// unless dev mode is on. Exactly one header value must match the
/// configured key; repeated headers are rejected outright.
pub struct RequireApiKey;

#[async_trait]
impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.config.security.dev_mode {
            return Ok(RequireApiKey);
        }

        let expected = match state.config.security.api_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => return Err(ApiError::unauthorized("API key is not configured")),
        };

        let mut values = parts.headers.get_all(API_KEY_HEADER).iter();
        match (values.next(), values.next()) {
            (Some(value), None) if value.as_bytes() == expected.as_bytes() => Ok(RequireApiKey),
            _ => Err(ApiError::unauthorized("Invalid or missing API key")),
        }
    }
}
