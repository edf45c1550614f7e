use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;

use crate::AppState;
use crate::api_error::ApiError;
use crate::api_types::{EnsureUserResponse, QuotaResponse};
use crate::handlers::bearer_token;

/// `GET /api/quota` — usage, remaining, and subscription state.
pub async fn quota_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<QuotaResponse>, ApiError> {
    let status = state
        .journal
        .quota_status(bearer_token(&headers))
        .await
        .map_err(|e| ApiError::from_service(e, state.dev_errors))?;
    Ok(Json(status.into()))
}

/// `POST /api/users/ensure` — upsert profile and seed a free
/// subscription for a freshly signed-in user.
pub async fn ensure_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<EnsureUserResponse>, ApiError> {
    state
        .journal
        .ensure_user(bearer_token(&headers))
        .await
        .map_err(|e| ApiError::from_service(e, state.dev_errors))?;
    Ok(Json(EnsureUserResponse { ok: true }))
}
