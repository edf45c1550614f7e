use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;

use oneiro_core::{Dream, Message};

use crate::AppState;
use crate::api_error::ApiError;
use crate::api_types::DeleteDreamResponse;
use crate::handlers::bearer_token;

/// `GET /api/dreams` — the caller's dreams, newest first, capped at 50.
pub async fn list_dreams(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Dream>>, ApiError> {
    let dreams = state
        .journal
        .list_dreams(bearer_token(&headers))
        .await
        .map_err(|e| ApiError::from_service(e, state.dev_errors))?;
    Ok(Json(dreams))
}

/// `GET /api/dreams/{id}/messages` — a thread's history, oldest first.
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(dream_id): Path<String>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = state
        .journal
        .list_messages(bearer_token(&headers), &dream_id)
        .await
        .map_err(|e| ApiError::from_service(e, state.dev_errors))?;
    Ok(Json(messages))
}

/// `DELETE /api/dreams/{id}` — user-initiated delete, owner-scoped.
pub async fn delete_dream(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(dream_id): Path<String>,
) -> Result<Json<DeleteDreamResponse>, ApiError> {
    let deleted = state
        .journal
        .delete_dream(bearer_token(&headers), &dream_id)
        .await
        .map_err(|e| ApiError::from_service(e, state.dev_errors))?;
    Ok(Json(DeleteDreamResponse { deleted, dream_id }))
}
