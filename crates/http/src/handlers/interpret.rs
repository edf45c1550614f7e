use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use oneiro_service::InterpretRequest;

use crate::AppState;
use crate::api_error::ApiError;
use crate::api_types::{
    InterpretMetadata, InterpretRequestBody, InterpretResponse, StructuredInterpretResponse,
};
use crate::handlers::bearer_token;

/// `POST /api/interpret` — the orchestration endpoint.
///
/// Responds with the narrative shape or the structured record,
/// depending on how the interpretation service is configured.
pub async fn interpret_dream(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<InterpretRequestBody>,
) -> Result<Response, ApiError> {
    let token = bearer_token(&headers);
    let dream_length = body.dream_text.trim().chars().count();
    let request = InterpretRequest {
        dream_text: body.dream_text,
        dream_id: body.dream_id,
        is_continuation: body.is_continuation,
    };

    let outcome = state
        .interpretation
        .interpret(token, request)
        .await
        .map_err(|e| ApiError::from_service(e, state.dev_errors))?;

    let response = match outcome.record {
        Some(interpretation) => Json(StructuredInterpretResponse {
            success: true,
            interpretation,
            metadata: InterpretMetadata {
                dream_length,
                model: outcome.model,
                timestamp: Utc::now(),
                dream_id: outcome.dream_id,
                interpretations_left: outcome.remaining,
                is_continuation: outcome.is_continuation,
            },
        })
        .into_response(),
        None => Json(InterpretResponse {
            reply: outcome.reply,
            dream_id: outcome.dream_id,
            interpretations_left: outcome.remaining,
            is_continuation: outcome.is_continuation,
        })
        .into_response(),
    };
    Ok(response)
}
