//! Typed API error for HTTP handlers.
//!
//! Converts service errors into proper HTTP responses with a JSON body
//! and status code. The quota denial carries a machine-checkable
//! `limit_reached` flag so clients can branch without parsing prose.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use oneiro_service::ServiceError;

const GENERIC_ERROR: &str = "An unexpected error occurred. Please try again.";
const LIMIT_REACHED: &str =
    "Free interpretation limit reached. Please subscribe for unlimited access.";
const RATE_LIMITED: &str =
    "The dream interpretation service is temporarily busy. Please try again in a moment.";

/// API error with HTTP status code and user-safe message.
///
/// Use via `Result<Json<T>, ApiError>` in handlers. `Internal` logs the
/// real error server-side; its detail reaches the response body only
/// under the development-mode flag.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request — invalid input from caller.
    BadRequest(String),
    /// 401 Unauthorized — missing or rejected credential.
    Unauthorized(String),
    /// 402 Payment Required — free-tier quota exhausted (`limit_reached`).
    LimitReached,
    /// 404 Not Found — requested resource doesn't exist (for the caller).
    NotFound(String),
    /// 429 Too Many Requests — provider rate limit.
    TooManyRequests(String),
    /// 500 Internal Server Error — unexpected failure.
    Internal { error: anyhow::Error, dev_errors: bool },
}

impl ApiError {
    /// Map a service failure to its response, honoring the
    /// development-mode detail flag.
    #[must_use]
    pub fn from_service(err: ServiceError, dev_errors: bool) -> Self {
        if err.is_unauthenticated() {
            return Self::Unauthorized(err.to_string());
        }
        if err.is_quota_exceeded() {
            return Self::LimitReached;
        }
        if err.is_rate_limited() {
            return Self::TooManyRequests(RATE_LIMITED.to_owned());
        }
        if err.is_not_found() {
            return Self::NotFound(err.to_string());
        }
        match err {
            ServiceError::InvalidInput(msg) => Self::BadRequest(msg),
            other => Self::Internal { error: other.into(), dev_errors },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, serde_json::json!({"error": msg}))
            },
            Self::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, serde_json::json!({"error": msg}))
            },
            Self::LimitReached => (
                StatusCode::PAYMENT_REQUIRED,
                serde_json::json!({"error": LIMIT_REACHED, "limit_reached": true}),
            ),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, serde_json::json!({"error": msg})),
            Self::TooManyRequests(msg) => {
                (StatusCode::TOO_MANY_REQUESTS, serde_json::json!({"error": msg}))
            },
            Self::Internal { error, dev_errors } => {
                tracing::error!(error = ?error, "internal server error");
                let body = if dev_errors {
                    serde_json::json!({"error": GENERIC_ERROR, "details": format!("{error:#}")})
                } else {
                    serde_json::json!({"error": GENERIC_ERROR})
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            },
        };
        (status, Json(body)).into_response()
    }
}
