//! Typed error enum for the model gateway.

use thiserror::Error;

/// Errors from the generative-text provider boundary.
///
/// Nothing here is retried automatically; recovery is a fresh
/// caller-initiated request (or the orchestrator's fallback text).
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No API credential configured; fatal for the request, never retried.
    #[error("model gateway credentials are not configured")]
    MissingCredentials,
    /// Provider signaled a rate/quota limit (HTTP 429).
    #[error("provider rate limit: {0}")]
    RateLimited(String),
    /// Network / timeout failure before a response arrived.
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    /// Provider returned a non-success status.
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    /// Response envelope did not parse.
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    /// Success status but no choices in the payload.
    #[error("empty response: no choices returned")]
    EmptyResponse,
    /// HTTP client construction failed (TLS backend).
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl GatewayError {
    /// Whether this is the provider's rate-limit signal, which surfaces
    /// to the caller as its own status instead of degraded-mode text.
    #[must_use]
    pub const fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}
