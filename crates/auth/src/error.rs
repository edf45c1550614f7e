//! Typed error enum for identity verification.

use thiserror::Error;

/// Errors from the identity-provider boundary.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Request carried no bearer credential at all.
    #[error("no authorization header")]
    MissingToken,
    /// Provider rejected the token (expired, revoked, malformed).
    #[error("invalid or expired token")]
    Unauthorized,
    /// Network / timeout failure before a response arrived.
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    /// Provider returned an unexpected non-success status.
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    /// Provider payload did not parse.
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    /// HTTP client construction failed (TLS backend).
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl AuthError {
    /// Whether the caller should be answered with a 401.
    #[must_use]
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::MissingToken | Self::Unauthorized)
    }
}
