//! Typed error enum for the service layer.
//!
//! Unifies storage, gateway, and identity failures into a single error
//! type so HTTP handlers can map each failure mode to its status code
//! instead of downcasting opaque `anyhow::Error` boxes.

use oneiro_auth::AuthError;
use oneiro_llm::GatewayError;
use oneiro_storage::StorageError;
use thiserror::Error;

/// Service-layer error unifying storage, gateway, and identity failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (DB, not found, duplicate, etc.).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Model gateway call failed in a way that was not degradable.
    #[error("gateway: {0}")]
    Gateway(#[from] GatewayError),

    /// Identity verification failed.
    #[error("auth: {0}")]
    Auth(#[from] AuthError),

    /// Caller provided invalid input (missing or too-short dream text).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Free-tier limit reached for this billing period. Terminal for the
    /// request; nothing was generated or written.
    #[error("free interpretation limit reached")]
    QuotaExceeded,

    /// Serialization/deserialization failed in the service layer.
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServiceError {
    /// Whether the caller should be answered with a 401.
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Auth(e) if e.is_unauthenticated())
    }

    /// Whether this is the quota denial (402 with `limit_reached`).
    #[must_use]
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded)
    }

    /// Whether the provider's rate limit should surface as a 429.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Gateway(e) if e.is_rate_limit())
    }

    /// Whether this error represents a not-found condition.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(StorageError::NotFound { .. }))
    }
}
