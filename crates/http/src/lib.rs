//! HTTP API server for oneiro.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure params are idiomatic")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]

pub mod api_error;
mod api_types;
mod handlers;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};

use oneiro_service::{InterpretationService, JournalService};

pub use api_types::{ReadinessResponse, VersionResponse};

/// Shared application state for all HTTP handlers.
///
/// Services are constructed once in the binary and injected here;
/// handlers never build their own clients.
pub struct AppState {
    /// The interpretation orchestrator.
    pub interpretation: Arc<InterpretationService>,
    /// Journal reads and side operations.
    pub journal: Arc<JournalService>,
    /// Include error detail in responses (development only).
    pub dev_errors: bool,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    // Browser clients call from arbitrary origins; preflight OPTIONS
    // is answered by the layer with 200 and no body.
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/readiness", get(readiness))
        .route("/api/version", get(version))
        .route("/api/interpret", post(handlers::interpret::interpret_dream))
        .route("/api/dreams", get(handlers::dreams::list_dreams))
        .route("/api/dreams/{id}/messages", get(handlers::dreams::list_messages))
        .route("/api/dreams/{id}", delete(handlers::dreams::delete_dream))
        .route("/api/quota", get(handlers::users::quota_status))
        .route("/api/users/ensure", post(handlers::users::ensure_user))
        .layer(cors)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn readiness() -> (StatusCode, Json<ReadinessResponse>) {
    (StatusCode::OK, Json(ReadinessResponse { status: "ready", message: None }))
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}
