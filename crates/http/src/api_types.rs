//! Request and response shapes for the HTTP API.

use chrono::{DateTime, Utc};
use oneiro_core::{InterpretationRecord, QuotaStatus, Remaining};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/interpret`. Field names match the web client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretRequestBody {
    pub dream_text: String,
    #[serde(default)]
    pub dream_id: Option<String>,
    #[serde(default)]
    pub is_continuation: bool,
}

/// Success response in the narrative mode.
#[derive(Debug, Serialize)]
pub struct InterpretResponse {
    pub reply: String,
    pub dream_id: Option<String>,
    pub interpretations_left: Remaining,
    pub is_continuation: bool,
}

/// Success response in the structured mode.
#[derive(Debug, Serialize)]
pub struct StructuredInterpretResponse {
    pub success: bool,
    pub interpretation: InterpretationRecord,
    pub metadata: InterpretMetadata,
}

#[derive(Debug, Serialize)]
pub struct InterpretMetadata {
    pub dream_length: usize,
    pub model: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub dream_id: Option<String>,
    pub interpretations_left: Remaining,
    pub is_continuation: bool,
}

/// Response of `GET /api/quota`.
#[derive(Debug, Serialize)]
pub struct QuotaResponse {
    pub is_subscribed: bool,
    pub remaining: Remaining,
    pub total_used: u32,
}

impl From<QuotaStatus> for QuotaResponse {
    fn from(status: QuotaStatus) -> Self {
        Self {
            is_subscribed: status.is_subscribed,
            remaining: status.remaining,
            total_used: status.usage,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteDreamResponse {
    pub deleted: bool,
    pub dream_id: String,
}

#[derive(Debug, Serialize)]
pub struct EnsureUserResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
}
