use std::sync::Arc;

use oneiro_auth::{AuthClient, AuthError, AuthUser};
use oneiro_core::constants::{DREAM_TEXT_MIN_CHARS, FREE_MONTHLY_LIMIT};
use oneiro_core::{
    InterpretationRecord, NewDream, QuotaGuard, QuotaStatus, Remaining, ResponseMode,
    current_month_start, derive_title,
};
use oneiro_llm::{GatewayError, LlmClient, build_prompt, normalize};
use oneiro_storage::{DreamWriteOutcome, RecordStore};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::fallback::fallback_interpretation;
use crate::quota::QuotaLedger;

/// One inbound interpretation request, already decoded from JSON.
#[derive(Debug, Clone)]
pub struct InterpretRequest {
    pub dream_text: String,
    pub dream_id: Option<String>,
    pub is_continuation: bool,
}

/// Everything the handler needs to answer the caller, in either
/// response mode. `record` is populated only in structured mode.
#[derive(Debug, Clone)]
pub struct InterpretOutcome {
    pub reply: String,
    pub record: Option<InterpretationRecord>,
    pub dream_id: Option<String>,
    pub remaining: Remaining,
    pub is_continuation: bool,
    pub model: Option<String>,
}

/// The interpretation orchestrator.
///
/// One request flows Authenticating → CheckingQuota → Generating →
/// Normalizing|PassThrough → Persisting → ComputingFinalQuota →
/// Responding. Denial and authentication failures abort before any
/// model call; gateway failures (except rate limits) degrade to a
/// canned interpretation; persistence failures are logged and the
/// reply still goes out.
pub struct InterpretationService {
    auth: Arc<AuthClient>,
    store: Arc<dyn RecordStore>,
    gateway: Option<Arc<LlmClient>>,
    ledger: QuotaLedger,
    mode: ResponseMode,
}

impl InterpretationService {
    #[must_use]
    pub fn new(
        auth: Arc<AuthClient>,
        store: Arc<dyn RecordStore>,
        gateway: Option<Arc<LlmClient>>,
        mode: ResponseMode,
    ) -> Self {
        let ledger = QuotaLedger::new(Arc::clone(&store));
        Self { auth, store, gateway, ledger, mode }
    }

    pub async fn interpret(
        &self,
        bearer: Option<&str>,
        request: InterpretRequest,
    ) -> Result<InterpretOutcome, ServiceError> {
        // Authenticating: the only gate before any business logic.
        let token = bearer.ok_or(AuthError::MissingToken)?;
        let user = self.auth.get_user(token).await?;

        let dream_text = request.dream_text.trim().to_owned();
        if dream_text.chars().count() < DREAM_TEXT_MIN_CHARS {
            return Err(ServiceError::InvalidInput(
                "Dream description must be at least 10 characters long.".to_owned(),
            ));
        }

        // CheckingQuota: denial is terminal, no side effects.
        let quota = self.ledger.evaluate(&user.id, request.is_continuation).await?;
        if !quota.allowed {
            return Err(ServiceError::QuotaExceeded);
        }

        // Generating
        let raw = self.generate(&dream_text).await?;

        // Normalizing | PassThrough
        let (reply, record, persisted_text) = match self.mode {
            ResponseMode::Narrative => (raw.clone(), None, raw),
            ResponseMode::Structured => {
                let record = normalize(&raw);
                let persisted_text = serde_json::to_string(&record)?;
                (record.core_interpretation.clone(), Some(record), persisted_text)
            },
        };

        // Persisting
        let dream_id =
            self.persist(&user, &dream_text, &persisted_text, &request, &quota).await?;

        // ComputingFinalQuota: recount post-write so the slot just used
        // is already reflected.
        let remaining = match self.ledger.remaining_after_write(&user.id).await {
            Ok(remaining) => remaining,
            Err(e) => {
                tracing::warn!("Post-write quota recount failed: {e}");
                Remaining::Count(0)
            },
        };

        Ok(InterpretOutcome {
            reply,
            record,
            dream_id,
            remaining,
            is_continuation: request.is_continuation,
            model: self.gateway.as_deref().map(|g| g.model().to_owned()),
        })
    }

    /// Call the gateway, or degrade. Rate limits surface to the caller;
    /// every other gateway failure becomes the canned interpretation.
    async fn generate(&self, dream_text: &str) -> Result<String, ServiceError> {
        let prompt = build_prompt(self.mode, dream_text);
        let result = match &self.gateway {
            Some(gateway) => gateway.generate(&prompt, self.mode).await,
            None => Err(GatewayError::MissingCredentials),
        };
        match result {
            Ok(raw) => Ok(raw),
            Err(e) if e.is_rate_limit() => Err(ServiceError::Gateway(e)),
            Err(e) => {
                tracing::warn!("Model gateway failed, serving fallback interpretation: {e}");
                Ok(fallback_interpretation(dream_text))
            },
        }
    }

    async fn persist(
        &self,
        user: &AuthUser,
        dream_text: &str,
        ai_text: &str,
        request: &InterpretRequest,
        quota: &QuotaStatus,
    ) -> Result<Option<String>, ServiceError> {
        if request.is_continuation {
            let Some(dream_id) = request.dream_id.as_deref() else {
                tracing::warn!("Continuation without a dream id; skipping persistence");
                return Ok(None);
            };
            if let Err(e) = self.store.append_exchange(dream_id, dream_text, ai_text).await {
                tracing::error!("Failed to append exchange to dream {dream_id}: {e}");
            }
            return Ok(Some(dream_id.to_owned()));
        }

        let dream = NewDream {
            id: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            title: derive_title(dream_text),
            content: dream_text.to_owned(),
            interpretation: ai_text.to_owned(),
        };
        let guard = QuotaGuard {
            subscribed: quota.is_subscribed,
            window_start: current_month_start(),
            limit: FREE_MONTHLY_LIMIT,
        };
        match self.store.create_dream_with_exchange(&dream, dream_text, ai_text, &guard).await {
            Ok(DreamWriteOutcome::Created(created)) => Ok(Some(created.id)),
            // Lost the admission race to a concurrent request. The model
            // call is sunk cost; nothing was written.
            Ok(DreamWriteOutcome::QuotaExhausted) => Err(ServiceError::QuotaExceeded),
            Err(e) => {
                // Availability over durability: the reply still goes out.
                tracing::error!("Failed to persist dream exchange: {e}");
                Ok(None)
            },
        }
    }
}
