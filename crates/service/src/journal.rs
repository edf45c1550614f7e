use std::sync::Arc;

use oneiro_auth::{AuthClient, AuthError, AuthUser};
use oneiro_core::constants::DREAM_LIST_CAP;
use oneiro_core::{Dream, Message, QuotaStatus};
use oneiro_storage::{RecordStore, StorageError};

use crate::error::ServiceError;
use crate::quota::QuotaLedger;

/// Read paths and side operations around the dream journal: listing,
/// history, deletion, quota status, profile bootstrapping. All are
/// scoped to the authenticated caller.
pub struct JournalService {
    auth: Arc<AuthClient>,
    store: Arc<dyn RecordStore>,
    ledger: QuotaLedger,
}

impl JournalService {
    #[must_use]
    pub fn new(auth: Arc<AuthClient>, store: Arc<dyn RecordStore>) -> Self {
        let ledger = QuotaLedger::new(Arc::clone(&store));
        Self { auth, store, ledger }
    }

    async fn require_user(&self, bearer: Option<&str>) -> Result<AuthUser, ServiceError> {
        let token = bearer.ok_or(AuthError::MissingToken)?;
        Ok(self.auth.get_user(token).await?)
    }

    /// The caller's dreams, newest first, capped at 50.
    pub async fn list_dreams(&self, bearer: Option<&str>) -> Result<Vec<Dream>, ServiceError> {
        let user = self.require_user(bearer).await?;
        Ok(self.store.list_dreams(&user.id, DREAM_LIST_CAP).await?)
    }

    /// A dream's thread, oldest first. Not found unless the caller owns it.
    pub async fn list_messages(
        &self,
        bearer: Option<&str>,
        dream_id: &str,
    ) -> Result<Vec<Message>, ServiceError> {
        let user = self.require_user(bearer).await?;
        let dream = self
            .store
            .get_dream(dream_id)
            .await?
            .filter(|d| d.user_id == user.id)
            .ok_or_else(|| {
                ServiceError::Storage(StorageError::NotFound {
                    entity: "dream",
                    id: dream_id.to_owned(),
                })
            })?;
        Ok(self.store.list_messages(&dream.id).await?)
    }

    /// Delete one of the caller's dreams. Returns `false` when the id
    /// doesn't exist or belongs to someone else.
    pub async fn delete_dream(
        &self,
        bearer: Option<&str>,
        dream_id: &str,
    ) -> Result<bool, ServiceError> {
        let user = self.require_user(bearer).await?;
        Ok(self.store.delete_dream(dream_id, &user.id).await?)
    }

    /// Current usage, subscription state, and remaining interpretations.
    pub async fn quota_status(&self, bearer: Option<&str>) -> Result<QuotaStatus, ServiceError> {
        let user = self.require_user(bearer).await?;
        self.ledger.evaluate(&user.id, false).await
    }

    /// Upsert the caller's profile row and seed a free subscription.
    pub async fn ensure_user(&self, bearer: Option<&str>) -> Result<(), ServiceError> {
        let user = self.require_user(bearer).await?;
        let email = user.email.as_deref().unwrap_or_default();
        Ok(self.store.ensure_user_records(&user.id, email).await?)
    }
}
