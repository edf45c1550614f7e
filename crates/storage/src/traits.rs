use async_trait::async_trait;
use chrono::{DateTime, Utc};
use oneiro_core::{Dream, Message, NewDream, QuotaGuard, Subscription};

use crate::error::StorageError;

/// Result of the conditional dream-insert transaction.
#[derive(Debug, Clone)]
pub enum DreamWriteOutcome {
    /// Dream and both messages committed; carries the stored row.
    Created(Dream),
    /// The admission condition no longer held at write time — a
    /// concurrent request consumed the last free slot. Nothing written.
    QuotaExhausted,
}

/// Persistence operations for dreams, their message threads, and the
/// per-user subscription/profile rows the quota ledger reads.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Count dreams a user created at or after `since`.
    async fn count_dreams_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, StorageError>;

    /// Fetch a user's subscription row, if any.
    async fn get_subscription(&self, user_id: &str)
    -> Result<Option<Subscription>, StorageError>;

    /// Insert a dream plus its user/ai message pair in one transaction.
    ///
    /// The insert only happens while `guard` still admits the user, so a
    /// request that lost the quota race reports [`DreamWriteOutcome::QuotaExhausted`]
    /// instead of overshooting the cap.
    async fn create_dream_with_exchange(
        &self,
        dream: &NewDream,
        user_text: &str,
        ai_text: &str,
        guard: &QuotaGuard,
    ) -> Result<DreamWriteOutcome, StorageError>;

    /// Append a user/ai message pair to an existing dream, atomically.
    async fn append_exchange(
        &self,
        dream_id: &str,
        user_text: &str,
        ai_text: &str,
    ) -> Result<(), StorageError>;

    /// Fetch one dream by id.
    async fn get_dream(&self, dream_id: &str) -> Result<Option<Dream>, StorageError>;

    /// A user's dreams, newest first.
    async fn list_dreams(&self, user_id: &str, limit: u32) -> Result<Vec<Dream>, StorageError>;

    /// A dream's message thread, oldest first.
    async fn list_messages(&self, dream_id: &str) -> Result<Vec<Message>, StorageError>;

    /// Delete a dream owned by `user_id`. Returns `true` if a row went away.
    async fn delete_dream(&self, dream_id: &str, user_id: &str) -> Result<bool, StorageError>;

    /// Upsert the profile row and seed a default `free` subscription.
    /// Never downgrades an existing subscription status.
    async fn ensure_user_records(&self, user_id: &str, email: &str) -> Result<(), StorageError>;
}
