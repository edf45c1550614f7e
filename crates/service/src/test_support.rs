//! In-memory RecordStore double for service-layer tests.

#![allow(clippy::unwrap_used, reason = "test support code")]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use oneiro_core::{
    Dream, Message, NewDream, QuotaGuard, Sender, Subscription, SubscriptionStatus,
};
use oneiro_storage::{DreamWriteOutcome, RecordStore, StorageError};
use uuid::Uuid;

/// Mirrors the Postgres semantics closely enough for orchestration
/// tests: the conditional insert re-checks the guard, exchanges are
/// all-or-nothing, deletes cascade.
#[derive(Default)]
pub(crate) struct MemoryStore {
    pub dreams: Mutex<Vec<Dream>>,
    pub messages: Mutex<Vec<Message>>,
    pub subscriptions: Mutex<HashMap<String, Subscription>>,
    pub profiles: Mutex<HashMap<String, String>>,
    /// How many times the usage count was read.
    pub count_calls: AtomicUsize,
    /// Make every write fail with a database error.
    pub fail_writes: AtomicBool,
    /// Simulate losing the admission race at write time.
    pub force_quota_exhausted: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_dream(&self, user_id: &str, created_at: DateTime<Utc>) -> String {
        let id = Uuid::new_v4().to_string();
        self.dreams.lock().unwrap().push(Dream {
            id: id.clone(),
            user_id: user_id.to_owned(),
            title: "seeded dream".to_owned(),
            content: "seeded dream content for tests".to_owned(),
            interpretation: "seeded interpretation".to_owned(),
            created_at,
        });
        id
    }

    pub fn set_subscription(&self, user_id: &str, status: SubscriptionStatus) {
        self.subscriptions.lock().unwrap().insert(
            user_id.to_owned(),
            Subscription {
                user_id: user_id.to_owned(),
                status,
                plan_type: "monthly".to_owned(),
                updated_at: Utc::now(),
            },
        );
    }

    pub fn message_count(&self, dream_id: &str) -> usize {
        self.messages.lock().unwrap().iter().filter(|m| m.dream_id == dream_id).count()
    }

    fn write_error() -> StorageError {
        StorageError::Database(sqlx::Error::PoolTimedOut)
    }

    fn push_exchange(&self, dream_id: &str, user_text: &str, ai_text: &str) {
        let now = Utc::now();
        let mut messages = self.messages.lock().unwrap();
        messages.push(Message {
            id: Uuid::new_v4().to_string(),
            dream_id: dream_id.to_owned(),
            sender: Sender::User,
            content: user_text.to_owned(),
            created_at: now,
        });
        messages.push(Message {
            id: Uuid::new_v4().to_string(),
            dream_id: dream_id.to_owned(),
            sender: Sender::Ai,
            content: ai_text.to_owned(),
            created_at: now + Duration::milliseconds(1),
        });
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn count_dreams_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, StorageError> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        let count = self
            .dreams
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.user_id == user_id && d.created_at >= since)
            .count();
        Ok(u32::try_from(count).unwrap())
    }

    async fn get_subscription(
        &self,
        user_id: &str,
    ) -> Result<Option<Subscription>, StorageError> {
        Ok(self.subscriptions.lock().unwrap().get(user_id).cloned())
    }

    async fn create_dream_with_exchange(
        &self,
        dream: &NewDream,
        user_text: &str,
        ai_text: &str,
        guard: &QuotaGuard,
    ) -> Result<DreamWriteOutcome, StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::write_error());
        }
        if self.force_quota_exhausted.load(Ordering::SeqCst) {
            return Ok(DreamWriteOutcome::QuotaExhausted);
        }

        let in_window = self
            .dreams
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.user_id == dream.user_id && d.created_at >= guard.window_start)
            .count();
        if !guard.subscribed && in_window >= guard.limit as usize {
            return Ok(DreamWriteOutcome::QuotaExhausted);
        }

        let created = Dream {
            id: dream.id.clone(),
            user_id: dream.user_id.clone(),
            title: dream.title.clone(),
            content: dream.content.clone(),
            interpretation: dream.interpretation.clone(),
            created_at: Utc::now(),
        };
        self.dreams.lock().unwrap().push(created.clone());
        self.push_exchange(&dream.id, user_text, ai_text);
        Ok(DreamWriteOutcome::Created(created))
    }

    async fn append_exchange(
        &self,
        dream_id: &str,
        user_text: &str,
        ai_text: &str,
    ) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::write_error());
        }
        if !self.dreams.lock().unwrap().iter().any(|d| d.id == dream_id) {
            return Err(StorageError::NotFound { entity: "dream", id: dream_id.to_owned() });
        }
        self.push_exchange(dream_id, user_text, ai_text);
        Ok(())
    }

    async fn get_dream(&self, dream_id: &str) -> Result<Option<Dream>, StorageError> {
        Ok(self.dreams.lock().unwrap().iter().find(|d| d.id == dream_id).cloned())
    }

    async fn list_dreams(&self, user_id: &str, limit: u32) -> Result<Vec<Dream>, StorageError> {
        let mut dreams: Vec<Dream> = self
            .dreams
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect();
        dreams.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        dreams.truncate(limit as usize);
        Ok(dreams)
    }

    async fn list_messages(&self, dream_id: &str) -> Result<Vec<Message>, StorageError> {
        let mut messages: Vec<Message> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.dream_id == dream_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(messages)
    }

    async fn delete_dream(&self, dream_id: &str, user_id: &str) -> Result<bool, StorageError> {
        let mut dreams = self.dreams.lock().unwrap();
        let before = dreams.len();
        dreams.retain(|d| !(d.id == dream_id && d.user_id == user_id));
        let deleted = dreams.len() < before;
        if deleted {
            self.messages.lock().unwrap().retain(|m| m.dream_id != dream_id);
        }
        Ok(deleted)
    }

    async fn ensure_user_records(&self, user_id: &str, email: &str) -> Result<(), StorageError> {
        self.profiles.lock().unwrap().insert(user_id.to_owned(), email.to_owned());
        self.subscriptions.lock().unwrap().entry(user_id.to_owned()).or_insert_with(|| {
            Subscription {
                user_id: user_id.to_owned(),
                status: SubscriptionStatus::Free,
                plan_type: "free_tier".to_owned(),
                updated_at: Utc::now(),
            }
        });
        Ok(())
    }
}
