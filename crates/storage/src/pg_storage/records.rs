//! RecordStore implementation for PgStorage.

use super::{PgStorage, row_to_dream, row_to_message, row_to_subscription};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use oneiro_core::{Dream, Message, NewDream, QuotaGuard, Sender, Subscription};
use sqlx::{Postgres, Row, Transaction};
use uuid::Uuid;

use crate::error::StorageError;
use crate::traits::{DreamWriteOutcome, RecordStore};

const DREAM_COLUMNS: &str = "id, user_id, title, content, interpretation, created_at";
const MESSAGE_COLUMNS: &str = "id, dream_id, sender, content, created_at";

/// Insert one message row. `clock_timestamp()` advances within a
/// transaction, keeping the user message strictly before the ai reply.
async fn insert_message(
    tx: &mut Transaction<'_, Postgres>,
    dream_id: &str,
    sender: Sender,
    content: &str,
) -> Result<(), StorageError> {
    sqlx::query(
        "INSERT INTO messages (id, dream_id, sender, content, created_at)
         VALUES ($1, $2, $3, $4, clock_timestamp())",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(dream_id)
    .bind(sender.as_str())
    .bind(content)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[async_trait]
impl RecordStore for PgStorage {
    async fn count_dreams_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, StorageError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM dreams WHERE user_id = $1 AND created_at >= $2")
                .bind(user_id)
                .bind(since)
                .fetch_one(self.pool())
                .await?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn get_subscription(
        &self,
        user_id: &str,
    ) -> Result<Option<Subscription>, StorageError> {
        let row = sqlx::query(
            "SELECT user_id, status, plan_type, updated_at FROM subscriptions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;
        row.map(|r| row_to_subscription(&r)).transpose()
    }

    async fn create_dream_with_exchange(
        &self,
        dream: &NewDream,
        user_text: &str,
        ai_text: &str,
        guard: &QuotaGuard,
    ) -> Result<DreamWriteOutcome, StorageError> {
        let mut tx = self.pool().begin().await?;

        // Per-user advisory lock serializes admission, so the count in
        // the conditional insert below cannot go stale mid-transaction.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&dream.user_id)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query(
            "INSERT INTO dreams (id, user_id, title, content, interpretation)
             SELECT $1, $2, $3, $4, $5
             WHERE $6
                OR (SELECT COUNT(*) FROM dreams
                    WHERE user_id = $2 AND created_at >= $7) < $8
             RETURNING created_at",
        )
        .bind(&dream.id)
        .bind(&dream.user_id)
        .bind(&dream.title)
        .bind(&dream.content)
        .bind(&dream.interpretation)
        .bind(guard.subscribed)
        .bind(guard.window_start)
        .bind(i64::from(guard.limit))
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(DreamWriteOutcome::QuotaExhausted);
        };
        let created_at: DateTime<Utc> = row.try_get("created_at")?;

        insert_message(&mut tx, &dream.id, Sender::User, user_text).await?;
        insert_message(&mut tx, &dream.id, Sender::Ai, ai_text).await?;
        tx.commit().await?;

        Ok(DreamWriteOutcome::Created(Dream {
            id: dream.id.clone(),
            user_id: dream.user_id.clone(),
            title: dream.title.clone(),
            content: dream.content.clone(),
            interpretation: dream.interpretation.clone(),
            created_at,
        }))
    }

    async fn append_exchange(
        &self,
        dream_id: &str,
        user_text: &str,
        ai_text: &str,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool().begin().await?;

        let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM dreams WHERE id = $1")
            .bind(dream_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(StorageError::NotFound { entity: "dream", id: dream_id.to_owned() });
        }

        insert_message(&mut tx, dream_id, Sender::User, user_text).await?;
        insert_message(&mut tx, dream_id, Sender::Ai, ai_text).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn get_dream(&self, dream_id: &str) -> Result<Option<Dream>, StorageError> {
        let row = sqlx::query(&format!("SELECT {DREAM_COLUMNS} FROM dreams WHERE id = $1"))
            .bind(dream_id)
            .fetch_optional(self.pool())
            .await?;
        row.map(|r| row_to_dream(&r)).transpose()
    }

    async fn list_dreams(&self, user_id: &str, limit: u32) -> Result<Vec<Dream>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {DREAM_COLUMNS} FROM dreams
             WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(row_to_dream).collect()
    }

    async fn list_messages(&self, dream_id: &str) -> Result<Vec<Message>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages
             WHERE dream_id = $1 ORDER BY created_at ASC"
        ))
        .bind(dream_id)
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(row_to_message).collect()
    }

    async fn delete_dream(&self, dream_id: &str, user_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM dreams WHERE id = $1 AND user_id = $2")
            .bind(dream_id)
            .bind(user_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ensure_user_records(&self, user_id: &str, email: &str) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO profiles (id, email) VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET email = EXCLUDED.email, updated_at = NOW()",
        )
        .bind(user_id)
        .bind(email)
        .execute(self.pool())
        .await?;

        // DO NOTHING: an existing subscription (possibly active) must
        // never be reset to the free tier by a login.
        sqlx::query(
            "INSERT INTO subscriptions (user_id, status, plan_type) VALUES ($1, 'free', 'free_tier')
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(self.pool())
        .await?;
        Ok(())
    }
}
