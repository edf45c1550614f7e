//! PostgreSQL storage backend using sqlx.

#![allow(clippy::absolute_paths, reason = "std paths in error handling are clear")]

mod records;

use chrono::{DateTime, Utc};
use oneiro_core::constants::{
    PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS,
};
use oneiro_core::{Dream, Message, Sender, Subscription, SubscriptionStatus};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::error::StorageError;
use crate::pg_migrations::run_pg_migrations;

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Connect, configure the pool, and run migrations.
    ///
    /// # Errors
    /// Returns an error if the connection or a migration fails.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(std::time::Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(std::time::Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        run_pg_migrations(&pool).await.map_err(|e| StorageError::Migration(e.to_string()))?;
        tracing::info!("PgStorage initialized");
        Ok(Self { pool })
    }

    pub(crate) const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Parse a `sender` text column. Corrupt values are logged and read as
/// the user side so the thread still renders.
pub(crate) fn parse_pg_sender(s: &str) -> Sender {
    s.parse().unwrap_or_else(|_| {
        tracing::warn!(invalid_sender = %s, "corrupt sender in DB, defaulting to user");
        Sender::User
    })
}

/// Parse a subscription `status` text column, defaulting corrupt values
/// to `free` (the non-privileged reading).
pub(crate) fn parse_pg_subscription_status(s: &str) -> SubscriptionStatus {
    s.parse().unwrap_or_else(|_| {
        tracing::warn!(invalid_status = %s, "corrupt subscription status in DB, defaulting to free");
        SubscriptionStatus::Free
    })
}

pub(crate) fn row_to_dream(row: &sqlx::postgres::PgRow) -> Result<Dream, StorageError> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(Dream {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        interpretation: row.try_get("interpretation")?,
        created_at,
    })
}

pub(crate) fn row_to_message(row: &sqlx::postgres::PgRow) -> Result<Message, StorageError> {
    let sender = parse_pg_sender(&row.try_get::<String, _>("sender")?);
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(Message {
        id: row.try_get("id")?,
        dream_id: row.try_get("dream_id")?,
        sender,
        content: row.try_get("content")?,
        created_at,
    })
}

pub(crate) fn row_to_subscription(row: &sqlx::postgres::PgRow) -> Result<Subscription, StorageError> {
    let status = parse_pg_subscription_status(&row.try_get::<String, _>("status")?);
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;
    Ok(Subscription {
        user_id: row.try_get("user_id")?,
        status,
        plan_type: row.try_get("plan_type")?,
        updated_at,
    })
}
