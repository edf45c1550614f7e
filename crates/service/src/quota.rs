use std::sync::Arc;

use oneiro_core::constants::FREE_MONTHLY_LIMIT;
use oneiro_core::{QuotaStatus, Remaining, current_month_start, is_subscribed};
use oneiro_storage::RecordStore;

use crate::error::ServiceError;

/// Computes a user's usage for the current billing period and decides
/// admit/deny. The window is the current calendar month; an active
/// subscription is the sole override.
pub struct QuotaLedger {
    store: Arc<dyn RecordStore>,
}

impl QuotaLedger {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Evaluate admission for one request.
    ///
    /// Continuations skip the usage check entirely — an existing
    /// conversation is never cut off mid-thread.
    pub async fn evaluate(
        &self,
        user_id: &str,
        is_continuation: bool,
    ) -> Result<QuotaStatus, ServiceError> {
        if is_continuation {
            return Ok(QuotaStatus {
                allowed: true,
                usage: 0,
                is_subscribed: false,
                remaining: Remaining::from_usage(0),
            });
        }

        let window_start = current_month_start();
        let usage = self.store.count_dreams_since(user_id, window_start).await?;
        let subscription = self.store.get_subscription(user_id).await?;
        let subscribed = is_subscribed(subscription.as_ref());

        let allowed = subscribed || usage < FREE_MONTHLY_LIMIT;
        let remaining =
            if subscribed { Remaining::Unlimited } else { Remaining::from_usage(usage) };
        Ok(QuotaStatus { allowed, usage, is_subscribed: subscribed, remaining })
    }

    /// Recount after a write so a just-used interpretation is reflected
    /// in the `remaining` value returned to the caller.
    pub async fn remaining_after_write(&self, user_id: &str) -> Result<Remaining, ServiceError> {
        let usage = self.store.count_dreams_since(user_id, current_month_start()).await?;
        let subscription = self.store.get_subscription(user_id).await?;
        if is_subscribed(subscription.as_ref()) {
            Ok(Remaining::Unlimited)
        } else {
            Ok(Remaining::from_usage(usage))
        }
    }
}
