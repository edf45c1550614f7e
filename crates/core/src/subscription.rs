use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's subscription row. Read-only during interpretation;
/// `status == active` is the sole admission override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub user_id: String,
    pub status: SubscriptionStatus,
    pub plan_type: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    Free,
    Active,
    Cancelled,
}

impl SubscriptionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Active => "active",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "active" => Ok(Self::Active),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(anyhow::anyhow!("Invalid subscription status: {}", s)),
        }
    }
}

/// Whether an optional subscription row grants unlimited access.
/// A missing row reads as unsubscribed.
#[must_use]
pub fn is_subscribed(subscription: Option<&Subscription>) -> bool {
    subscription.is_some_and(|s| s.status == SubscriptionStatus::Active)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(status: SubscriptionStatus) -> Subscription {
        Subscription {
            user_id: "u1".to_owned(),
            status,
            plan_type: "free_tier".to_owned(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_missing_row_is_unsubscribed() {
        assert!(!is_subscribed(None));
    }

    #[test]
    fn test_only_active_counts() {
        assert!(is_subscribed(Some(&sub(SubscriptionStatus::Active))));
        assert!(!is_subscribed(Some(&sub(SubscriptionStatus::Free))));
        assert!(!is_subscribed(Some(&sub(SubscriptionStatus::Cancelled))));
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!("active".parse::<SubscriptionStatus>().unwrap(), SubscriptionStatus::Active);
        assert!("premium".parse::<SubscriptionStatus>().is_err());
    }
}
