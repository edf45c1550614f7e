//! Quota window and admission types.
//!
//! The quota window is derived, never stored: [start of the current
//! calendar month (UTC), now). Usage is the count of dream rows created
//! inside that window.

use chrono::{DateTime, Datelike, NaiveTime, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::constants::FREE_MONTHLY_LIMIT;

/// Interpretations left this month. Serializes as a number, or the
/// string `"unlimited"` for subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Unlimited,
    Count(u32),
}

impl Remaining {
    /// Remaining free-tier slots given a usage count. Never negative.
    #[must_use]
    pub const fn from_usage(usage: u32) -> Self {
        Self::Count(FREE_MONTHLY_LIMIT.saturating_sub(usage))
    }
}

impl Serialize for Remaining {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::Unlimited => serializer.serialize_str("unlimited"),
            Self::Count(n) => serializer.serialize_u32(n),
        }
    }
}

impl<'de> Deserialize<'de> for Remaining {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RemainingVisitor;

        impl Visitor<'_> for RemainingVisitor {
            type Value = Remaining;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a non-negative integer or the string \"unlimited\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Remaining, E> {
                u32::try_from(v)
                    .map(Remaining::Count)
                    .map_err(|_| E::custom("remaining count out of range"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Remaining, E> {
                if v == "unlimited" {
                    Ok(Remaining::Unlimited)
                } else {
                    Err(E::custom(format!("unexpected remaining value: {v}")))
                }
            }
        }

        deserializer.deserialize_any(RemainingVisitor)
    }
}

/// Outcome of a quota evaluation for one request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuotaStatus {
    pub allowed: bool,
    pub usage: u32,
    pub is_subscribed: bool,
    pub remaining: Remaining,
}

/// Admission condition re-checked inside the dream-insert transaction,
/// closing the check-then-act race between concurrent requests.
#[derive(Debug, Clone, Copy)]
pub struct QuotaGuard {
    pub subscribed: bool,
    pub window_start: DateTime<Utc>,
    pub limit: u32,
}

/// Start of the calendar month containing `now`, at UTC midnight.
#[must_use]
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let first = now.date_naive().with_day(1).unwrap_or_else(|| now.date_naive());
    first.and_time(NaiveTime::MIN).and_utc()
}

/// Quota window start for the current instant.
#[must_use]
pub fn current_month_start() -> DateTime<Utc> {
    month_start(Utc::now())
}
