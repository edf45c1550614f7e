use std::sync::Arc;
use std::sync::atomic::Ordering;

use chrono::{Duration, Utc};
use oneiro_core::{Remaining, SubscriptionStatus, current_month_start};

use crate::quota::QuotaLedger;
use crate::test_support::MemoryStore;

fn ledger_with(store: &Arc<MemoryStore>) -> QuotaLedger {
    QuotaLedger::new(Arc::clone(store) as Arc<dyn oneiro_storage::RecordStore>)
}

#[tokio::test]
async fn test_under_cap_is_allowed() {
    let store = Arc::new(MemoryStore::new());
    store.seed_dream("u1", Utc::now());
    store.seed_dream("u1", Utc::now());
    let ledger = ledger_with(&store);

    let status = ledger.evaluate("u1", false).await.unwrap();
    assert!(status.allowed);
    assert_eq!(status.usage, 2);
    assert!(!status.is_subscribed);
    assert_eq!(status.remaining, Remaining::Count(1));
}

#[tokio::test]
async fn test_at_cap_is_denied() {
    let store = Arc::new(MemoryStore::new());
    for _ in 0..3 {
        store.seed_dream("u1", Utc::now());
    }
    let ledger = ledger_with(&store);

    let status = ledger.evaluate("u1", false).await.unwrap();
    assert!(!status.allowed);
    assert_eq!(status.usage, 3);
    assert_eq!(status.remaining, Remaining::Count(0));
}

#[tokio::test]
async fn test_active_subscription_overrides_cap() {
    let store = Arc::new(MemoryStore::new());
    for _ in 0..10 {
        store.seed_dream("u1", Utc::now());
    }
    store.set_subscription("u1", SubscriptionStatus::Active);
    let ledger = ledger_with(&store);

    let status = ledger.evaluate("u1", false).await.unwrap();
    assert!(status.allowed);
    assert!(status.is_subscribed);
    assert_eq!(status.remaining, Remaining::Unlimited);
}

#[tokio::test]
async fn test_cancelled_subscription_does_not_override() {
    let store = Arc::new(MemoryStore::new());
    for _ in 0..3 {
        store.seed_dream("u1", Utc::now());
    }
    store.set_subscription("u1", SubscriptionStatus::Cancelled);
    let ledger = ledger_with(&store);

    let status = ledger.evaluate("u1", false).await.unwrap();
    assert!(!status.allowed);
    assert!(!status.is_subscribed);
}

#[tokio::test]
async fn test_continuation_skips_the_usage_check() {
    let store = Arc::new(MemoryStore::new());
    for _ in 0..5 {
        store.seed_dream("u1", Utc::now());
    }
    let ledger = ledger_with(&store);

    let status = ledger.evaluate("u1", true).await.unwrap();
    assert!(status.allowed);
    assert_eq!(store.count_calls.load(Ordering::SeqCst), 0, "no usage read for continuations");
}

#[tokio::test]
async fn test_previous_month_does_not_count() {
    let store = Arc::new(MemoryStore::new());
    let last_month = current_month_start() - Duration::days(1);
    for _ in 0..3 {
        store.seed_dream("u1", last_month);
    }
    let ledger = ledger_with(&store);

    let status = ledger.evaluate("u1", false).await.unwrap();
    assert!(status.allowed);
    assert_eq!(status.usage, 0);
    assert_eq!(status.remaining, Remaining::Count(3));
}

#[tokio::test]
async fn test_remaining_after_write_reflects_new_row() {
    let store = Arc::new(MemoryStore::new());
    store.seed_dream("u1", Utc::now());
    let ledger = ledger_with(&store);

    assert_eq!(ledger.remaining_after_write("u1").await.unwrap(), Remaining::Count(2));
    store.seed_dream("u1", Utc::now());
    assert_eq!(ledger.remaining_after_write("u1").await.unwrap(), Remaining::Count(1));
}

#[tokio::test]
async fn test_other_users_usage_is_isolated() {
    let store = Arc::new(MemoryStore::new());
    for _ in 0..3 {
        store.seed_dream("someone-else", Utc::now());
    }
    let ledger = ledger_with(&store);

    let status = ledger.evaluate("u1", false).await.unwrap();
    assert!(status.allowed);
    assert_eq!(status.usage, 0);
}
