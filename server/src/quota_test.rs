use std::thread;

use super::*;

#[test]
fn unseen_client_has_full_quota() {
    let quota = Quota::in_memory(5);
    assert_eq!(quota.status("1.2.3.4"), QuotaStatus { limit: 5, used: 0, remaining: 5 });
}

#[test]
fn status_has_no_side_effects() {
    let quota = Quota::in_memory(5);
    for _ in 0..3 {
        let _status = quota.status("a");
    }
    assert_eq!(quota.status("a").used, 0);
}

#[test]
fn record_success_counts_by_one() {
    let quota = Quota::in_memory(5);
    assert_eq!(quota.record_success("a"), QuotaStatus { limit: 5, used: 1, remaining: 4 });
    assert_eq!(quota.record_success("a"), QuotaStatus { limit: 5, used: 2, remaining: 3 });
    assert_eq!(quota.status("a").used, 2);
}

#[test]
fn remaining_never_goes_negative() {
    let status = QuotaStatus::new(2, 7);
    assert_eq!(status.remaining, 0);
    assert!(status.exhausted());
}

#[test]
fn zero_limit_is_exhausted_immediately() {
    let quota = Quota::in_memory(0);
    assert!(quota.status("a").exhausted());
}

#[test]
fn clients_are_counted_separately() {
    let quota = Quota::in_memory(3);
    let _a = quota.record_success("a");
    let _b = quota.record_success("a");
    assert_eq!(quota.status("a").remaining, 1);
    assert_eq!(quota.status("b").remaining, 3);
}

#[test]
fn clones_share_one_store() {
    let quota = Quota::in_memory(3);
    let other = quota.clone();
    let _used = other.record_success("a");
    assert_eq!(quota.status("a").used, 1);
    assert_eq!(quota.limit(), 3);
}

#[test]
fn concurrent_increments_are_all_counted() {
    let store = Arc::new(MemoryQuotaStore::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..100 {
                    store.increment("shared");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(store.get("shared"), 800);
}

#[test]
fn increment_saturates() {
    let store = MemoryQuotaStore::new();
    store.counts.lock().unwrap().insert("a".into(), u32::MAX);
    assert_eq!(store.increment("a"), u32::MAX);
}
