//! Per-client render quota.
//!
//! DESIGN
//! ======
//! A `QuotaStore` counts successful renders per client key for the process
//! lifetime. `Quota` pairs a store with the configured limit and derives the
//! `{limit, used, remaining}` view both endpoints report.
//!
//! TRADE-OFFS
//! ==========
//! `get` and `increment` are separate calls. The render flow reads, calls
//! the upstream service, then increments, so concurrent requests from one
//! client can each pass the check and overshoot the limit by the number in
//! flight. Keys are never evicted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

// =============================================================================
// STORE
// =============================================================================

/// Counter storage keyed by client identifier.
pub trait QuotaStore: Send + Sync {
    /// Successful renders recorded for `key`, 0 if never seen.
    fn get(&self, key: &str) -> u32;

    /// Record one more successful render for `key` and return the new count.
    fn increment(&self, key: &str) -> u32;
}

/// In-process store. Counts vanish on restart.
#[derive(Default)]
pub struct MemoryQuotaStore {
    counts: Mutex<HashMap<String, u32>>,
}

impl MemoryQuotaStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuotaStore for MemoryQuotaStore {
    fn get(&self, key: &str) -> u32 {
        let counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        counts.get(key).copied().unwrap_or(0)
    }

    fn increment(&self, key: &str) -> u32 {
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        let count = counts.entry(key.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }
}

// =============================================================================
// QUOTA
// =============================================================================

/// Quota view reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaStatus {
    pub limit: u32,
    pub used: u32,
    pub remaining: u32,
}

impl QuotaStatus {
    #[must_use]
    pub fn new(limit: u32, used: u32) -> Self {
        Self { limit, used, remaining: limit.saturating_sub(used) }
    }

    #[must_use]
    pub fn exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// A store plus the limit every client shares.
#[derive(Clone)]
pub struct Quota {
    store: Arc<dyn QuotaStore>,
    limit: u32,
}

impl Quota {
    #[must_use]
    pub fn new(store: Arc<dyn QuotaStore>, limit: u32) -> Self {
        Self { store, limit }
    }

    /// Quota backed by a fresh [`MemoryQuotaStore`].
    #[must_use]
    pub fn in_memory(limit: u32) -> Self {
        Self::new(Arc::new(MemoryQuotaStore::new()), limit)
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Current status for `client`. No side effects.
    #[must_use]
    pub fn status(&self, client: &str) -> QuotaStatus {
        QuotaStatus::new(self.limit, self.store.get(client))
    }

    /// Count one successful render and return the updated status.
    #[must_use]
    pub fn record_success(&self, client: &str) -> QuotaStatus {
        QuotaStatus::new(self.limit, self.store.increment(client))
    }
}

#[cfg(test)]
#[path = "quota_test.rs"]
mod tests;
