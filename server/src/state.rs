//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the per-client quota and the optional image generator. The
//! generator is `None` when no credential is configured; the server still
//! starts and answers quota queries, and every render reports the
//! misconfiguration.

use std::sync::Arc;

use crate::imagegen::ImageGenerate;
use crate::quota::Quota;

/// Shared application state. Clone is required by Axum; every field is
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub quota: Quota,
    /// Image service client. `None` if the credential is not configured.
    pub generator: Option<Arc<dyn ImageGenerate>>,
}

impl AppState {
    #[must_use]
    pub fn new(quota: Quota, generator: Option<Arc<dyn ImageGenerate>>) -> Self {
        Self { quota, generator }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
#[path = "state_helpers_test.rs"]
pub mod test_helpers;
