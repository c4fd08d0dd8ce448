//! Render overlay: the stylized image shown over the map, the single-flight
//! render gate, and the wire types of the render proxy's replies.
//!
//! The overlay lives from a successful render until the next viewport move.
//! A failed render leaves whatever overlay was showing untouched.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use serde::{Deserialize, Serialize};

/// Per-client render allowance as reported by the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaStatus {
    pub limit: u32,
    pub used: u32,
    pub remaining: u32,
}

/// Body of a successful `POST /render`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderReply {
    pub image_url: String,
    pub limit: u32,
    pub used: u32,
    pub remaining: u32,
}

impl RenderReply {
    #[must_use]
    pub fn quota(&self) -> QuotaStatus {
        QuotaStatus { limit: self.limit, used: self.used, remaining: self.remaining }
    }
}

/// Body of a failed `POST /render`.
#[derive(Debug, Clone, Deserialize)]
struct ErrorReply {
    #[serde(default)]
    error: String,
    limit: Option<u32>,
    used: Option<u32>,
}

/// Why a render produced no image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderFailure {
    #[error("render quota exhausted ({} of {} used)", .0.used, .0.limit)]
    QuotaExceeded(QuotaStatus),
    #[error("render rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("render reply unreadable: {0}")]
    Malformed(String),
    #[error("render request failed: {0}")]
    Transport(String),
}

/// Interpret the proxy's HTTP status and JSON body.
///
/// # Errors
///
/// Returns a [`RenderFailure`] for every non-200 status and for bodies that
/// do not parse.
pub fn parse_render_reply(status: u16, body: &str) -> Result<RenderReply, RenderFailure> {
    if status == 200 {
        return serde_json::from_str(body).map_err(|e| RenderFailure::Malformed(e.to_string()));
    }
    let reply: ErrorReply = serde_json::from_str(body).map_err(|e| RenderFailure::Malformed(e.to_string()))?;
    if status == 429 {
        let limit = reply.limit.unwrap_or_default();
        let used = reply.used.unwrap_or(limit);
        return Err(RenderFailure::QuotaExceeded(QuotaStatus { limit, used, remaining: 0 }));
    }
    Err(RenderFailure::Rejected { status, message: reply.error })
}

/// Overlay image, in-flight flag, and the last quota seen.
#[derive(Debug, Clone, Default)]
pub struct OverlayState {
    image_url: Option<String>,
    in_flight: bool,
    quota: Option<QuotaStatus>,
}

impl OverlayState {
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    #[must_use]
    pub fn quota(&self) -> Option<QuotaStatus> {
        self.quota
    }

    pub fn set_quota(&mut self, quota: QuotaStatus) {
        self.quota = Some(quota);
    }

    /// A render may start: none in flight. A spent quota mirror is only
    /// advisory; the proxy's 429 is what enforces it.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.in_flight
    }

    /// Claim the render slot. Returns `false` (and changes nothing) if a
    /// render may not start.
    pub fn begin(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Release the render slot without an outcome (capture failed).
    pub fn abort(&mut self) {
        self.in_flight = false;
    }

    /// Apply a render outcome. Returns `true` when the overlay image changed.
    pub fn finish(&mut self, outcome: &Result<RenderReply, RenderFailure>) -> bool {
        self.in_flight = false;
        match outcome {
            Ok(reply) => {
                self.quota = Some(reply.quota());
                self.image_url = Some(reply.image_url.clone());
                true
            }
            Err(RenderFailure::QuotaExceeded(quota)) => {
                self.quota = Some(*quota);
                false
            }
            Err(_) => false,
        }
    }

    /// Drop the overlay image. Returns `true` if one was showing.
    pub fn clear(&mut self) -> bool {
        self.image_url.take().is_some()
    }
}
