//! Render service: captured scene, quota check, image service, overlay URL.
//!
//! DESIGN
//! ======
//! The order of checks is fixed: quota first (before the body is even
//! parsed), then request shape, then service configuration, then payload
//! decoding. Only a fully successful generation is counted against the
//! client's quota; every failure leaves the count unchanged.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::ErrorCode;
use crate::imagegen::{ImageGenError, ImagePayload};
use crate::quota::QuotaStatus;
use crate::state::AppState;

/// MIME type assumed when `imageData` carries no `data:` header.
pub const DEFAULT_INPUT_MIME: &str = "image/png";

/// Fixed instructions sent with every capture.
const RENDER_INSTRUCTIONS: &[&str] = &[
    "Transform this screenshot of a satellite map with a 3D model placed on it into a single photorealistic photograph.",
    "Preserve the exact geometry, camera angle, composition and the position of every element, including the placed model.",
    "Convert flat satellite imagery into volumetric 3D elements: buildings with walls and roofs, trees with canopies, vehicles, street furniture.",
    "Render the placed model as a real built structure with physically plausible materials, lighting and shadows consistent with the scene.",
    "Do not add text, labels, borders or map interface elements.",
];

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("quota exceeded")]
    QuotaExceeded(QuotaStatus),
    #[error("{0}")]
    InvalidInput(String),
    #[error("image service is not configured")]
    ServiceMisconfigured,
    #[error("{message}")]
    Upstream { message: String, status: Option<u16> },
}

impl ErrorCode for RenderError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::QuotaExceeded(_) => "E_QUOTA_EXCEEDED",
            Self::InvalidInput(_) => "E_INVALID_INPUT",
            Self::ServiceMisconfigured => "E_SERVICE_MISCONFIGURED",
            Self::Upstream { .. } => "E_UPSTREAM",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }
}

impl From<ImageGenError> for RenderError {
    fn from(err: ImageGenError) -> Self {
        match err {
            ImageGenError::ApiResponse { status, .. } => {
                Self::Upstream { message: format!("image service returned status {status}"), status: Some(status) }
            }
            ImageGenError::NoImage => Self::Upstream { message: "no image returned".into(), status: None },
            other => Self::Upstream { message: other.to_string(), status: None },
        }
    }
}

/// Parsed `POST /render` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub image_data: String,
    pub prompt: Option<String>,
}

/// Result of a successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub image_url: String,
    pub quota: QuotaStatus,
}

// =============================================================================
// FLOW
// =============================================================================

/// Run one render for `client` with the raw request `body`.
///
/// # Errors
///
/// Returns a [`RenderError`] describing the first check that failed.
pub async fn render(state: &AppState, client: &str, body: &[u8]) -> Result<RenderOutcome, RenderError> {
    check_quota(state, client)?;

    let request = parse_request(body)?;
    let Some(generator) = &state.generator else {
        warn!("render refused: image service not configured");
        return Err(RenderError::ServiceMisconfigured);
    };
    let image = decode_data_uri(&request.image_data)?;
    let prompt = build_prompt(request.prompt.as_deref());

    let generated = generator.generate(&prompt, &image).await.map_err(|e| {
        warn!(client, error = %e, code = e.error_code(), retryable = e.retryable(), "image generation failed");
        RenderError::from(e)
    })?;

    let quota = state.quota.record_success(client);
    info!(client, used = quota.used, remaining = quota.remaining, "render complete");
    Ok(RenderOutcome { image_url: generated.to_data_uri(), quota })
}

/// Refuse `client` once its allowance is spent.
///
/// # Errors
///
/// Returns [`RenderError::QuotaExceeded`] when no renders remain.
pub fn check_quota(state: &AppState, client: &str) -> Result<QuotaStatus, RenderError> {
    let status = state.quota.status(client);
    if status.exhausted() {
        info!(client, used = status.used, limit = status.limit, "render refused: quota exhausted");
        return Err(RenderError::QuotaExceeded(status));
    }
    Ok(status)
}

/// Parse the JSON body. `imageData` must be a string; a non-string or blank
/// `prompt` is treated as absent.
///
/// # Errors
///
/// Returns [`RenderError::InvalidInput`] when the body is not a JSON object
/// or `imageData` is missing or not a string.
pub fn parse_request(body: &[u8]) -> Result<RenderRequest, RenderError> {
    let required = || RenderError::InvalidInput("imageData is required".into());
    let value: Value = serde_json::from_slice(body).map_err(|_| required())?;
    let object = value.as_object().ok_or_else(required)?;
    let image_data = object.get("imageData").and_then(Value::as_str).ok_or_else(required)?;
    let prompt = object
        .get("prompt")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);
    Ok(RenderRequest { image_data: image_data.to_string(), prompt })
}

/// Decode a base64 image, with or without a `data:<mime>;base64,` prefix.
///
/// # Errors
///
/// Returns [`RenderError::InvalidInput`] for a malformed data URI, invalid
/// base64, or an empty image.
pub fn decode_data_uri(image_data: &str) -> Result<ImagePayload, RenderError> {
    let (mime_type, data) = match image_data.strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest
                .split_once(',')
                .ok_or_else(|| RenderError::InvalidInput("imageData is not a valid data URI".into()))?;
            let mime = header.split(';').next().map(str::trim).filter(|m| !m.is_empty());
            (mime.unwrap_or(DEFAULT_INPUT_MIME), data)
        }
        None => (DEFAULT_INPUT_MIME, image_data),
    };
    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|_| RenderError::InvalidInput("imageData is not valid base64".into()))?;
    if bytes.is_empty() {
        return Err(RenderError::InvalidInput("imageData is empty".into()));
    }
    Ok(ImagePayload { mime_type: mime_type.to_string(), bytes })
}

/// The fixed instructions, plus the user's direction when given.
#[must_use]
pub fn build_prompt(extra: Option<&str>) -> String {
    let mut prompt = RENDER_INSTRUCTIONS.join(" ");
    if let Some(extra) = extra.map(str::trim).filter(|e| !e.is_empty()) {
        prompt.push_str("\n\nAdditional direction: ");
        prompt.push_str(extra);
    }
    prompt
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
