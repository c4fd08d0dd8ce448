//! Provider-neutral image generation types and errors.

use crate::error::ErrorCode;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by image generation calls.
#[derive(Debug, thiserror::Error)]
pub enum ImageGenError {
    /// The HTTP request to the service failed (connect, timeout, body read).
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The service returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The response parsed but carried no inline image part.
    #[error("no image returned")]
    NoImage,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for ImageGenError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::NoImage => "E_NO_IMAGE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// PAYLOADS
// =============================================================================

/// A decoded input image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// An image returned by the service, still base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub data: String,
}

impl GeneratedImage {
    /// `data:<mime>;base64,<data>` for the browser to display directly.
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Async seam over the image service. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ImageGenerate: Send + Sync {
    /// Restyle `image` according to `prompt`.
    ///
    /// # Errors
    ///
    /// Returns an [`ImageGenError`] if the request fails, the service rejects
    /// it, or the response holds no image.
    async fn generate(&self, prompt: &str, image: &ImagePayload) -> Result<GeneratedImage, ImageGenError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
