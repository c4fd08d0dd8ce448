//! Google Generative Language client for image-to-image generation.
//!
//! Sends one `models/{model}:generateContent` call carrying the prompt text
//! and the input image as inline data, then returns the first inline image
//! part of the response.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use super::config::ImageGenConfig;
use super::types::{GeneratedImage, ImageGenError, ImageGenerate, ImagePayload};

const API_KEY_HEADER: &str = "x-goog-api-key";
const DEFAULT_OUTPUT_MIME: &str = "image/png";

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Build a client from parsed config.
    ///
    /// # Errors
    ///
    /// Returns [`ImageGenError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: ImageGenConfig) -> Result<Self, ImageGenError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ImageGenError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key: config.api_key, base_url: config.base_url, model: config.model })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn send(&self, body: &GenerateRequest<'_>) -> Result<String, ImageGenError> {
        let response = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ImageGenError::ApiRequest(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ImageGenError::ApiRequest(e.to_string()))?;
        if !status.is_success() {
            return Err(ImageGenError::ApiResponse { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl ImageGenerate for GeminiClient {
    async fn generate(&self, prompt: &str, image: &ImagePayload) -> Result<GeneratedImage, ImageGenError> {
        let body = build_request(prompt, image);
        let text = self.send(&body).await?;
        parse_response(&text)
    }
}

// =============================================================================
// REQUEST WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 2],
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text { text: &'a str },
    InlineData { inline_data: OutboundInlineData<'a> },
}

#[derive(Serialize)]
struct OutboundInlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseModalities")]
    response_modalities: [&'static str; 2],
}

fn build_request<'a>(prompt: &'a str, image: &'a ImagePayload) -> GenerateRequest<'a> {
    GenerateRequest {
        contents: [RequestContent {
            parts: [
                RequestPart::Text { text: prompt },
                RequestPart::InlineData {
                    inline_data: OutboundInlineData { mime_type: &image.mime_type, data: STANDARD.encode(&image.bytes) },
                },
            ],
        }],
        generation_config: GenerationConfig { response_modalities: ["TEXT", "IMAGE"] },
    }
}

// =============================================================================
// RESPONSE WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(rename = "inlineData", alias = "inline_data")]
    inline_data: Option<InboundInlineData>,
}

#[derive(Deserialize)]
struct InboundInlineData {
    #[serde(rename = "mimeType", alias = "mime_type")]
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

/// Extract the first inline image from a `generateContent` response body.
///
/// Parts are scanned in order across candidates; text parts are skipped.
///
/// # Errors
///
/// Returns [`ImageGenError::ApiParse`] for bodies that are not a response
/// object and [`ImageGenError::NoImage`] when no part carries image data.
pub fn parse_response(text: &str) -> Result<GeneratedImage, ImageGenError> {
    let response: GenerateResponse = serde_json::from_str(text).map_err(|e| ImageGenError::ApiParse(e.to_string()))?;
    response
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .filter_map(|p| p.inline_data)
        .find(|d| !d.data.is_empty())
        .map(|d| GeneratedImage {
            mime_type: d.mime_type.filter(|m| !m.is_empty()).unwrap_or_else(|| DEFAULT_OUTPUT_MIME.to_string()),
            data: d.data,
        })
        .ok_or(ImageGenError::NoImage)
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
