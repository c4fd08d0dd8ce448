//! Image service configuration parsed from environment variables.

use crate::config::{ConfigError, env_parse};

pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageGenTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGenConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeouts: ImageGenTimeouts,
}

impl ImageGenConfig {
    /// Build typed image service config from environment variables.
    ///
    /// - `IMAGEGEN_API_KEY_ENV`: names the env var containing the key
    ///   (default `GEMINI_API_KEY`)
    /// - `IMAGEGEN_MODEL`: default `gemini-2.5-flash-image-preview`
    /// - `IMAGEGEN_BASE_URL`: default Generative Language v1beta endpoint
    /// - `IMAGEGEN_REQUEST_TIMEOUT_SECS`: default 120
    /// - `IMAGEGEN_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] if the key variable is unset or
    /// blank, and [`ConfigError::Invalid`] for unparsable timeouts.
    pub fn from_env() -> Result<Self, ConfigError> {
        let key_var = std::env::var("IMAGEGEN_API_KEY_ENV").unwrap_or_else(|_| DEFAULT_API_KEY_ENV.to_string());
        let api_key = std::env::var(&key_var)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey { var: key_var })?;

        let model = std::env::var("IMAGEGEN_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url = std::env::var("IMAGEGEN_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeouts = ImageGenTimeouts {
            request_secs: env_parse("IMAGEGEN_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse("IMAGEGEN_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self { api_key, model, base_url, timeouts })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
