//! Proxy configuration parsed from environment variables.

use crate::error::ErrorCode;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_QUOTA_LIMIT: u32 = 5;
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but does not parse as the expected type.
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },

    /// The credential variable named by the config is unset or empty.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Invalid { .. } => "E_CONFIG_INVALID",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProxyConfig {
    pub port: u16,
    /// Successful renders allowed per client for the process lifetime.
    pub quota_limit: u32,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT, quota_limit: DEFAULT_QUOTA_LIMIT, max_body_bytes: DEFAULT_MAX_BODY_BYTES }
    }
}

impl ProxyConfig {
    /// Build proxy config from environment variables.
    ///
    /// - `PORT`: default 3000
    /// - `RENDER_QUOTA_LIMIT`: default 5
    /// - `RENDER_MAX_BODY_BYTES`: default 16 MiB
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            port: env_parse("PORT", DEFAULT_PORT)?,
            quota_limit: env_parse("RENDER_QUOTA_LIMIT", DEFAULT_QUOTA_LIMIT)?,
            max_body_bytes: env_parse("RENDER_MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
        })
    }
}

/// Parse `key` from the environment, falling back to `default` when unset.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when the variable is set but does not parse.
pub fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    let Ok(raw) = std::env::var(key) else {
        return Ok(default);
    };
    raw.trim()
        .parse::<T>()
        .map_err(|_| ConfigError::Invalid { key: key.to_string(), value: raw })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
