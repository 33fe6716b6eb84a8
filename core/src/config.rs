//! Client configuration.
//!
//! The base URL and default headers are fixed for the lifetime of a
//! `Transport`; nothing mutates them after construction.

use std::time::Duration;

pub const ENV_BASE_URL: &str = "ALLURE_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "ALLURE_API_TIMEOUT_SECS";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while loading a `ClientConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Process-wide, read-only settings for the transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    timeout: Option<Duration>,
    default_headers: Vec<(String, String)>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            default_headers: Vec::new(),
        }
    }

    /// Load from `ALLURE_API_URL` and the optional `ALLURE_API_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(ENV_BASE_URL)
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing(ENV_BASE_URL))?;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: ENV_BASE_URL,
                value: base_url,
            });
        }

        let mut config = Self::new(base_url.trim());
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: ENV_TIMEOUT_SECS,
                value: raw.clone(),
            })?;
            // 0 disables the timeout
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a header sent with every request, public or private.
    pub fn with_default_header(mut self, name: &str, value: &str) -> Self {
        self.default_headers
            .push((name.to_ascii_lowercase(), value.to_string()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }
}
