//! Public configuration for the modelhub API client.
//!
//! This module provides a stable public API for configuring the client.
//! The internal config is derived from this.

use std::time::Duration;

/// Environment variable holding the backend origin.
pub const API_BASE_URL_ENV: &str = "MODELHUB_API_BASE_URL";

/// Environment variable holding the chat invoke base URL.
pub const CHAT_BASE_URL_ENV: &str = "MODELHUB_CHAT_BASE_URL";

/// Backend origin used when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";

/// Hosted chat functions endpoint used when none is configured.
pub const DEFAULT_CHAT_BASE_URL: &str = "https://api.nvcf.nvidia.com/v2/nvcf/pexec/functions";

/// Configuration for the modelhub API client.
///
/// Use the builder pattern methods to customize the client configuration.
///
/// # Example
///
/// ```
/// use modelhub_api::ApiClientConfig;
/// use std::time::Duration;
///
/// let config = ApiClientConfig::new()
///     .with_base_url("http://models.internal:3001")
///     .with_timeout(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Backend origin, without the `/api/v1` prefix
    pub(crate) base_url: String,
    /// Base URL the chat function id is appended to
    pub(crate) chat_base_url: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Timeout for ordinary requests (the download trigger and chat streams have none)
    pub(crate) timeout: Duration,
    /// Maximum number of retry attempts for transient errors
    pub(crate) max_retries: u8,
    /// Base delay for exponential backoff
    pub(crate) retry_base_delay: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            chat_base_url: DEFAULT_CHAT_BASE_URL.to_string(),
            user_agent: concat!("modelhub/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

impl ApiClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the base URLs from the process environment.
    ///
    /// Unset or blank variables keep their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(base_url) = read(API_BASE_URL_ENV) {
            config.base_url = base_url;
        }
        if let Some(chat_base_url) = read(CHAT_BASE_URL_ENV) {
            config.chat_base_url = chat_base_url;
        }
        config
    }

    /// Backend origin.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the backend origin.
    ///
    /// Defaults to `http://localhost:3001`.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the chat invoke base URL.
    #[must_use]
    pub fn with_chat_base_url(mut self, url: impl Into<String>) -> Self {
        self.chat_base_url = url.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retry attempts for transient errors.
    ///
    /// Defaults to 3 retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay for exponential backoff retries.
    ///
    /// Defaults to 500ms.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiClientConfig::new();
        assert_eq!(config.base_url, "http://localhost:3001");
        assert_eq!(config.chat_base_url, DEFAULT_CHAT_BASE_URL);
        assert!(config.user_agent.contains("modelhub"));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ApiClientConfig::new()
            .with_base_url("http://custom:8080")
            .with_chat_base_url("http://chat.local/functions")
            .with_user_agent("test-agent")
            .with_timeout(Duration::from_secs(60))
            .with_max_retries(5)
            .with_retry_delay(Duration::from_millis(10));

        assert_eq!(config.base_url, "http://custom:8080");
        assert_eq!(config.chat_base_url, "http://chat.local/functions");
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_base_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_from_lookup() {
        let config = ApiClientConfig::from_lookup(|key| match key {
            API_BASE_URL_ENV => Some(" http://10.0.0.5:3001 ".to_string()),
            CHAT_BASE_URL_ENV => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.base_url, "http://10.0.0.5:3001");
        assert_eq!(config.chat_base_url, DEFAULT_CHAT_BASE_URL);

        let config = ApiClientConfig::from_lookup(|_| None);
        assert_eq!(config.base_url, DEFAULT_API_BASE_URL);
    }
}
