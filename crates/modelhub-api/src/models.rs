//! Internal API types for the modelhub backend.
//!
//! These types are internal to `modelhub-api` and are not exposed to
//! consumers. External consumers use the domain types of `modelhub-core`.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::config::ApiClientConfig;
use crate::error::{ApiError, ApiResult};

// ============================================================================
// Configuration (used internally, see config.rs for public config)
// ============================================================================

/// Path prefix of every backend endpoint.
const API_PREFIX: [&str; 2] = ["api", "v1"];

/// Internal configuration for the API client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Backend endpoint root (`{origin}/api/v1`)
    pub api_root: Url,
    /// Base URL the chat function id is appended to
    pub chat_base_url: Url,
    /// User agent string
    pub user_agent: String,
    /// Timeout for ordinary requests
    pub timeout: Duration,
    /// Maximum number of retry attempts for transient errors (default: 3)
    pub max_retries: u8,
    /// Base delay in milliseconds for exponential backoff (default: 500)
    pub retry_base_delay_ms: u64,
}

impl ApiConfig {
    /// Validate the public configuration and derive the internal one.
    pub fn from_public(config: &ApiClientConfig) -> ApiResult<Self> {
        let mut api_root = parse_base(&config.base_url)?;
        if let Ok(mut segments) = api_root.path_segments_mut() {
            segments.pop_if_empty().extend(API_PREFIX);
        }

        #[allow(clippy::cast_possible_truncation)] // Backoff delays never approach u64::MAX ms
        let retry_base_delay_ms = config.retry_base_delay.as_millis() as u64;

        Ok(Self {
            api_root,
            chat_base_url: parse_base(&config.chat_base_url)?,
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
            max_retries: config.max_retries,
            retry_base_delay_ms,
        })
    }
}

#[cfg(test)]
impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_public(&ApiClientConfig::default()).expect("default config is valid")
    }
}

/// Parse a base URL that endpoint paths can be appended to.
fn parse_base(raw: &str) -> ApiResult<Url> {
    let url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::InvalidBaseUrl {
            url: raw.to_string(),
            message: "expected an http(s) URL".to_string(),
        });
    }
    Ok(url)
}

// ============================================================================
// Wire Types
// ============================================================================

/// Body of the download and load status endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct WireStatus {
    /// Raw status string
    #[serde(default)]
    pub status: String,
}

/// One streamed chat completion chunk.
#[derive(Debug, Clone, Deserialize)]
pub struct WireChatChunk {
    /// Completion choices; only the first is used
    #[serde(default)]
    pub choices: Vec<WireChatChoice>,
}

/// A choice inside a streamed chunk.
#[derive(Debug, Clone, Deserialize)]
pub struct WireChatChoice {
    /// Incremental content
    #[serde(default)]
    pub delta: WireChatDelta,
}

/// Incremental message content.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireChatDelta {
    /// Text to append; absent on role-only and final chunks
    #[serde(default)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_root_appends_prefix() {
        let config = ApiConfig::from_public(&ApiClientConfig::new()).unwrap();
        assert_eq!(config.api_root.as_str(), "http://localhost:3001/api/v1");

        let config = ApiConfig::from_public(
            &ApiClientConfig::new().with_base_url("https://example.com/hub/"),
        )
        .unwrap();
        assert_eq!(config.api_root.as_str(), "https://example.com/hub/api/v1");
    }

    #[test]
    fn test_default_chat_base() {
        let config = ApiConfig::default();
        assert_eq!(
            config.chat_base_url.as_str(),
            crate::config::DEFAULT_CHAT_BASE_URL
        );
    }

    #[test]
    fn test_rejects_unusable_base() {
        for raw in ["not a url", "mailto:someone@example.com", "ftp://files.example.com"] {
            let config = ApiClientConfig::new().with_base_url(raw);
            assert!(ApiConfig::from_public(&config).is_err(), "accepted {raw}");
        }
    }
}
