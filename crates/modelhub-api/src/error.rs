//! Internal error types for backend API operations.
//!
//! These errors are internal to `modelhub-api` and are mapped to core port
//! errors at the boundary.

use thiserror::Error;

/// Result type alias for backend API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors related to backend API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// API request failed with an HTTP error status.
    #[error("API request failed with status {status}: {url}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response from API: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// The configured base URL cannot be used.
    #[error("Invalid base URL '{url}': {message}")]
    InvalidBaseUrl {
        /// The configured URL
        url: String,
        /// What is wrong with it
        message: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}
