//! Error types for backend API port operations.

use thiserror::Error;

/// Errors from backend API port operations.
///
/// These are domain-level errors that controllers turn into state.
/// Implementation-specific errors (HTTP, JSON) are mapped to these.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiPortError {
    /// Network or connectivity error.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error
        message: String,
    },

    /// The backend answered with a non-success status.
    #[error("Request to {url} failed with status {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// The backend rejected the credentials (401/403).
    #[error("Unauthorized request to {url}")]
    Unauthorized {
        /// The URL that was requested
        url: String,
    },

    /// Invalid response body.
    #[error("Invalid API response: {message}")]
    InvalidResponse {
        /// What was invalid
        message: String,
    },

    /// Configuration error (bad base URL and the like).
    #[error("Configuration error: {message}")]
    Configuration {
        /// What's wrong with the configuration
        message: String,
    },
}

/// Result type alias for backend API port operations.
pub type ApiPortResult<T> = Result<T, ApiPortError>;
