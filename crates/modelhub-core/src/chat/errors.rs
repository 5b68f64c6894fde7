//! Chat errors.

use thiserror::Error;

use crate::ports::{ApiPortError, StoreError};

/// A chat turn could not be completed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatError {
    /// No hosted function is known for the model name.
    #[error("No chat function is known for model '{name}'")]
    UnknownModel {
        /// Requested model name
        name: String,
    },

    /// No API key is configured; nothing was sent.
    #[error("An API key is required to chat")]
    MissingApiKey,

    /// The service rejected the API key.
    #[error("API key is wrong")]
    ApiKeyRejected,

    /// The request or the response stream failed.
    #[error("Chat request failed: {0}")]
    Request(ApiPortError),

    /// The API key could not be persisted.
    #[error("Failed to save API key: {0}")]
    Store(#[from] StoreError),
}

impl From<ApiPortError> for ChatError {
    fn from(err: ApiPortError) -> Self {
        match err {
            ApiPortError::Unauthorized { .. } => Self::ApiKeyRejected,
            other => Self::Request(other),
        }
    }
}
