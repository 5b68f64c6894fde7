//! CLI-specific error types and mappings.
//!
//! This module provides the CLI error type and mappings from the core
//! error types to exit codes and user-facing messages.

use modelhub_core::{ApiPortError, ChatError, LoadError, PredictError, StoreError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The backend could not be reached or answered with an error.
    #[error("{0}")]
    Service(String),

    /// Argument error that clap cannot catch.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The operation needs a model state it is not in.
    #[error("{0}")]
    NotReady(String),

    /// Credentials are missing or were rejected.
    #[error("{0}")]
    Unauthorized(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Service(_) => 69,      // EX_UNAVAILABLE
            Self::Arguments(_) => 2,     // EX_USAGE
            Self::Io(_) => 74,           // EX_IOERR
            Self::Config(_) => 78,       // EX_CONFIG
            Self::NotReady(_) => 75,     // EX_TEMPFAIL
            Self::Unauthorized(_) => 77, // EX_NOPERM
        }
    }
}

impl From<ApiPortError> for CliError {
    fn from(err: ApiPortError) -> Self {
        match err {
            ApiPortError::Configuration { message } => Self::Config(message),
            ApiPortError::Unauthorized { .. } => Self::Unauthorized(err.to_string()),
            other => Self::Service(other.to_string()),
        }
    }
}

impl From<LoadError> for CliError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Request { source, .. } => source.into(),
            other => Self::NotReady(other.to_string()),
        }
    }
}

impl From<PredictError> for CliError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::NotReady => Self::NotReady(err.to_string()),
            PredictError::Request(source) => source.into(),
        }
    }
}

impl From<ChatError> for CliError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::UnknownModel { .. } => Self::Arguments(err.to_string()),
            ChatError::MissingApiKey | ChatError::ApiKeyRejected => {
                Self::Unauthorized(err.to_string())
            }
            ChatError::Request(source) => source.into(),
            ChatError::Store(source) => source.into(),
        }
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let err: CliError = ApiPortError::Network {
            message: "connection refused".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), 69);

        let err: CliError = ApiPortError::Configuration {
            message: "bad url".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), 78);

        let err: CliError = PredictError::NotReady.into();
        assert_eq!(err.exit_code(), 75);
    }

    #[test]
    fn test_chat_errors() {
        assert_eq!(CliError::from(ChatError::ApiKeyRejected).exit_code(), 77);
        assert_eq!(CliError::from(ChatError::MissingApiKey).exit_code(), 77);
        let err = CliError::from(ChatError::UnknownModel {
            name: "GPT-9".to_string(),
        });
        assert!(err.to_string().contains("GPT-9"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_load_error_keeps_cause() {
        let err = CliError::from(LoadError::NotDownloaded);
        assert_eq!(err.exit_code(), 75);

        let err = CliError::from(LoadError::Request {
            action: modelhub_core::lifecycle::LoadAction::Load,
            source: ApiPortError::Status {
                status: 500,
                url: "http://localhost:3001/api/v1/x/load/a/b".to_string(),
            },
        });
        assert!(err.to_string().contains("500"));
    }
}
