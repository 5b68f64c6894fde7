//! Lifecycle errors.

use std::fmt;

use thiserror::Error;

use crate::ports::ApiPortError;

/// The download could not be started or followed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DownloadError {
    /// The download trigger request failed.
    #[error("Failed to start download: {0}")]
    Trigger(ApiPortError),

    /// A local-size poll failed; polling stopped.
    #[error("Failed to poll download progress: {0}")]
    Poll(ApiPortError),
}

/// Which load-state request was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadAction {
    /// Load into memory
    Load,
    /// Unload from memory
    Unload,
}

impl fmt::Display for LoadAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Load => "load",
            Self::Unload => "unload",
        })
    }
}

/// A load or unload was refused or failed. The load status is unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    /// The model is not fully downloaded yet.
    #[error("Model must be downloaded before it can be loaded or unloaded")]
    NotDownloaded,

    /// The backend request failed.
    #[error("Failed to {action} model: {source}")]
    Request {
        /// What was attempted
        action: LoadAction,
        /// Port error
        source: ApiPortError,
    },

    /// The controller was unmounted.
    #[error("Model view is no longer active")]
    Unmounted,
}
