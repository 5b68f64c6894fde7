//! Catalog fetch errors.

use thiserror::Error;

use crate::ports::ApiPortError;

/// A pipelines or models fetch failed.
///
/// The list view keeps its last good data when this happens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The pipelines list could not be fetched.
    #[error("Failed to fetch pipelines: {0}")]
    Pipelines(ApiPortError),

    /// A page of models could not be fetched.
    #[error("Failed to fetch models: {0}")]
    Models(ApiPortError),
}

impl FetchError {
    /// The underlying port error.
    pub const fn source_error(&self) -> &ApiPortError {
        match self {
            Self::Pipelines(err) | Self::Models(err) => err,
        }
    }
}
