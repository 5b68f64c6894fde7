//! Prediction errors.

use thiserror::Error;

use crate::ports::ApiPortError;

/// A prediction was refused or failed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PredictError {
    /// The model is not downloaded and loaded; no request was made.
    #[error("Model is not ready to predict (download and load it first)")]
    NotReady,

    /// The inference request failed.
    #[error("Prediction request failed: {0}")]
    Request(#[from] ApiPortError),
}
