//! Inference port.

use async_trait::async_trait;

use super::api_error::ApiPortResult;
use crate::predict::{PredictRequest, Prediction};

/// Port trait for the per-pipeline predict endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PredictPort: Send + Sync {
    /// Run one prediction against the model currently loaded for `pipeline_tag`.
    async fn predict(&self, pipeline_tag: &str, request: PredictRequest)
    -> ApiPortResult<Prediction>;
}
