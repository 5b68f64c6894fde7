//! Per-model lifecycle port: sizes, download, load/unload.

use async_trait::async_trait;

use super::api_error::ApiPortResult;
use crate::domain::ModelRef;

/// Port trait for the model lifecycle endpoints.
///
/// Status endpoints return the backend's raw status string; the controller
/// decides what it means (see `DownloadStatus::from_remote`).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelLifecyclePort: Send + Sync {
    /// Model card markdown.
    async fn model_card(&self, model: &ModelRef) -> ApiPortResult<String>;

    /// Size of the model artifact on the remote hub, in bytes.
    async fn remote_size(&self, model: &ModelRef) -> ApiPortResult<u64>;

    /// Size of the locally downloaded artifact, in bytes.
    async fn local_size(&self, model: &ModelRef) -> ApiPortResult<u64>;

    /// Ask the backend to start downloading the model.
    async fn trigger_download(&self, model: &ModelRef) -> ApiPortResult<()>;

    /// Raw download status (`in_progress` while a download runs).
    async fn download_status(&self, model: &ModelRef) -> ApiPortResult<String>;

    /// Raw load status (`loaded` when the model is in memory).
    async fn load_status(&self, model: &ModelRef) -> ApiPortResult<String>;

    /// Load the model into the pipeline's inference service.
    async fn load(&self, pipeline_tag: &str, model: &ModelRef) -> ApiPortResult<()>;

    /// Unload the model from the pipeline's inference service.
    async fn unload(&self, pipeline_tag: &str, model: &ModelRef) -> ApiPortResult<()>;
}
