//! Port trait implementations for `ApiClient`.
//!
//! This module implements the core-owned port traits for `ApiClient`,
//! converting internal `ApiError`s into `ApiPortError` at the boundary.

use async_trait::async_trait;
use futures_util::StreamExt;
use modelhub_core::chat::ChatCompletionRequest;
use modelhub_core::ports::DeltaStream;
use modelhub_core::{
    ApiPortError, ApiPortResult, CatalogPort, ChatStreamPort, ModelLifecyclePort, ModelRef,
    PageResult, Pipeline, PredictPort, PredictRequest, Prediction, QueryState,
};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::HttpBackend;
use crate::url::ModelEndpoint;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `ApiError` to core `ApiPortError`.
pub(crate) fn map_error(err: ApiError) -> ApiPortError {
    match err {
        ApiError::RequestFailed { status, url } => {
            if status == 401 || status == 403 {
                ApiPortError::Unauthorized { url }
            } else {
                ApiPortError::Status { status, url }
            }
        }
        ApiError::InvalidResponse { message } => ApiPortError::InvalidResponse { message },
        ApiError::InvalidBaseUrl { url, message } => ApiPortError::Configuration {
            message: format!("{url}: {message}"),
        },
        ApiError::Network(e) => {
            // Body decoding errors surface through reqwest too
            if e.is_decode() {
                ApiPortError::InvalidResponse {
                    message: e.to_string(),
                }
            } else {
                ApiPortError::Network {
                    message: e.to_string(),
                }
            }
        }
        ApiError::InvalidUrl(e) => ApiPortError::Configuration {
            message: e.to_string(),
        },
        ApiError::JsonParse(e) => ApiPortError::InvalidResponse {
            message: e.to_string(),
        },
    }
}

// ============================================================================
// Port Implementations
// ============================================================================

#[async_trait]
impl<B: HttpBackend + Send + Sync> CatalogPort for ApiClient<B> {
    async fn list_pipelines(&self) -> ApiPortResult<Vec<Pipeline>> {
        self.fetch_pipelines().await.map_err(map_error)
    }

    async fn list_models(&self, query: &QueryState) -> ApiPortResult<PageResult> {
        self.fetch_models_page(query).await.map_err(map_error)
    }
}

#[async_trait]
impl<B: HttpBackend + Send + Sync> ModelLifecyclePort for ApiClient<B> {
    async fn model_card(&self, model: &ModelRef) -> ApiPortResult<String> {
        self.fetch_model_card(model).await.map_err(map_error)
    }

    async fn remote_size(&self, model: &ModelRef) -> ApiPortResult<u64> {
        self.fetch_size(ModelEndpoint::RemoteSize, model)
            .await
            .map_err(map_error)
    }

    async fn local_size(&self, model: &ModelRef) -> ApiPortResult<u64> {
        self.fetch_size(ModelEndpoint::LocalSize, model)
            .await
            .map_err(map_error)
    }

    async fn trigger_download(&self, model: &ModelRef) -> ApiPortResult<()> {
        self.start_download(model).await.map_err(map_error)
    }

    async fn download_status(&self, model: &ModelRef) -> ApiPortResult<String> {
        self.fetch_status(ModelEndpoint::DownloadStatus, model)
            .await
            .map_err(map_error)
    }

    async fn load_status(&self, model: &ModelRef) -> ApiPortResult<String> {
        self.fetch_status(ModelEndpoint::LoadStatus, model)
            .await
            .map_err(map_error)
    }

    async fn load(&self, pipeline_tag: &str, model: &ModelRef) -> ApiPortResult<()> {
        self.set_loaded(pipeline_tag, "load", model)
            .await
            .map_err(map_error)
    }

    async fn unload(&self, pipeline_tag: &str, model: &ModelRef) -> ApiPortResult<()> {
        self.set_loaded(pipeline_tag, "unload", model)
            .await
            .map_err(map_error)
    }
}

#[async_trait]
impl<B: HttpBackend + Send + Sync> PredictPort for ApiClient<B> {
    async fn predict(
        &self,
        pipeline_tag: &str,
        request: PredictRequest,
    ) -> ApiPortResult<Prediction> {
        self.run_prediction(pipeline_tag, request)
            .await
            .map_err(map_error)
    }
}

#[async_trait]
impl<B: HttpBackend + Send + Sync> ChatStreamPort for ApiClient<B> {
    async fn open_stream(
        &self,
        function_id: &str,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> ApiPortResult<DeltaStream> {
        let deltas = self
            .open_chat_stream(function_id, api_key, request)
            .await
            .map_err(map_error)?;
        Ok(deltas.map(|delta| delta.map_err(map_error)).boxed())
    }
}
