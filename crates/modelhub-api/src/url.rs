//! URL construction helpers for the backend API.
//!
//! This module provides pure functions for building endpoint URLs, ensuring
//! consistent URL construction across all API calls. Path segments are
//! percent-encoded by `url`.

use modelhub_core::{ModelRef, QueryState};
use url::Url;

use crate::models::ApiConfig;

/// Per-model endpoints of the form `/api/v1/{endpoint}/{org}/{model}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEndpoint {
    /// Model card markdown
    Card,
    /// Remote artifact size
    RemoteSize,
    /// Local artifact size
    LocalSize,
    /// Download trigger
    Download,
    /// Download status
    DownloadStatus,
    /// Load status
    LoadStatus,
}

impl ModelEndpoint {
    const fn segment(self) -> &'static str {
        match self {
            Self::Card => "model_card",
            Self::RemoteSize => "model_remote_size",
            Self::LocalSize => "model_local_size",
            Self::Download => "model_download",
            Self::DownloadStatus => "model_download_status",
            Self::LoadStatus => "model_load_status",
        }
    }
}

/// Append path segments to a base URL.
fn with_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Build the pipelines URL.
pub fn build_pipelines_url(config: &ApiConfig) -> Url {
    with_segments(&config.api_root, &["pipelines"])
}

/// Build the models list URL for a query state.
///
/// `pipeline` is omitted for "all pipelines" and `search` when empty.
pub fn build_models_url(config: &ApiConfig, query: &QueryState) -> Url {
    let mut url = with_segments(&config.api_root, &["models"]);
    {
        let mut pairs = url.query_pairs_mut();
        pairs
            .append_pair("sort", query.sort.as_param())
            .append_pair("p", &query.page.to_string());
        if let Some(pipeline) = &query.pipeline_id {
            pairs.append_pair("pipeline", pipeline);
        }
        if !query.search_query.is_empty() {
            pairs.append_pair("search", &query.search_query);
        }
    }
    url
}

/// Build a per-model endpoint URL.
pub fn build_model_url(config: &ApiConfig, endpoint: ModelEndpoint, model: &ModelRef) -> Url {
    with_segments(
        &config.api_root,
        &[endpoint.segment(), model.org.as_str(), model.name.as_str()],
    )
}

/// Build the load or unload URL: `/api/v1/{pipeline_tag}/{action}/{org}/{model}`.
pub fn build_load_url(config: &ApiConfig, pipeline_tag: &str, action: &str, model: &ModelRef) -> Url {
    with_segments(
        &config.api_root,
        &[pipeline_tag, action, model.org.as_str(), model.name.as_str()],
    )
}

/// Build the predict URL: `/api/v1/{pipeline}_model/predict` with `-`
/// replaced by `_` in the pipeline tag.
pub fn build_predict_url(config: &ApiConfig, pipeline_tag: &str) -> Url {
    let service = format!("{}_model", pipeline_tag.replace('-', "_"));
    with_segments(&config.api_root, &[service.as_str(), "predict"])
}

/// Build the chat invoke URL for a hosted function.
pub fn build_chat_url(config: &ApiConfig, function_id: &str) -> Url {
    with_segments(&config.chat_base_url, &[function_id])
}
