//! Per-model endpoints: card, sizes, download and load state.

use modelhub_core::ModelRef;
use serde_json::Value;
use tracing::debug;

use crate::error::ApiResult;
use crate::http::{HttpBackend, RequestTimeout};
use crate::parsing::{parse_size, parse_status};
use crate::url::{ModelEndpoint, build_load_url, build_model_url};

use super::ApiClient;

impl<B: HttpBackend> ApiClient<B> {
    /// Fetch the model card markdown.
    pub(crate) async fn fetch_model_card(&self, model: &ModelRef) -> ApiResult<String> {
        let url = build_model_url(&self.config, ModelEndpoint::Card, model);
        self.backend.get_text(&url).await
    }

    /// Fetch a byte count from one of the size endpoints.
    pub(crate) async fn fetch_size(
        &self,
        endpoint: ModelEndpoint,
        model: &ModelRef,
    ) -> ApiResult<u64> {
        let url = build_model_url(&self.config, endpoint, model);
        let json: Value = self.backend.get_json(&url).await?;
        parse_size(&json)
    }

    /// Fetch a raw status string from one of the status endpoints.
    pub(crate) async fn fetch_status(
        &self,
        endpoint: ModelEndpoint,
        model: &ModelRef,
    ) -> ApiResult<String> {
        let url = build_model_url(&self.config, endpoint, model);
        let json: Value = self.backend.get_json(&url).await?;
        parse_status(&json)
    }

    /// Start a download. The backend answers once the download is over,
    /// so the request has no overall timeout.
    pub(crate) async fn start_download(&self, model: &ModelRef) -> ApiResult<()> {
        let url = build_model_url(&self.config, ModelEndpoint::Download, model);
        debug!(model = %model, "Triggering download");
        self.backend.get_ack(&url, RequestTimeout::Unbounded).await
    }

    /// Load (`action = "load"`) or unload (`"unload"`) a model.
    pub(crate) async fn set_loaded(
        &self,
        pipeline_tag: &str,
        action: &str,
        model: &ModelRef,
    ) -> ApiResult<()> {
        let url = build_load_url(&self.config, pipeline_tag, action, model);
        debug!(model = %model, pipeline_tag, action, "Changing load state");
        self.backend.get_ack(&url, RequestTimeout::Default).await
    }
}
