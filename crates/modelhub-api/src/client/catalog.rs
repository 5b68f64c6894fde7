//! Catalog endpoints: pipelines and the paginated models list.

use modelhub_core::{PageResult, Pipeline, QueryState};
use serde_json::Value;
use tracing::debug;

use crate::error::ApiResult;
use crate::http::HttpBackend;
use crate::parsing::{parse_page, parse_pipelines};
use crate::url::{build_models_url, build_pipelines_url};

use super::ApiClient;

impl<B: HttpBackend> ApiClient<B> {
    /// Fetch the pipelines used as catalog tabs.
    pub(crate) async fn fetch_pipelines(&self) -> ApiResult<Vec<Pipeline>> {
        let url = build_pipelines_url(&self.config);
        let json: Value = self.backend.get_json(&url).await?;
        parse_pipelines(&json)
    }

    /// Fetch one page of models.
    pub(crate) async fn fetch_models_page(&self, query: &QueryState) -> ApiResult<PageResult> {
        let url = build_models_url(&self.config, query);
        debug!(url = %url, "Fetching models page");
        let json: Value = self.backend.get_json(&url).await?;
        parse_page(&json)
    }
}

#[cfg(test)]
mod tests {
    use crate::client::ApiClient;
    use crate::error::ApiError;
    use crate::http::testing::{CannedResponse, FakeBackend};
    use crate::models::ApiConfig;
    use modelhub_core::{QueryState, SortKey};
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_models_page() {
        let backend = FakeBackend::new().with_response(
            "/models?",
            CannedResponse::Json(json!({
                "models": [{"id": "google/vit-base-patch16-224", "likes": 3}],
                "numTotalItems": 11,
                "numItemsPerPage": 10
            })),
        );
        let client = ApiClient::with_backend(ApiConfig::default(), backend);

        let query = QueryState {
            sort: SortKey::Downloads,
            page: 2,
            ..QueryState::default()
        };
        let page = client.fetch_models_page(&query).await.unwrap();

        assert_eq!(page.models.len(), 1);
        assert_eq!(page.total_pages(), 2);
        assert_eq!(
            client.backend.requests()[0].url,
            "http://localhost:3001/api/v1/models?sort=downloads&p=2"
        );
    }

    #[tokio::test]
    async fn test_fetch_pipelines_rejects_non_array() {
        let backend = FakeBackend::new()
            .with_response("pipelines", CannedResponse::Json(json!({"error": "boom"})));
        let client = ApiClient::with_backend(ApiConfig::default(), backend);

        let err = client.fetch_pipelines().await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse { .. }));
    }
}
