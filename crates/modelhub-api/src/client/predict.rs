//! Per-pipeline inference endpoint.

use modelhub_core::{PredictRequest, Prediction};
use serde_json::json;
use tracing::debug;

use crate::error::ApiResult;
use crate::http::HttpBackend;
use crate::url::build_predict_url;

use super::ApiClient;

impl<B: HttpBackend> ApiClient<B> {
    /// Run one prediction and decode it for the pipeline.
    pub(crate) async fn run_prediction(
        &self,
        pipeline_tag: &str,
        request: PredictRequest,
    ) -> ApiResult<Prediction> {
        let url = build_predict_url(&self.config, pipeline_tag);
        let part_name = request.part_name();
        debug!(url = %url, part = ?part_name, "Sending prediction");

        let body = match request {
            PredictRequest::Text { text } => {
                self.backend.post_json(&url, &json!({ "text": text })).await?
            }
            PredictRequest::Image { file_name, bytes }
            | PredictRequest::Audio { file_name, bytes } => {
                let part = part_name.unwrap_or("file");
                self.backend.post_file(&url, part, &file_name, bytes).await?
            }
        };

        Ok(Prediction::from_response(pipeline_tag, body))
    }
}

#[cfg(test)]
mod tests {
    use crate::client::ApiClient;
    use crate::http::testing::{CannedResponse, FakeBackend};
    use crate::models::ApiConfig;
    use modelhub_core::{PredictRequest, Prediction};
    use serde_json::json;

    #[tokio::test]
    async fn test_image_is_sent_as_multipart() {
        let backend = FakeBackend::new().with_response(
            "image_classification_model/predict",
            CannedResponse::Json(json!({"predicted_class": "tabby cat"})),
        );
        let client = ApiClient::with_backend(ApiConfig::default(), backend);

        let prediction = client
            .run_prediction(
                "image-classification",
                PredictRequest::Image {
                    file_name: "cat.jpg".to_string(),
                    bytes: vec![0xff, 0xd8],
                },
            )
            .await
            .unwrap();

        assert_eq!(
            prediction,
            Prediction::Classification {
                predicted_class: "tabby cat".to_string()
            }
        );
        assert_eq!(
            client.backend.requests()[0].body,
            Some(json!({"part": "image", "file_name": "cat.jpg", "len": 2}))
        );
    }

    #[tokio::test]
    async fn test_text_is_sent_as_json() {
        let backend = FakeBackend::new().with_response(
            "text_classification_model/predict",
            CannedResponse::Json(json!({"label": "POSITIVE"})),
        );
        let client = ApiClient::with_backend(ApiConfig::default(), backend);

        let prediction = client
            .run_prediction(
                "text-classification",
                PredictRequest::Text {
                    text: "great".to_string(),
                },
            )
            .await
            .unwrap();

        assert!(matches!(prediction, Prediction::Raw { .. }));
        assert_eq!(
            client.backend.requests()[0].body,
            Some(json!({"text": "great"}))
        );
    }
}
