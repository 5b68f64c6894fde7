//! Streamed chat completions against the hosted text-generation service.

use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use modelhub_core::chat::ChatCompletionRequest;
use tracing::{debug, warn};

use crate::error::ApiResult;
use crate::http::{ByteStream, HttpBackend};
use crate::parsing::parse_chat_delta;
use crate::sse::{SseDecoder, SseEvent};
use crate::url::build_chat_url;

use super::ApiClient;

/// Text deltas of one streamed completion.
pub(crate) type ChatDeltas = BoxStream<'static, ApiResult<String>>;

impl<B: HttpBackend> ApiClient<B> {
    /// Send the conversation and stream the response deltas.
    pub(crate) async fn open_chat_stream(
        &self,
        function_id: &str,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> ApiResult<ChatDeltas> {
        let url = build_chat_url(&self.config, function_id);
        let body = serde_json::to_value(request)?;
        debug!(function_id, messages = request.messages.len(), "Opening chat stream");

        let bytes = self.backend.post_event_stream(&url, api_key, &body).await?;
        Ok(decode_deltas(bytes))
    }
}

/// Turn raw body chunks into text deltas.
///
/// Ends at `[DONE]`, at the end of the body, or after the first transport
/// error (which is yielded).
fn decode_deltas(mut bytes: ByteStream) -> ChatDeltas {
    async_stream::stream! {
        let mut decoder = SseDecoder::new();
        let mut done = false;

        while !done {
            let events = match bytes.next().await {
                Some(Ok(chunk)) => decoder.push(&chunk),
                Some(Err(e)) => {
                    yield Err(e);
                    break;
                }
                None => {
                    done = true;
                    decoder.finish()
                }
            };

            for event in events {
                match event {
                    SseEvent::Done => {
                        done = true;
                        break;
                    }
                    SseEvent::Data(data) => match parse_chat_delta(&data) {
                        Ok(Some(delta)) => yield Ok(delta),
                        Ok(None) => {}
                        Err(e) => warn!(error = %e, "Skipping malformed chat event"),
                    },
                }
            }
        }
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiClient;
    use crate::error::ApiError;
    use crate::http::testing::{CannedResponse, FakeBackend};
    use crate::models::ApiConfig;
    use futures_util::stream;
    use modelhub_core::{ChatMessage, SamplingParams};

    const FUNCTION_ID: &str = "35ec3354-2681-4d0e-a8dd-80325dcf7c63";

    fn chunk(content: &str) -> String {
        format!("data: {{\"choices\":[{{\"delta\":{{\"content\":\"{content}\"}}}}]}}\n\n")
    }

    async fn collect(bytes: Vec<ApiResult<Vec<u8>>>) -> Vec<ApiResult<String>> {
        decode_deltas(stream::iter(bytes).boxed()).collect().await
    }

    #[tokio::test]
    async fn test_stream_stops_at_done() {
        let body = format!("{}{}data: [DONE]\n\n{}", chunk("Hel"), chunk("lo"), chunk("late"));
        let deltas = collect(vec![Ok(body.into_bytes())]).await;

        let deltas: Vec<String> = deltas.into_iter().map(Result::unwrap).collect();
        assert_eq!(deltas, vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn test_split_event_and_close_without_done() {
        let body = chunk("one");
        let (head, tail) = body.split_at(12);
        let trailing = chunk("two");
        let trailing = trailing.trim_end();

        let deltas = collect(vec![
            Ok(head.as_bytes().to_vec()),
            Ok(tail.as_bytes().to_vec()),
            Ok(trailing.as_bytes().to_vec()),
        ])
        .await;

        let deltas: Vec<String> = deltas.into_iter().map(Result::unwrap).collect();
        assert_eq!(deltas, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_malformed_event_is_skipped() {
        let body = format!("data: {{nope\n\n{}", chunk("ok"));
        let deltas = collect(vec![Ok(body.into_bytes())]).await;
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].as_deref().unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_transport_error_ends_stream() {
        let deltas = collect(vec![
            Ok(chunk("a").into_bytes()),
            Err(ApiError::InvalidResponse {
                message: "reset".to_string(),
            }),
            Ok(chunk("b").into_bytes()),
        ])
        .await;
        assert_eq!(deltas.len(), 2);
        assert!(deltas[1].is_err());
    }

    #[tokio::test]
    async fn test_open_chat_stream_sends_bearer_and_body() {
        let backend = FakeBackend::new().with_response(
            FUNCTION_ID,
            CannedResponse::Chunks(vec![
                "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
                "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\ndata: [DONE]\n\n",
            ]),
        );
        let client = ApiClient::with_backend(ApiConfig::default(), backend);
        let request =
            ChatCompletionRequest::new(&[ChatMessage::user("hello")], &SamplingParams::default());

        let deltas: Vec<_> = client
            .open_chat_stream(FUNCTION_ID, "nvapi-key", &request)
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(deltas.len(), 1);
        let sent = &client.backend.requests()[0];
        assert_eq!(sent.bearer.as_deref(), Some("nvapi-key"));
        assert_eq!(
            sent.body.as_ref().map(|b| b["stream"].clone()),
            Some(serde_json::json!(true))
        );
    }
}
