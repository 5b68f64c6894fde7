//! HTTP backend abstraction for the modelhub API.
//!
//! This module provides a trait-based HTTP backend that allows for
//! dependency injection and easy testing. The production implementation
//! uses reqwest with automatic retry logic for transient errors on
//! idempotent requests.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{ApiError, ApiResult};
use crate::models::ApiConfig;

/// Upper bound for establishing a connection, including on unbounded requests.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Raw body chunks of a streamed response.
pub type ByteStream = BoxStream<'static, ApiResult<Vec<u8>>>;

/// Timeout policy for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestTimeout {
    /// The configured request timeout
    Default,
    /// No overall timeout; the request may run as long as the server needs
    Unbounded,
}

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends used by the API client.
///
/// Non-success statuses come back as [`ApiError::RequestFailed`].
///
/// This is an implementation detail - external code should use the port
/// traits of `modelhub-core`.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// GET a URL and deserialize the JSON body.
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> ApiResult<T>;

    /// GET a URL and return the body as text.
    async fn get_text(&self, url: &Url) -> ApiResult<String>;

    /// GET a URL for its side effect; the body is ignored.
    async fn get_ack(&self, url: &Url, timeout: RequestTimeout) -> ApiResult<()>;

    /// POST a JSON body and return the JSON response.
    async fn post_json(&self, url: &Url, body: &Value) -> ApiResult<Value>;

    /// POST a single file as a multipart form and return the JSON response.
    async fn post_file(
        &self,
        url: &Url,
        part_name: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<Value>;

    /// POST a JSON body with bearer authentication and stream the response body.
    async fn post_event_stream(&self, url: &Url, bearer: &str, body: &Value)
    -> ApiResult<ByteStream>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest with retry logic.
///
/// GET requests are retried with exponential backoff on server errors (5xx)
/// and network errors. POST requests are sent once.
pub struct ReqwestBackend {
    client: reqwest::Client,
    timeout: Duration,
    max_retries: u8,
    retry_base_delay_ms: u64,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            timeout: config.timeout,
            max_retries: config.max_retries,
            retry_base_delay_ms: config.retry_base_delay_ms,
        })
    }

    fn get(&self, url: &Url, timeout: RequestTimeout) -> reqwest::RequestBuilder {
        let request = self.client.get(url.as_str());
        match timeout {
            RequestTimeout::Default => request.timeout(self.timeout),
            RequestTimeout::Unbounded => request,
        }
    }

    /// GET a URL with automatic retry for transient errors.
    async fn fetch_with_retry(
        &self,
        url: &Url,
        timeout: RequestTimeout,
    ) -> ApiResult<reqwest::Response> {
        let mut last_error: Option<ApiError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(
                    self.retry_base_delay_ms * 2u64.pow(u32::from(attempt) - 1),
                );
                debug!(url = %url, attempt, delay_ms = delay.as_millis(), "Retrying request");
                tokio::time::sleep(delay).await;
            }

            match self.get(url, timeout).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    // 5xx errors are retryable (server-side issues)
                    if status.is_server_error() && attempt < self.max_retries {
                        last_error = Some(ApiError::RequestFailed {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                        continue;
                    }

                    // 4xx errors or final attempt - fail immediately
                    return Err(ApiError::RequestFailed {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                Err(e) => {
                    // Network errors are retryable
                    if attempt < self.max_retries {
                        last_error = Some(e.into());
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ApiError::InvalidResponse {
            message: "Unknown error during fetch".to_string(),
        }))
    }

    /// Send a request once and reject non-success statuses.
    async fn send_once(request: reqwest::RequestBuilder, url: &Url) -> ApiResult<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ApiError::RequestFailed {
                status: status.as_u16(),
                url: url.to_string(),
            })
        }
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> ApiResult<T> {
        let response = self.fetch_with_retry(url, RequestTimeout::Default).await?;
        let data: T = response.json().await?;
        Ok(data)
    }

    async fn get_text(&self, url: &Url) -> ApiResult<String> {
        let response = self.fetch_with_retry(url, RequestTimeout::Default).await?;
        Ok(response.text().await?)
    }

    async fn get_ack(&self, url: &Url, timeout: RequestTimeout) -> ApiResult<()> {
        self.fetch_with_retry(url, timeout).await?;
        Ok(())
    }

    async fn post_json(&self, url: &Url, body: &Value) -> ApiResult<Value> {
        let request = self
            .client
            .post(url.as_str())
            .timeout(self.timeout)
            .json(body);
        let response = Self::send_once(request, url).await?;
        Ok(response.json().await?)
    }

    async fn post_file(
        &self,
        url: &Url,
        part_name: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<Value> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part(part_name.to_string(), part);
        let request = self
            .client
            .post(url.as_str())
            .timeout(self.timeout)
            .multipart(form);
        let response = Self::send_once(request, url).await?;
        Ok(response.json().await?)
    }

    async fn post_event_stream(
        &self,
        url: &Url,
        bearer: &str,
        body: &Value,
    ) -> ApiResult<ByteStream> {
        let request = self
            .client
            .post(url.as_str())
            .bearer_auth(bearer)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(body);
        let response = Self::send_once(request, url).await?;

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(ApiError::from))
            .boxed())
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use futures_util::stream;
    use std::sync::Mutex;

    /// Canned response for the fake backend.
    #[derive(Debug, Clone)]
    pub enum CannedResponse {
        /// A JSON body
        Json(Value),
        /// A plain-text body
        Text(String),
        /// A non-success status
        Status(u16),
        /// An event stream, delivered as the given chunks
        Chunks(Vec<&'static str>),
    }

    /// A request seen by the fake backend.
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRequest {
        /// `GET` or `POST`
        pub method: &'static str,
        /// Full URL
        pub url: String,
        /// JSON body, or `{"part": .., "file_name": ..}` for multipart posts
        pub body: Option<Value>,
        /// Bearer token, if any
        pub bearer: Option<String>,
        /// Timeout policy of GET requests
        pub timeout: Option<RequestTimeout>,
    }

    /// A fake HTTP backend that returns canned responses.
    ///
    /// Responses are matched by URL substring, first match wins.
    #[derive(Default)]
    pub struct FakeBackend {
        responses: Vec<(String, CannedResponse)>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl FakeBackend {
        /// Create a new fake backend.
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a canned response for a URL pattern.
        pub fn with_response(mut self, url_contains: &str, response: CannedResponse) -> Self {
            self.responses.push((url_contains.to_string(), response));
            self
        }

        /// Requests seen so far, oldest first.
        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn respond(&self, request: RecordedRequest) -> ApiResult<CannedResponse> {
            let url = request.url.clone();
            self.requests.lock().unwrap().push(request);

            let response = self
                .responses
                .iter()
                .find(|(pattern, _)| url.contains(pattern.as_str()))
                .map(|(_, response)| response.clone());

            match response {
                Some(CannedResponse::Status(status)) => Err(ApiError::RequestFailed { status, url }),
                Some(response) => Ok(response),
                None => Err(ApiError::RequestFailed { status: 404, url }),
            }
        }

        fn get(url: &Url, timeout: RequestTimeout) -> RecordedRequest {
            RecordedRequest {
                method: "GET",
                url: url.to_string(),
                body: None,
                bearer: None,
                timeout: Some(timeout),
            }
        }

        fn post(url: &Url, body: Value, bearer: Option<&str>) -> RecordedRequest {
            RecordedRequest {
                method: "POST",
                url: url.to_string(),
                body: Some(body),
                bearer: bearer.map(String::from),
                timeout: None,
            }
        }
    }

    fn into_json(response: CannedResponse) -> ApiResult<Value> {
        match response {
            CannedResponse::Json(json) => Ok(json),
            CannedResponse::Text(text) => Ok(serde_json::from_str(&text)?),
            other => Err(ApiError::InvalidResponse {
                message: format!("not a JSON response: {other:?}"),
            }),
        }
    }

    #[async_trait]
    impl HttpBackend for FakeBackend {
        async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> ApiResult<T> {
            let json = into_json(self.respond(Self::get(url, RequestTimeout::Default))?)?;
            serde_json::from_value(json).map_err(Into::into)
        }

        async fn get_text(&self, url: &Url) -> ApiResult<String> {
            match self.respond(Self::get(url, RequestTimeout::Default))? {
                CannedResponse::Text(text) => Ok(text),
                CannedResponse::Json(json) => Ok(json.to_string()),
                other => Err(ApiError::InvalidResponse {
                    message: format!("not a text response: {other:?}"),
                }),
            }
        }

        async fn get_ack(&self, url: &Url, timeout: RequestTimeout) -> ApiResult<()> {
            self.respond(Self::get(url, timeout)).map(|_| ())
        }

        async fn post_json(&self, url: &Url, body: &Value) -> ApiResult<Value> {
            into_json(self.respond(Self::post(url, body.clone(), None))?)
        }

        async fn post_file(
            &self,
            url: &Url,
            part_name: &str,
            file_name: &str,
            bytes: Vec<u8>,
        ) -> ApiResult<Value> {
            let body = serde_json::json!({
                "part": part_name,
                "file_name": file_name,
                "len": bytes.len(),
            });
            into_json(self.respond(Self::post(url, body, None))?)
        }

        async fn post_event_stream(
            &self,
            url: &Url,
            bearer: &str,
            body: &Value,
        ) -> ApiResult<ByteStream> {
            match self.respond(Self::post(url, body.clone(), Some(bearer)))? {
                CannedResponse::Chunks(chunks) => Ok(stream::iter(
                    chunks
                        .into_iter()
                        .map(|chunk| Ok::<_, ApiError>(chunk.as_bytes().to_vec()))
                        .collect::<Vec<_>>(),
                )
                .boxed()),
                other => Err(ApiError::InvalidResponse {
                    message: format!("not an event stream: {other:?}"),
                }),
            }
        }
    }
}
