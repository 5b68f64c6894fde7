//! Streamed chat completion port.

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use super::api_error::ApiPortResult;
use crate::chat::ChatCompletionRequest;

/// Lazy sequence of text deltas for one request.
///
/// Ends on the server's end-of-stream sentinel or when the connection
/// closes. Each call to [`ChatStreamPort::open_stream`] starts a new one.
pub type DeltaStream = BoxStream<'static, ApiPortResult<String>>;

/// Port trait for streamed text generation.
#[async_trait]
pub trait ChatStreamPort: Send + Sync {
    /// Send the conversation and return the stream of response deltas.
    ///
    /// Rejected credentials surface as `ApiPortError::Unauthorized`.
    async fn open_stream(
        &self,
        function_id: &str,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> ApiPortResult<DeltaStream>;
}
