//! Chat messages and the completion request body.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// System prompt
    System,
    /// The person chatting
    User,
    /// The model
    Assistant,
}

/// One message of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message content
    pub content: String,
    /// Author
    pub role: ChatRole,
}

impl ChatMessage {
    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            role: ChatRole::User,
        }
    }

    /// An assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            role: ChatRole::Assistant,
        }
    }
}

/// Sampling parameters sent with every turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling mass
    pub top_p: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Random seed; 0 leaves it to the service
    pub seed: u64,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            top_p: 0.7,
            max_tokens: 1024,
            seed: 42,
        }
    }
}

/// Body of a streamed chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    /// Whole conversation, oldest first
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling mass
    pub top_p: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Random seed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Always `true`
    pub stream: bool,
}

impl ChatCompletionRequest {
    /// Build a streamed request for the conversation.
    pub fn new(messages: &[ChatMessage], params: &SamplingParams) -> Self {
        Self {
            messages: messages.to_vec(),
            temperature: params.temperature,
            top_p: params.top_p,
            max_tokens: params.max_tokens,
            seed: (params.seed != 0).then_some(params.seed),
            stream: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body() {
        let request =
            ChatCompletionRequest::new(&[ChatMessage::user("hi")], &SamplingParams::default());
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["messages"], json!([{"content": "hi", "role": "user"}]));
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["seed"], 42);
        assert_eq!(body["stream"], true);
    }

    #[test]
    fn test_zero_seed_is_omitted() {
        let params = SamplingParams {
            seed: 0,
            ..SamplingParams::default()
        };
        let body = serde_json::to_value(ChatCompletionRequest::new(&[], &params)).unwrap();
        assert!(body.get("seed").is_none());
    }
}
