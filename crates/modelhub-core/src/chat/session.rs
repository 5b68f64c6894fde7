//! One conversation with a hosted text-generation model.

use std::sync::Arc;

use futures_util::StreamExt;
use tracing::{debug, info, warn};

use super::errors::ChatError;
use super::functions::function_id;
use super::types::{ChatCompletionRequest, ChatMessage, ChatRole, SamplingParams};
use crate::ports::{ChatStreamPort, KeyValueStore};

/// Store key holding the chat API key.
pub const API_KEY_STORE_KEY: &str = "apiKey";

/// History, parameters and credentials for chatting with one model.
pub struct ChatSession {
    port: Arc<dyn ChatStreamPort>,
    store: Arc<dyn KeyValueStore>,
    model_name: String,
    function_id: &'static str,
    messages: Vec<ChatMessage>,
    params: SamplingParams,
    api_key: String,
}

impl ChatSession {
    /// Open a session for `model_name`, reading the saved API key.
    pub fn new(
        port: Arc<dyn ChatStreamPort>,
        store: Arc<dyn KeyValueStore>,
        model_name: &str,
    ) -> Result<Self, ChatError> {
        let function_id = function_id(model_name).ok_or_else(|| ChatError::UnknownModel {
            name: model_name.to_string(),
        })?;
        let api_key = store.get(API_KEY_STORE_KEY).unwrap_or_default();
        debug!(model_name, has_api_key = !api_key.is_empty(), "Opened chat session");

        Ok(Self {
            port,
            store,
            model_name: model_name.to_string(),
            function_id,
            messages: Vec::new(),
            params: SamplingParams::default(),
            api_key,
        })
    }

    /// Model name.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Conversation so far, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Current API key (may be empty).
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Replace and persist the API key.
    pub fn set_api_key(&mut self, api_key: impl Into<String>) -> Result<(), ChatError> {
        self.api_key = api_key.into();
        self.store.set(API_KEY_STORE_KEY, &self.api_key)?;
        Ok(())
    }

    /// Sampling parameters.
    pub const fn params(&self) -> &SamplingParams {
        &self.params
    }

    /// Replace the sampling parameters for later turns.
    pub const fn set_params(&mut self, params: SamplingParams) {
        self.params = params;
    }

    /// Forget the conversation.
    pub fn clear_history(&mut self) {
        self.messages.clear();
    }

    /// Send one user message and stream the answer.
    ///
    /// `on_delta` sees every text delta as it arrives. Blank input is
    /// ignored and returns `Ok(None)`; otherwise the full answer is
    /// returned. On a stream error the partial answer stays in the history.
    pub async fn send<F>(&mut self, text: &str, mut on_delta: F) -> Result<Option<String>, ChatError>
    where
        F: FnMut(&str) + Send,
    {
        if text.trim().is_empty() {
            return Ok(None);
        }
        if self.api_key.is_empty() {
            return Err(ChatError::MissingApiKey);
        }

        self.messages.push(ChatMessage::user(text));
        let request = ChatCompletionRequest::new(&self.messages, &self.params);
        debug!(
            model = %self.model_name,
            messages = request.messages.len(),
            "Sending chat request"
        );

        let mut stream = self
            .port
            .open_stream(self.function_id, &self.api_key, &request)
            .await
            .map_err(|err| {
                warn!(model = %self.model_name, error = %err, "Chat request failed");
                ChatError::from(err)
            })?;

        let mut answer = String::new();
        let mut answer_index: Option<usize> = None;
        while let Some(item) = stream.next().await {
            let delta = item.map_err(|err| {
                warn!(model = %self.model_name, error = %err, "Chat stream failed");
                ChatError::from(err)
            })?;

            answer.push_str(&delta);
            match answer_index {
                Some(index) => {
                    if let Some(message) = self.messages.get_mut(index) {
                        message.content.clone_from(&answer);
                    }
                }
                None => {
                    self.messages.push(ChatMessage::assistant(answer.clone()));
                    answer_index = Some(self.messages.len() - 1);
                }
            }
            on_delta(&delta);
        }

        info!(model = %self.model_name, chars = answer.len(), "Chat answer complete");
        Ok(Some(answer))
    }

    /// Whether the last message is an answer.
    pub fn last_is_answer(&self) -> bool {
        self.messages
            .last()
            .is_some_and(|m| m.role == ChatRole::Assistant)
    }
}
