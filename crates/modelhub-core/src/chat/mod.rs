//! Streamed text-generation conversations.
//!
//! A [`ChatSession`] keeps the history and sampling parameters for one
//! hosted model, sends the whole conversation on each turn and folds the
//! streamed deltas into a single assistant message.

mod errors;
mod functions;
mod session;
mod types;

pub use errors::ChatError;
pub use functions::{function_id, model_names};
pub use session::{API_KEY_STORE_KEY, ChatSession};
pub use types::{ChatCompletionRequest, ChatMessage, ChatRole, SamplingParams};
