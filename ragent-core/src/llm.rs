//! The LLM capability trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::message::Message;

/// The outcome of a single [`Llm::invoke`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Generated text, when the backend returned one.
    pub content: Option<String>,
    /// The backend's response body as received.
    pub raw: Value,
}

impl LlmResponse {
    pub fn new(content: Option<String>, raw: Value) -> Self {
        Self { content, raw }
    }

    /// Text to show the user: the content field if present, otherwise the raw
    /// response rendered as a string.
    pub fn text(&self) -> String {
        match (&self.content, &self.raw) {
            (Some(content), _) => content.clone(),
            (None, Value::String(raw)) => raw.clone(),
            (None, raw) => raw.to_string(),
        }
    }
}

/// A language model that turns an ordered list of messages into a reply.
///
/// Backends are resolved once from [`Settings`](crate::Settings) and shared as
/// `Arc<dyn Llm>`; callers never branch on the backend kind.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Model identifier, for logging.
    fn name(&self) -> &str;

    /// Generate a reply for `messages`.
    ///
    /// Failures (network, auth, rate limits) are returned as-is; there is no
    /// retry.
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse>;
}
