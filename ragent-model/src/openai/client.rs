//! OpenAI client implementations.

use async_trait::async_trait;
use ragent_core::http::endpoint;
use ragent_core::{Llm, LlmResponse, Message, Result, flatten_messages};
use tracing::debug;

use super::config::OpenAIConfig;
use super::convert::{self, COMPLETION_MAX_TOKENS, ChatRequest, CompletionRequest};
use crate::http::post_json;

const PROVIDER: &str = "OpenAI";

/// Chat-style client: ordered messages in, assistant message out.
///
/// Calls `POST {base_url}/chat/completions`.
pub struct OpenAIChatClient {
    client: reqwest::Client,
    config: OpenAIConfig,
}

impl OpenAIChatClient {
    /// Create a new chat client.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        Ok(Self { client: reqwest::Client::new(), config })
    }
}

#[async_trait]
impl Llm for OpenAIChatClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: convert::to_chat_messages(messages),
        };
        debug!(
            provider = PROVIDER,
            model = %self.config.model,
            messages = messages.len(),
            "chat completion"
        );

        let url = endpoint(&self.config.base_url, "chat/completions");
        let raw =
            post_json(&self.client, PROVIDER, &url, Some(&self.config.api_key), &request).await?;
        Ok(LlmResponse::new(convert::chat_content(&raw), raw))
    }
}

/// Legacy completion-style client: flattened prompt in, text out.
///
/// Calls `POST {base_url}/completions`.
pub struct OpenAICompletionClient {
    client: reqwest::Client,
    config: OpenAIConfig,
}

impl OpenAICompletionClient {
    /// Create a new completion client.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        Ok(Self { client: reqwest::Client::new(), config })
    }
}

#[async_trait]
impl Llm for OpenAICompletionClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse> {
        let request = CompletionRequest {
            model: &self.config.model,
            prompt: flatten_messages(messages),
            max_tokens: COMPLETION_MAX_TOKENS,
        };
        debug!(
            provider = PROVIDER,
            model = %self.config.model,
            prompt_len = request.prompt.len(),
            "completion"
        );

        let url = endpoint(&self.config.base_url, "completions");
        let raw =
            post_json(&self.client, PROVIDER, &url, Some(&self.config.api_key), &request).await?;
        Ok(LlmResponse::new(convert::completion_text(&raw), raw))
    }
}
