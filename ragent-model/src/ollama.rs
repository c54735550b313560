//! Local Ollama backend.
//!
//! Ollama is always driven completion-style: the ordered messages are
//! flattened into a single prompt and sent to `/api/generate` with streaming
//! disabled.

use async_trait::async_trait;
use ragent_core::http::endpoint;
use ragent_core::{Llm, LlmResponse, Message, Result, flatten_messages};
use serde::Serialize;
use tracing::debug;

use crate::http::post_json;

const PROVIDER: &str = "Ollama";

/// An [`Llm`] backed by a local Ollama server.
///
/// # Example
///
/// ```rust,ignore
/// use ragent_model::OllamaModel;
///
/// let model = OllamaModel::new("http://localhost:11434", "llama2");
/// let reply = model.invoke(&[Message::user("Hello")]).await?;
/// ```
pub struct OllamaModel {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaModel {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), base_url: base_url.into(), model: model.into() }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[async_trait]
impl Llm for OllamaModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse> {
        let request = GenerateRequest {
            model: &self.model,
            prompt: flatten_messages(messages),
            stream: false,
        };
        debug!(
            provider = PROVIDER,
            model = %self.model,
            prompt_len = request.prompt.len(),
            "generate"
        );

        let url = endpoint(&self.base_url, "api/generate");
        let raw = post_json(&self.client, PROVIDER, &url, None, &request).await?;
        let content = raw.get("response").and_then(|v| v.as_str()).map(str::to_string);
        Ok(LlmResponse::new(content, raw))
    }
}
