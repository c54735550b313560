//! Resolve [`Settings`] into a concrete [`Llm`] once at startup.

use std::sync::Arc;

use ragent_core::{Llm, LlmBackend, RagentError, Result, Settings};
use tracing::info;

use crate::ollama::OllamaModel;
use crate::openai::{OpenAIChatClient, OpenAICompletionClient, OpenAIConfig};

/// Hosted model names with this prefix are chat models.
pub const CHAT_MODEL_PREFIX: &str = "gpt-";

/// How a hosted model is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationStyle {
    /// Ordered messages in, message out.
    Chat,
    /// Flattened prompt in, text out.
    Completion,
}

impl InvocationStyle {
    pub fn for_model(model: &str) -> Self {
        if model.starts_with(CHAT_MODEL_PREFIX) { Self::Chat } else { Self::Completion }
    }
}

/// Build the LLM backend named by `settings`.
///
/// # Errors
///
/// Returns [`RagentError::Config`] before any network call when the hosted
/// backend has no API key or the Ollama backend has no model name.
pub fn resolve_llm(settings: &Settings) -> Result<Arc<dyn Llm>> {
    match settings.llm_backend {
        LlmBackend::Ollama => {
            let model = settings.ollama_model.as_deref().ok_or_else(|| {
                RagentError::Config("an Ollama model name is required (set OLLAMA_MODEL)".into())
            })?;
            info!(backend = "ollama", model, "using local model");
            Ok(Arc::new(OllamaModel::new(&settings.ollama_base_url, model)))
        }
        LlmBackend::OpenAi => {
            let config = OpenAIConfig::from_settings(settings)?;
            let style = InvocationStyle::for_model(&config.model);
            info!(backend = "openai", model = %config.model, ?style, "using hosted model");
            Ok(match style {
                InvocationStyle::Chat => Arc::new(OpenAIChatClient::new(config)?),
                InvocationStyle::Completion => Arc::new(OpenAICompletionClient::new(config)?),
            })
        }
    }
}
