//! Connection settings for the OpenAI clients.

use ragent_core::config::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};
use ragent_core::{RagentError, Result, Settings};

/// API key, model and endpoint root for an OpenAI client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub model: String,
    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
}

impl OpenAIConfig {
    /// Create a config for the public OpenAI API.
    ///
    /// # Errors
    ///
    /// Returns [`RagentError::Config`] if `api_key` is blank.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RagentError::Config("OpenAI API key must not be empty".into()));
        }
        Ok(Self { api_key, model: model.into(), base_url: DEFAULT_OPENAI_BASE_URL.into() })
    }

    /// Build from settings, defaulting the model to `gpt-4o`.
    ///
    /// # Errors
    ///
    /// Returns [`RagentError::Config`] if `OPENAI_API_KEY` is unset.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.require_openai_api_key()?;
        let model = settings.openai_model.as_deref().unwrap_or(DEFAULT_OPENAI_MODEL);
        Ok(Self::new(api_key, model)?.with_base_url(&settings.openai_base_url))
    }

    /// Point the client at an OpenAI-compatible API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
