//! OpenAI embedding provider using the OpenAI embeddings API.

use async_trait::async_trait;
use ragent_core::Settings;
use ragent_core::http::endpoint;
use ragent_core::config::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_EMBEDDING_MODEL};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::embedding::{EmbeddingProvider, expect_count};
use crate::error::{RagError, Result};
use crate::http::post_json;

const PROVIDER: &str = "OpenAI";

/// An [`EmbeddingProvider`] backed by the OpenAI embeddings API.
///
/// Uses `reqwest` to call `{base_url}/embeddings` directly.
///
/// # Configuration
///
/// - `model` – defaults to `text-embedding-3-small`.
/// - `base_url` – defaults to `https://api.openai.com/v1`.
/// - `api_key` – required; a blank key is rejected at construction.
///
/// # Example
///
/// ```rust,ignore
/// use ragent_rag::openai::OpenAIEmbeddingProvider;
///
/// let provider = OpenAIEmbeddingProvider::new("sk-...")?;
/// let embedding = provider.embed_query("hello world").await?;
/// ```
pub struct OpenAIEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAIEmbeddingProvider {
    /// Create a new provider with the given API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RagError::ConfigError("OpenAI API key must not be empty".into()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_OPENAI_EMBEDDING_MODEL.into(),
            base_url: DEFAULT_OPENAI_BASE_URL.into(),
        })
    }

    /// Create a provider from settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `OPENAI_API_KEY` is unset, before
    /// any request is made.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.require_openai_api_key()?;
        Ok(Self::new(api_key)?
            .with_model(&settings.openai_embedding_model)
            .with_base_url(&settings.openai_base_url))
    }

    /// Set the model name (e.g. `text-embedding-3-large`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the provider at an OpenAI-compatible API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            provider = PROVIDER,
            batch_size = texts.len(),
            model = %self.model,
            "embedding batch"
        );

        let url = endpoint(&self.base_url, "embeddings");
        let request = EmbeddingRequest { model: &self.model, input: texts };
        let response: EmbeddingResponse =
            post_json(&self.client, PROVIDER, &url, Some(&self.api_key), &request).await?;

        let embeddings = response.data.into_iter().map(|d| d.embedding).collect();
        expect_count(PROVIDER, texts.len(), embeddings)
    }
}
