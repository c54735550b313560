//! Ollama embedding provider using the local `/api/embed` endpoint.

use async_trait::async_trait;
use ragent_core::http::endpoint;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::embedding::{EmbeddingProvider, expect_count};
use crate::error::Result;
use crate::http::post_json;

const PROVIDER: &str = "Ollama";

/// An [`EmbeddingProvider`] backed by a local Ollama server.
///
/// Every call is a single batch request:
/// `POST {base_url}/api/embed` with `{"model": .., "input": [..]}`.
///
/// # Example
///
/// ```rust,ignore
/// use ragent_rag::ollama::OllamaEmbeddingProvider;
///
/// let provider = OllamaEmbeddingProvider::new("http://localhost:11434", "nomic-embed-text");
/// let embedding = provider.embed_query("hello world").await?;
/// ```
pub struct OllamaEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaEmbeddingProvider {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), base_url: base_url.into(), model: model.into() }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
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

        let url = endpoint(&self.base_url, "api/embed");
        let request = EmbedRequest { model: &self.model, input: texts };
        let response: EmbedResponse =
            post_json(&self.client, PROVIDER, &url, None, &request).await?;
        expect_count(PROVIDER, texts.len(), response.embeddings)
    }
}
