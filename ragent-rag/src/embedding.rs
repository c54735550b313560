//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::{RagError, Result};

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap specific embedding backends (Ollama, OpenAI, an
/// in-process model) behind a unified async interface. The same provider must
/// be used for ingestion and for queries against a collection; vectors from
/// different models are not comparable.
///
/// # Example
///
/// ```rust,ignore
/// use ragent_rag::EmbeddingProvider;
///
/// let vectors = provider.embed_documents(&["Paris is the capital of France."]).await?;
/// let query = provider.embed_query("What is the capital of France?").await?;
/// assert_eq!(vectors[0].len(), query.len());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Short backend/model label used in logs and errors.
    fn name(&self) -> &str;

    /// Embed a batch of texts, one vector per input in the same order.
    async fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single query string.
    ///
    /// The default implementation sends a one-element batch through
    /// [`embed_documents`](EmbeddingProvider::embed_documents).
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_documents(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RagError::embedding(self.name(), "backend returned no embedding"))
    }
}

/// Reject a response whose vector count differs from the input count.
pub(crate) fn expect_count(
    provider: &str,
    expected: usize,
    embeddings: Vec<Vec<f32>>,
) -> Result<Vec<Vec<f32>>> {
    if embeddings.len() != expected {
        return Err(RagError::embedding(
            provider,
            format!("expected {expected} embeddings, got {}", embeddings.len()),
        ));
    }
    Ok(embeddings)
}
