//! In-process sentence embeddings via `fastembed`.
//!
//! This module is only available when the `local-embeddings` feature is enabled.
//! The ONNX model is downloaded on first use and loaded once per provider.

use std::sync::Mutex;

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::{debug, info};

use crate::embedding::{EmbeddingProvider, expect_count};
use crate::error::{RagError, Result};

const PROVIDER: &str = "local";

/// An [`EmbeddingProvider`] that runs a sentence-embedding model in process.
pub struct LocalEmbeddingProvider {
    model: Mutex<TextEmbedding>,
    model_name: String,
}

impl LocalEmbeddingProvider {
    /// Load the named model.
    ///
    /// Accepts the short sentence-transformers names (`all-MiniLM-L6-v2`) with
    /// or without the `sentence-transformers/` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] for an unsupported model name and
    /// [`RagError::EmbeddingError`] when the model fails to load.
    pub fn new(model_name: &str) -> Result<Self> {
        let model = resolve_model(model_name)?;
        info!(model = model_name, "loading local embedding model");
        let text_model = TextEmbedding::try_new(
            InitOptions::new(model).with_show_download_progress(true),
        )
        .map_err(|e| RagError::embedding(PROVIDER, format!("failed to load model: {e}")))?;

        Ok(Self { model: Mutex::new(text_model), model_name: model_name.to_string() })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

fn resolve_model(name: &str) -> Result<EmbeddingModel> {
    let short = name.strip_prefix("sentence-transformers/").unwrap_or(name);
    match short.to_ascii_lowercase().as_str() {
        "all-minilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
        "bge-small-en-v1.5" | "baai/bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        _ => Err(RagError::ConfigError(format!("unsupported local embedding model '{name}'"))),
    }
}

#[async_trait]
impl EmbeddingProvider for LocalEmbeddingProvider {
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
            model = %self.model_name,
            "embedding batch"
        );

        let mut model = self
            .model
            .lock()
            .map_err(|_| RagError::embedding(PROVIDER, "model lock poisoned"))?;
        let embeddings = model
            .embed(texts.to_vec(), None)
            .map_err(|e| RagError::embedding(PROVIDER, e.to_string()))?;
        expect_count(PROVIDER, texts.len(), embeddings)
    }
}
