//! RAG pipeline orchestrator.
//!
//! The [`RagPipeline`] coordinates the full ingest-and-ask workflow by
//! composing an [`EmbeddingProvider`], a [`VectorStore`] and an [`Llm`].
//!
//! # Example
//!
//! ```rust,ignore
//! use ragent_rag::{RagPipeline, RagConfig, SqliteVectorStore};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(embedder)
//!     .vector_store(Arc::new(SqliteVectorStore::open("vector_db").await?))
//!     .llm(llm)
//!     .build()?;
//!
//! pipeline.ingest_folder(Path::new("data/facts"), "facts").await?;
//! let answer = pipeline.ask("facts", "What is the capital of France?").await?;
//! println!("{}", answer.text);
//! ```

use std::path::Path;
use std::sync::Arc;

use ragent_core::{Llm, Message, RagentError, Settings};
use tracing::{debug, error, warn};

use crate::config::RagConfig;
use crate::document::QueryResult;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::ingest::{IngestOutcome, Ingestor};
use crate::prompts::{self, STRICT_CONTEXT_PROMPT};
use crate::retriever::Retriever;
use crate::vectorstore::VectorStore;

/// The generated answer together with the documents it was grounded on.
#[derive(Debug, Clone)]
pub struct Answer {
    /// Response content, or the raw response rendered as text when the
    /// backend returned no content field.
    pub text: String,
    pub retrieved: QueryResult,
}

/// The RAG pipeline orchestrator.
///
/// Ingestion is folder → embed → store; a question is embed → search →
/// prompt → generate. Nothing is remembered between questions. Construct one
/// via [`RagPipeline::builder()`].
pub struct RagPipeline {
    config: RagConfig,
    vector_store: Arc<dyn VectorStore>,
    ingestor: Ingestor,
    retriever: Retriever,
    llm: Arc<dyn Llm>,
    system_prompt: String,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the vector store.
    pub fn vector_store(&self) -> &Arc<dyn VectorStore> {
        &self.vector_store
    }

    /// Return a reference to the LLM.
    pub fn llm(&self) -> &Arc<dyn Llm> {
        &self.llm
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Replace `collection` with the `.txt` documents of `folder`.
    ///
    /// # Errors
    ///
    /// Propagates I/O, embedding and store errors unchanged.
    pub async fn ingest_folder(&self, folder: &Path, collection: &str) -> Result<IngestOutcome> {
        self.ingestor.ingest_folder(folder, collection).await
    }

    /// Retrieve the configured number of nearest documents for `question`.
    pub async fn retrieve(&self, collection: &str, question: &str) -> Result<QueryResult> {
        self.retriever.retrieve(question, collection, self.config.top_k).await
    }

    /// Join retrieved texts into the context block, applying the optional cap.
    pub fn build_context(&self, retrieved: &QueryResult) -> String {
        let context = retrieved.texts().collect::<Vec<_>>().join("\n");
        match self.config.max_context_chars {
            Some(max) if context.chars().count() > max => {
                warn!(max_chars = max, "retrieved context exceeds limit, truncating");
                prompts::truncate_chars(&context, max).to_string()
            }
            _ => context,
        }
    }

    /// The two-message prompt for `question` over `retrieved`.
    pub fn build_messages(&self, retrieved: &QueryResult, question: &str) -> Vec<Message> {
        let context = self.build_context(retrieved);
        debug!(context = %context, "context sent to LLM");
        prompts::build_messages(&self.system_prompt, &context, question)
    }

    /// Answer `question` from the documents in `collection`.
    ///
    /// The LLM is called even when nothing was retrieved.
    ///
    /// # Errors
    ///
    /// Retrieval errors and LLM configuration errors propagate unchanged; a
    /// failed LLM call is reported as [`RagError::PipelineError`].
    pub async fn ask(&self, collection: &str, question: &str) -> Result<Answer> {
        let retrieved = self.retrieve(collection, question).await?;
        let messages = self.build_messages(&retrieved, question);
        debug!(prompt = ?messages, "full prompt");

        let response = self.llm.invoke(&messages).await.map_err(|e| match e {
            RagentError::Config(_) => RagError::Core(e),
            RagentError::Model { .. } => {
                error!(model = self.llm.name(), error = %e, "generation failed");
                RagError::PipelineError(format!("generation failed: {e}"))
            }
        })?;

        Ok(Answer { text: response.text(), retrieved })
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// All fields except `config` and `system_prompt` are required. Call
/// [`build()`](RagPipelineBuilder::build) to validate and produce the pipeline.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    llm: Option<Arc<dyn Llm>>,
    system_prompt: Option<String>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration. Defaults to [`RagConfig::default`].
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider used for both ingestion and queries.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the generation backend.
    pub fn llm(mut self, llm: Arc<dyn Llm>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Replace the built-in strict-context system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Take `top_k`, the context cap and `SYSTEM_PROMPT_FILE` from settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt file cannot be read.
    pub fn settings(mut self, settings: &Settings) -> Result<Self> {
        self.config = Some(RagConfig::from_settings(settings));
        if let Some(path) = &settings.system_prompt_file {
            self.system_prompt = Some(prompts::load_system_prompt(path)?);
        }
        Ok(self)
    }

    /// Build the [`RagPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;
        let llm = self.llm.ok_or_else(|| RagError::ConfigError("llm is required".to_string()))?;

        Ok(RagPipeline {
            config: self.config.unwrap_or_default(),
            ingestor: Ingestor::new(vector_store.clone(), embedding_provider.clone()),
            retriever: Retriever::new(vector_store.clone(), embedding_provider),
            vector_store,
            llm,
            system_prompt: self.system_prompt.unwrap_or_else(|| STRICT_CONTEXT_PROMPT.to_string()),
        })
    }
}
