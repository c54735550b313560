//! # ragent-rag
//!
//! Ingestion, retrieval and answer generation for RAGent.
//!
//! ## Overview
//!
//! - [`EmbeddingProvider`] - text to vectors ([`OllamaEmbeddingProvider`],
//!   [`OpenAIEmbeddingProvider`], and an in-process model behind the
//!   `local-embeddings` feature)
//! - [`VectorStore`] - named collections with nearest-neighbour search
//!   ([`SqliteVectorStore`] on disk, [`InMemoryVectorStore`] for tests)
//! - [`Ingestor`] - resets a collection and refills it from a folder of `.txt` files
//! - [`Retriever`] - embeds a question and returns the `k` nearest documents
//! - [`RagPipeline`] - retrieval, prompt assembly and generation in one call
//!
//! Distances are squared Euclidean; results come back closest first.

pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
mod http;
pub mod ingest;
pub mod inmemory;
#[cfg(feature = "local-embeddings")]
pub mod local;
pub mod ollama;
pub mod openai;
pub mod pipeline;
pub mod prompts;
pub mod provider;
pub mod retriever;
pub mod sqlite;
pub mod vectorstore;

pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Document, QueryMatch, QueryResult, Record};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use ingest::{IngestOutcome, Ingestor};
pub use inmemory::InMemoryVectorStore;
#[cfg(feature = "local-embeddings")]
pub use local::LocalEmbeddingProvider;
pub use ollama::OllamaEmbeddingProvider;
pub use openai::OpenAIEmbeddingProvider;
pub use pipeline::{Answer, RagPipeline, RagPipelineBuilder};
pub use prompts::STRICT_CONTEXT_PROMPT;
pub use provider::resolve_embedding_provider;
pub use retriever::Retriever;
pub use sqlite::SqliteVectorStore;
pub use vectorstore::VectorStore;
