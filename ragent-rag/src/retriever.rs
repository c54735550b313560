//! k-nearest-neighbour retrieval over a collection.

use std::sync::Arc;

use tracing::debug;

use crate::document::QueryResult;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::vectorstore::VectorStore;

/// Embeds a question and returns the nearest stored documents.
///
/// The embedder must be the one the collection was ingested with.
pub struct Retriever {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl Retriever {
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }

    /// The `k` documents nearest to `query`, closest first.
    ///
    /// A collection that was never ingested is created empty and yields no
    /// matches.
    pub async fn retrieve(&self, query: &str, collection: &str, k: usize) -> Result<QueryResult> {
        self.store.create_collection(collection).await?;
        let embedding = self.embedder.embed_query(query).await?;
        let matches = self.store.query(collection, &embedding, k).await?;
        debug!(collection, k, retrieved = matches.len(), "retrieved documents");
        Ok(QueryResult::new(matches))
    }
}
