//! Vector store trait for storing and searching vector embeddings.

use async_trait::async_trait;

use crate::document::{QueryMatch, Record};
use crate::error::Result;

/// A storage backend for vector embeddings with nearest-neighbour search.
///
/// Implementations manage named collections of [`Record`]s. A collection
/// fixes its vector dimensionality on the first write; later writes or
/// queries with a different dimensionality are rejected.
///
/// # Example
///
/// ```rust,ignore
/// use ragent_rag::{SqliteVectorStore, VectorStore};
///
/// let store = SqliteVectorStore::open("vector_db").await?;
/// store.create_collection("facts").await?;
/// store.add("facts", &records).await?;
/// let matches = store.query("facts", &query_embedding, 3).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Get-or-create a named collection.
    async fn create_collection(&self, name: &str) -> Result<()>;

    /// Delete a named collection and all its records.
    ///
    /// Returns [`RagError::CollectionNotFound`](crate::RagError::CollectionNotFound)
    /// when there is nothing to delete.
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Add records to an existing collection, replacing records with the same id.
    async fn add(&self, collection: &str, records: &[Record]) -> Result<()>;

    /// The `k` records nearest to `embedding`, ordered by ascending squared
    /// Euclidean distance.
    async fn query(&self, collection: &str, embedding: &[f32], k: usize) -> Result<Vec<QueryMatch>>;

    /// Number of records in a collection.
    async fn count(&self, collection: &str) -> Result<usize>;

    /// Names of all collections, sorted.
    async fn list_collections(&self) -> Result<Vec<String>>;

    /// Every record in a collection, ordered by id.
    async fn get_all(&self, collection: &str) -> Result<Vec<Record>>;
}

/// Squared Euclidean distance.
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Sort by ascending distance (ties by id) and keep the first `k`.
///
/// Distances compare with `total_cmp`, so a NaN distance cannot break the sort.
pub(crate) fn nearest(mut matches: Vec<QueryMatch>, k: usize) -> Vec<QueryMatch> {
    matches.sort_by(|a, b| a.distance.total_cmp(&b.distance).then_with(|| a.id.cmp(&b.id)));
    matches.truncate(k);
    matches
}
