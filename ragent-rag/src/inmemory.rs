//! In-memory vector store using squared Euclidean distance.
//!
//! This module provides [`InMemoryVectorStore`], a zero-dependency vector store
//! backed by a `HashMap` protected by a `tokio::sync::RwLock`. It is suitable
//! for tests and throwaway sessions; nothing survives the process.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{QueryMatch, Record};
use crate::error::{RagError, Result};
use crate::vectorstore::{VectorStore, nearest, squared_l2};

const BACKEND: &str = "InMemory";

#[derive(Debug, Default)]
struct Collection {
    dimension: Option<usize>,
    records: BTreeMap<String, Record>,
}

/// An in-memory vector store.
///
/// Collections are stored as a map: collection name → record id → record.
/// All operations are async-safe via `tokio::sync::RwLock`.
///
/// # Example
///
/// ```rust,ignore
/// use ragent_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.create_collection("facts").await?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_dimension(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(RagError::store(
            BACKEND,
            format!("embedding dimension {actual} does not match collection dimension {expected}"),
        ));
    }
    Ok(())
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn create_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.entry(name.to_string()).or_default();
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| RagError::CollectionNotFound(name.to_string()))
    }

    async fn add(&self, collection: &str, records: &[Record]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let store = collections
            .get_mut(collection)
            .ok_or_else(|| RagError::CollectionNotFound(collection.to_string()))?;

        let Some(first) = records.first() else {
            return Ok(());
        };
        let dimension = store.dimension.unwrap_or(first.embedding.len());
        for record in records {
            check_dimension(dimension, record.embedding.len())?;
        }

        store.dimension = Some(dimension);
        for record in records {
            store.records.insert(record.id.clone(), record.clone());
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<QueryMatch>> {
        let collections = self.collections.read().await;
        let store = collections
            .get(collection)
            .ok_or_else(|| RagError::CollectionNotFound(collection.to_string()))?;

        let Some(dimension) = store.dimension else {
            return Ok(Vec::new());
        };
        check_dimension(dimension, embedding.len())?;

        let scored = store
            .records
            .values()
            .map(|record| QueryMatch {
                id: record.id.clone(),
                text: record.text.clone(),
                metadata: record.metadata.clone(),
                distance: squared_l2(&record.embedding, embedding),
            })
            .collect();
        Ok(nearest(scored, k))
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .map(|c| c.records.len())
            .ok_or_else(|| RagError::CollectionNotFound(collection.to_string()))
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        let collections = self.collections.read().await;
        let mut names: Vec<String> = collections.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn get_all(&self, collection: &str) -> Result<Vec<Record>> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .map(|c| c.records.values().cloned().collect())
            .ok_or_else(|| RagError::CollectionNotFound(collection.to_string()))
    }
}
