//! Data types for documents, stored records and query results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata key holding the originating file name.
pub const SOURCE_KEY: &str = "source";
/// Metadata key holding a copy of the document text.
pub const DOCUMENT_KEY: &str = "document";

/// A knowledge-base file loaded for ingestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// File name; unique within a collection.
    pub id: String,
    /// Full file contents.
    pub text: String,
    /// `{source: file name, document: text}`.
    pub metadata: HashMap<String, String>,
}

impl Document {
    /// Build a document from a file name and its contents.
    pub fn from_file(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        let id = file_name.into();
        let text = text.into();
        let metadata = HashMap::from([
            (SOURCE_KEY.to_string(), id.clone()),
            (DOCUMENT_KEY.to_string(), text.clone()),
        ]);
        Self { id, text, metadata }
    }

    /// Attach an embedding, producing the record the store persists.
    pub fn into_record(self, embedding: Vec<f32>) -> Record {
        Record { id: self.id, text: self.text, embedding, metadata: self.metadata }
    }
}

/// A [`Document`] together with its embedding vector, as held by a vector store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: String,
    pub text: String,
    pub embedding: Vec<f32>,
    pub metadata: HashMap<String, String>,
}

/// One nearest-neighbour hit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryMatch {
    pub id: String,
    pub text: String,
    pub metadata: HashMap<String, String>,
    /// Squared Euclidean distance to the query (lower is closer).
    pub distance: f32,
}

/// The matches for one query, ordered by ascending distance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QueryResult {
    pub matches: Vec<QueryMatch>,
}

impl QueryResult {
    pub fn new(matches: Vec<QueryMatch>) -> Self {
        Self { matches }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Retrieved document texts, closest first.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.matches.iter().map(|m| m.text.as_str())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.matches.iter().map(|m| m.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_metadata_carries_source_and_text() {
        let doc = Document::from_file("paris.txt", "Paris is the capital of France.");
        assert_eq!(doc.id, "paris.txt");
        assert_eq!(doc.metadata[SOURCE_KEY], "paris.txt");
        assert_eq!(doc.metadata[DOCUMENT_KEY], "Paris is the capital of France.");

        let record = doc.clone().into_record(vec![1.0, 0.0]);
        assert_eq!(record.id, doc.id);
        assert_eq!(record.metadata, doc.metadata);
        assert_eq!(record.embedding, vec![1.0, 0.0]);
    }
}
