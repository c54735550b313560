//! Folder ingestion: reset a collection and refill it from `.txt` files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::document::Document;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// What an ingestion run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The collection now holds exactly `count` documents.
    Ingested { count: usize },
    /// The folder had no `.txt` files; the collection was left empty.
    NoDocuments,
}

/// List the `.txt` files directly under `folder`, sorted by name.
///
/// Symlinks are followed, so a link to a text file counts as one.
///
/// # Errors
///
/// Returns [`RagError::Io`] if the folder is missing or unreadable.
pub fn discover_text_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(folder).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| RagError::io(folder, e.into()))?;
        let is_text = entry.file_name().to_string_lossy().ends_with(".txt");
        if is_text && entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Read every `.txt` file under `folder` into a [`Document`].
///
/// # Errors
///
/// Returns [`RagError::Io`] for a missing folder, an unreadable file or a
/// file that is not valid UTF-8.
pub fn load_documents(folder: &Path) -> Result<Vec<Document>> {
    discover_text_files(folder)?
        .into_iter()
        .map(|path| {
            let text = std::fs::read_to_string(&path).map_err(|e| RagError::io(&path, e))?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(Document::from_file(file_name, text))
        })
        .collect()
}

/// Replaces a collection's contents with the documents of a folder.
pub struct Ingestor {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl Ingestor {
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }

    /// Delete `collection`, recreate it and fill it from `folder`.
    ///
    /// A missing collection is not an error; any other delete failure is
    /// logged and ingestion carries on. The delete is not rolled back if a
    /// later step fails.
    pub async fn ingest_folder(&self, folder: &Path, collection: &str) -> Result<IngestOutcome> {
        match self.store.delete_collection(collection).await {
            Ok(()) => info!("Reset collection '{collection}'"),
            Err(RagError::CollectionNotFound(_)) => {
                debug!(collection, "no existing collection to reset")
            }
            Err(e) => warn!(collection, error = %e, "failed to delete collection"),
        }
        self.store.create_collection(collection).await?;

        let documents = load_documents(folder)?;
        if documents.is_empty() {
            info!("No documents found to ingest.");
            return Ok(IngestOutcome::NoDocuments);
        }

        let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
        let embeddings = self.embedder.embed_documents(&texts).await?;
        if embeddings.len() != documents.len() {
            return Err(RagError::embedding(
                self.embedder.name(),
                format!("expected {} embeddings, got {}", documents.len(), embeddings.len()),
            ));
        }

        let records: Vec<_> = documents
            .into_iter()
            .zip(embeddings)
            .map(|(doc, embedding)| doc.into_record(embedding))
            .collect();
        let count = records.len();
        self.store.add(collection, &records).await?;

        info!("Ingested {count} documents into collection '{collection}'.");
        Ok(IngestOutcome::Ingested { count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn discovers_only_top_level_text_files() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("nested")).unwrap();

        fs::write(root.join("b.txt"), "bee").unwrap();
        fs::write(root.join("a.txt"), "ay").unwrap();
        fs::write(root.join("notes.md"), "ignore").unwrap();
        fs::write(root.join("nested/c.txt"), "ignored too").unwrap();

        let files = discover_text_files(root).unwrap();
        let names: Vec<_> =
            files.iter().map(|p| p.file_name().unwrap().to_string_lossy().into_owned()).collect();
        assert_eq!(names, ["a.txt", "b.txt"]);
    }

    #[test]
    fn missing_folder_is_an_io_error() {
        let temp = tempfile::tempdir().unwrap();
        let err = load_documents(&temp.path().join("absent")).unwrap_err();
        assert!(matches!(err, RagError::Io { .. }));
    }

    #[test]
    fn non_utf8_file_is_an_io_error() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("bad.txt"), [0xff, 0xfe, 0x00]).unwrap();
        let err = load_documents(temp.path()).unwrap_err();
        match err {
            RagError::Io { path, .. } => assert!(path.ends_with("bad.txt")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
