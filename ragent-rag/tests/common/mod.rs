#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ragent_rag::{EmbeddingProvider, Result};

/// Counts occurrences of a fixed vocabulary, so nearest neighbours are
/// predictable without a model.
pub struct KeywordEmbedder {
    vocabulary: Vec<&'static str>,
    calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn new(vocabulary: &[&'static str]) -> Self {
        Self { vocabulary: vocabulary.to_vec(), calls: AtomicUsize::new(0) }
    }

    pub fn geography() -> Self {
        Self::new(&["paris", "france", "berlin", "germany", "capital", "water", "boils"])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let words: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();
        self.vocabulary
            .iter()
            .map(|term| words.iter().filter(|w| w == term).count() as f32)
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }
}

pub const PARIS: &str = "Paris is the capital of France.";
pub const BERLIN: &str = "Berlin is the capital of Germany.";
pub const WATER: &str = "Water boils at 100 degrees Celsius at sea level.";

/// Write the three geography facts into `dir`.
pub fn write_facts(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join("paris.txt"), PARIS).unwrap();
    std::fs::write(dir.join("berlin.txt"), BERLIN).unwrap();
    std::fs::write(dir.join("water.txt"), WATER).unwrap();
}
