//! Configuration for the RAG pipeline.

use ragent_core::Settings;
use ragent_core::config::DEFAULT_TOP_K;
use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Configuration parameters for the RAG pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RagConfig {
    /// Number of nearest documents retrieved per question.
    pub top_k: usize,
    /// Optional cap on the context length in characters. `None` passes the
    /// retrieved text through untouched.
    pub max_context_chars: Option<usize>,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { top_k: DEFAULT_TOP_K, max_context_chars: None }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }

    /// Take the retrieval parameters from already-validated settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self { top_k: settings.top_k, max_context_chars: settings.max_context_chars }
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the number of documents to retrieve.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Cap the context at `chars` characters.
    pub fn max_context_chars(mut self, chars: usize) -> Self {
        self.config.max_context_chars = Some(chars);
        self
    }

    /// Build the [`RagConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `top_k == 0`
    /// - `max_context_chars == Some(0)`
    pub fn build(self) -> Result<RagConfig> {
        if self.config.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        if self.config.max_context_chars == Some(0) {
            return Err(RagError::ConfigError(
                "max_context_chars must be greater than zero".to_string(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_retrieve_three_without_cap() {
        let config = RagConfig::default();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.max_context_chars, None);
    }

    #[test]
    fn builder_rejects_zero_values() {
        assert!(matches!(RagConfig::builder().top_k(0).build(), Err(RagError::ConfigError(_))));
        assert!(matches!(
            RagConfig::builder().max_context_chars(0).build(),
            Err(RagError::ConfigError(_))
        ));
        let config = RagConfig::builder().top_k(5).max_context_chars(100).build().unwrap();
        assert_eq!(config, RagConfig { top_k: 5, max_context_chars: Some(100) });
    }

    #[test]
    fn follows_settings() {
        let settings = Settings::builder().top_k(7).max_context_chars(42).build().unwrap();
        assert_eq!(
            RagConfig::from_settings(&settings),
            RagConfig { top_k: 7, max_context_chars: Some(42) }
        );
    }
}
