//! Error types shared across the RAGent crates.

use thiserror::Error;

/// Errors raised while resolving configuration or talking to an LLM backend.
#[derive(Debug, Error)]
pub enum RagentError {
    /// A configuration value is missing or invalid.
    ///
    /// Always reported before any remote call is attempted.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An LLM backend call failed.
    #[error("Model error ({provider}): {message}")]
    Model {
        /// The backend that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },
}

impl RagentError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Build a [`RagentError::Model`] for the given provider.
    pub fn model(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Model { provider: provider.into(), message: message.into() }
    }
}

/// A convenience result type for RAGent operations.
pub type Result<T> = std::result::Result<T, RagentError>;
