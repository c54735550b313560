//! Resolve the configured embedding backend once at startup.

use std::sync::Arc;

use ragent_core::{EmbeddingBackend, Settings};
use tracing::info;

use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::ollama::OllamaEmbeddingProvider;
use crate::openai::OpenAIEmbeddingProvider;

/// Build the embedding provider named by `EMBEDDING_BACKEND`, falling back
/// to the LLM backend.
///
/// # Errors
///
/// Configuration errors (missing API key, unsupported local model, `hf`
/// without the `local-embeddings` feature) are returned before any network
/// call.
pub fn resolve_embedding_provider(settings: &Settings) -> Result<Arc<dyn EmbeddingProvider>> {
    let backend = settings.resolved_embedding_backend();
    match backend {
        EmbeddingBackend::Ollama => {
            let model = settings.resolved_ollama_embedding_model();
            info!(backend = %backend, model, "using embedding backend");
            Ok(Arc::new(OllamaEmbeddingProvider::new(&settings.ollama_base_url, model)))
        }
        EmbeddingBackend::OpenAi => {
            let provider = OpenAIEmbeddingProvider::from_settings(settings)?;
            info!(backend = %backend, model = provider.model(), "using embedding backend");
            Ok(Arc::new(provider))
        }
        EmbeddingBackend::HuggingFace => local_provider(settings),
    }
}

#[cfg(feature = "local-embeddings")]
fn local_provider(settings: &Settings) -> Result<Arc<dyn EmbeddingProvider>> {
    let provider = crate::local::LocalEmbeddingProvider::new(&settings.hf_embedding_model)?;
    info!(backend = "hf", model = provider.model_name(), "using embedding backend");
    Ok(Arc::new(provider))
}

#[cfg(not(feature = "local-embeddings"))]
fn local_provider(_settings: &Settings) -> Result<Arc<dyn EmbeddingProvider>> {
    Err(crate::error::RagError::ConfigError(
        "EMBEDDING_BACKEND=hf requires building with the `local-embeddings` feature".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragent_core::LlmBackend;

    #[test]
    fn embedding_backend_follows_llm_backend() {
        let provider = resolve_embedding_provider(&Settings::default()).unwrap();
        assert_eq!(provider.name(), "Ollama");

        let hosted = Settings::builder()
            .llm_backend(LlmBackend::OpenAi)
            .openai_api_key("sk-test")
            .build()
            .unwrap();
        assert_eq!(resolve_embedding_provider(&hosted).unwrap().name(), "OpenAI");
    }

    #[test]
    fn explicit_embedding_backend_wins() {
        let settings = Settings::builder()
            .llm_backend(LlmBackend::OpenAi)
            .embedding_backend(EmbeddingBackend::Ollama)
            .build()
            .unwrap();
        assert_eq!(resolve_embedding_provider(&settings).unwrap().name(), "Ollama");
    }

    #[test]
    fn hosted_embeddings_without_key_fail_fast() {
        let settings =
            Settings::builder().embedding_backend(EmbeddingBackend::OpenAi).build().unwrap();
        let err = resolve_embedding_provider(&settings).err().unwrap();
        assert!(err.is_config());
    }

    #[cfg(not(feature = "local-embeddings"))]
    #[test]
    fn local_backend_needs_the_feature() {
        let settings =
            Settings::builder().embedding_backend(EmbeddingBackend::HuggingFace).build().unwrap();
        assert!(resolve_embedding_provider(&settings).err().unwrap().is_config());
    }
}
