//! `--show-config` output.

use std::fmt::Write as _;
use std::path::Path;

use ragent_core::Settings;

const NOT_SET: &str = "not set";

/// Render the effective configuration. The API key value is never printed.
pub fn render_config(settings: &Settings, dotenv: Option<&Path>) -> String {
    let model = settings
        .active_model()
        .or(settings.ollama_model.as_deref())
        .or(settings.openai_model.as_deref())
        .unwrap_or(NOT_SET);
    let key = if settings.require_openai_api_key().is_ok() { "set" } else { "NOT SET" };

    let mut out = String::new();
    let _ = writeln!(out, "--- Effective Configuration ---");
    let _ = writeln!(
        out,
        "Backend: {} (source: {})",
        settings.llm_backend, settings.llm_backend_source
    );
    let _ = writeln!(out, "Model: {model}");
    let _ = writeln!(out, "Embedding backend: {}", settings.resolved_embedding_backend());
    let _ = writeln!(out, "OLLAMA_MODEL: {}", settings.ollama_model.as_deref().unwrap_or(NOT_SET));
    let _ = writeln!(out, "OPENAI_MODEL: {}", settings.openai_model.as_deref().unwrap_or(NOT_SET));
    let _ = writeln!(out, "OPENAI_API_KEY: {key}");
    let _ = writeln!(out, "DATA_ROOT: {}", settings.data_root.display());
    let _ = writeln!(out, "VECTOR_DB_DIR: {}", settings.vector_db_dir.display());
    let _ = writeln!(out, "RAG_TOP_K: {}", settings.top_k);
    match dotenv {
        Some(path) => {
            let _ = writeln!(out, ".env loaded from: {}", path.display());
        }
        None => {
            let _ = writeln!(out, ".env loaded from: not found");
        }
    }
    out
}
