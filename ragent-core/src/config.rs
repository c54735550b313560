//! Runtime settings, resolved once at startup and passed by reference.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{RagentError, Result};

/// Default endpoint of a local Ollama server.
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Default root of the OpenAI REST API.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Last-resort Ollama model name.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama2";

/// Hosted model used when neither the CLI nor `OPENAI_MODEL` names one.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

pub const DEFAULT_OPENAI_EMBEDDING_MODEL: &str = "text-embedding-3-small";

pub const DEFAULT_HF_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";

pub const DEFAULT_DATA_ROOT: &str = "data";

pub const DEFAULT_VECTOR_DB_DIR: &str = "vector_db";

/// Number of documents retrieved per question.
pub const DEFAULT_TOP_K: usize = 3;

/// Backend used for text generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LlmBackend {
    /// A local Ollama server.
    #[default]
    Ollama,
    /// The hosted OpenAI API.
    OpenAi,
}

impl LlmBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmBackend::Ollama => "ollama",
            LlmBackend::OpenAi => "openai",
        }
    }
}

impl FromStr for LlmBackend {
    type Err = RagentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(LlmBackend::Ollama),
            "openai" => Ok(LlmBackend::OpenAi),
            other => Err(RagentError::config(format!(
                "unknown LLM backend '{other}' (expected 'ollama' or 'openai')"
            ))),
        }
    }
}

impl fmt::Display for LlmBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend used to turn text into vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbeddingBackend {
    /// A local Ollama server.
    Ollama,
    /// The hosted OpenAI embeddings endpoint.
    OpenAi,
    /// An in-process sentence-embedding model.
    HuggingFace,
}

impl EmbeddingBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingBackend::Ollama => "ollama",
            EmbeddingBackend::OpenAi => "openai",
            EmbeddingBackend::HuggingFace => "hf",
        }
    }
}

impl From<LlmBackend> for EmbeddingBackend {
    fn from(backend: LlmBackend) -> Self {
        match backend {
            LlmBackend::Ollama => EmbeddingBackend::Ollama,
            LlmBackend::OpenAi => EmbeddingBackend::OpenAi,
        }
    }
}

impl FromStr for EmbeddingBackend {
    type Err = RagentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(EmbeddingBackend::Ollama),
            "openai" => Ok(EmbeddingBackend::OpenAi),
            "hf" => Ok(EmbeddingBackend::HuggingFace),
            other => Err(RagentError::config(format!(
                "unknown embedding backend '{other}' (expected 'ollama', 'openai' or 'hf')"
            ))),
        }
    }
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the effective LLM backend came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingSource {
    /// Set explicitly by the caller, e.g. a CLI flag.
    Override,
    /// Read from the process environment (including a loaded `.env`).
    Environment,
    #[default]
    Default,
}

impl fmt::Display for SettingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SettingSource::Override => "CLI argument",
            SettingSource::Environment => "environment variable or .env",
            SettingSource::Default => "default",
        })
    }
}

/// Every tunable of the assistant, in one place.
///
/// Build it with [`Settings::from_env`] (or [`Settings::builder`] in code and
/// tests), apply CLI overrides, then hand `&Settings` to each component.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub llm_backend: LlmBackend,
    pub llm_backend_source: SettingSource,
    /// Explicit embedding backend; `None` follows `llm_backend`.
    pub embedding_backend: Option<EmbeddingBackend>,
    pub ollama_base_url: String,
    pub ollama_model: Option<String>,
    pub ollama_embedding_model: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: Option<String>,
    pub openai_embedding_model: String,
    pub hf_embedding_model: String,
    /// Base folder holding one sub-folder per knowledge base.
    pub data_root: PathBuf,
    /// Directory of the persistent vector store.
    pub vector_db_dir: PathBuf,
    pub top_k: usize,
    /// Optional cap on the characters of retrieved context sent to the LLM.
    pub max_context_chars: Option<usize>,
    /// Replaces the built-in system prompt when set.
    pub system_prompt_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            llm_backend: LlmBackend::default(),
            llm_backend_source: SettingSource::Default,
            embedding_backend: None,
            ollama_base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            ollama_model: None,
            ollama_embedding_model: None,
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            openai_model: None,
            openai_embedding_model: DEFAULT_OPENAI_EMBEDDING_MODEL.to_string(),
            hf_embedding_model: DEFAULT_HF_EMBEDDING_MODEL.to_string(),
            data_root: PathBuf::from(DEFAULT_DATA_ROOT),
            vector_db_dir: PathBuf::from(DEFAULT_VECTOR_DB_DIR),
            top_k: DEFAULT_TOP_K,
            max_context_chars: None,
            system_prompt_file: None,
        }
    }
}

impl Settings {
    /// Create a new builder for constructing [`Settings`] in code.
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// Read settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`RagentError::Config`] for an unknown backend name or an
    /// unparsable number.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let (llm_backend, llm_backend_source) = match get("LLM_BACKEND") {
            Some(raw) => (raw.parse::<LlmBackend>()?, SettingSource::Environment),
            None => (LlmBackend::default(), SettingSource::Default),
        };
        let embedding_backend = get("EMBEDDING_BACKEND")
            .map(|raw| raw.parse::<EmbeddingBackend>())
            .transpose()?;

        let top_k = match get("RAG_TOP_K") {
            Some(raw) => parse_number("RAG_TOP_K", &raw)?,
            None => DEFAULT_TOP_K,
        };
        let max_context_chars = get("RAG_MAX_CONTEXT_CHARS")
            .map(|raw| parse_number("RAG_MAX_CONTEXT_CHARS", &raw))
            .transpose()?;

        let settings = Self {
            llm_backend,
            llm_backend_source,
            embedding_backend,
            ollama_base_url: get("OLLAMA_BASE_URL").unwrap_or(defaults.ollama_base_url),
            ollama_model: get("OLLAMA_MODEL"),
            ollama_embedding_model: get("OLLAMA_EMBEDDING_MODEL"),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            openai_model: get("OPENAI_MODEL"),
            openai_embedding_model: get("OPENAI_EMBEDDING_MODEL")
                .unwrap_or(defaults.openai_embedding_model),
            hf_embedding_model: get("HF_EMBEDDING_MODEL").unwrap_or(defaults.hf_embedding_model),
            data_root: get("DATA_ROOT").map(PathBuf::from).unwrap_or(defaults.data_root),
            vector_db_dir: get("VECTOR_DB_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.vector_db_dir),
            top_k,
            max_context_chars,
            system_prompt_file: get("SYSTEM_PROMPT_FILE").map(PathBuf::from),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Force the LLM backend, recording it as an explicit override.
    pub fn with_llm_backend(mut self, backend: LlmBackend) -> Self {
        self.llm_backend = backend;
        self.llm_backend_source = SettingSource::Override;
        self
    }

    /// Set the model name of the active LLM backend.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = Some(model.into());
        match self.llm_backend {
            LlmBackend::Ollama => self.ollama_model = model,
            LlmBackend::OpenAi => self.openai_model = model,
        }
        self
    }

    /// Model name of the active LLM backend, if one is configured.
    pub fn active_model(&self) -> Option<&str> {
        match self.llm_backend {
            LlmBackend::Ollama => self.ollama_model.as_deref(),
            LlmBackend::OpenAi => self.openai_model.as_deref(),
        }
    }

    /// The embedding backend in effect: the explicit setting, else the LLM backend.
    pub fn resolved_embedding_backend(&self) -> EmbeddingBackend {
        self.embedding_backend.unwrap_or_else(|| self.llm_backend.into())
    }

    /// Ollama embedding model: the embedding-specific name, then the general
    /// Ollama model, then [`DEFAULT_OLLAMA_MODEL`].
    pub fn resolved_ollama_embedding_model(&self) -> &str {
        self.ollama_embedding_model
            .as_deref()
            .or(self.ollama_model.as_deref())
            .unwrap_or(DEFAULT_OLLAMA_MODEL)
    }

    /// The hosted API key.
    ///
    /// # Errors
    ///
    /// Returns [`RagentError::Config`] when the key is unset or blank.
    pub fn require_openai_api_key(&self) -> Result<&str> {
        match self.openai_api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(RagentError::config(
                "OPENAI_API_KEY is not set. Please set it in your environment or .env file.",
            )),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(RagentError::config("top_k must be greater than zero"));
        }
        if self.max_context_chars == Some(0) {
            return Err(RagentError::config("max_context_chars must be greater than zero"));
        }
        Ok(())
    }
}

fn parse_number(key: &str, raw: &str) -> Result<usize> {
    raw.parse()
        .map_err(|_| RagentError::config(format!("{key} must be a positive integer, got '{raw}'")))
}

/// Builder for constructing validated [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    pub fn llm_backend(mut self, backend: LlmBackend) -> Self {
        self.settings.llm_backend = backend;
        self.settings.llm_backend_source = SettingSource::Override;
        self
    }

    pub fn embedding_backend(mut self, backend: EmbeddingBackend) -> Self {
        self.settings.embedding_backend = Some(backend);
        self
    }

    pub fn ollama_base_url(mut self, url: impl Into<String>) -> Self {
        self.settings.ollama_base_url = url.into();
        self
    }

    pub fn ollama_model(mut self, model: impl Into<String>) -> Self {
        self.settings.ollama_model = Some(model.into());
        self
    }

    pub fn ollama_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.settings.ollama_embedding_model = Some(model.into());
        self
    }

    pub fn openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.settings.openai_api_key = Some(key.into());
        self
    }

    pub fn openai_base_url(mut self, url: impl Into<String>) -> Self {
        self.settings.openai_base_url = url.into();
        self
    }

    pub fn openai_model(mut self, model: impl Into<String>) -> Self {
        self.settings.openai_model = Some(model.into());
        self
    }

    pub fn openai_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.settings.openai_embedding_model = model.into();
        self
    }

    pub fn hf_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.settings.hf_embedding_model = model.into();
        self
    }

    pub fn data_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings.data_root = path.into();
        self
    }

    pub fn vector_db_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings.vector_db_dir = path.into();
        self
    }

    pub fn top_k(mut self, k: usize) -> Self {
        self.settings.top_k = k;
        self
    }

    pub fn max_context_chars(mut self, chars: usize) -> Self {
        self.settings.max_context_chars = Some(chars);
        self
    }

    pub fn system_prompt_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings.system_prompt_file = Some(path.into());
        self
    }

    /// Build the [`Settings`].
    ///
    /// # Errors
    ///
    /// Returns [`RagentError::Config`] if `top_k` or `max_context_chars` is zero.
    pub fn build(self) -> Result<Settings> {
        self.settings.validate()?;
        Ok(self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.llm_backend, LlmBackend::Ollama);
        assert_eq!(settings.llm_backend_source, SettingSource::Default);
        assert_eq!(settings.resolved_embedding_backend(), EmbeddingBackend::Ollama);
        assert_eq!(settings.resolved_ollama_embedding_model(), "llama2");
        assert_eq!(settings.top_k, 3);
    }

    #[test]
    fn embedding_backend_follows_llm_backend() {
        let settings = Settings::from_lookup(lookup(&[("LLM_BACKEND", "openai")])).unwrap();
        assert_eq!(settings.llm_backend_source, SettingSource::Environment);
        assert_eq!(settings.resolved_embedding_backend(), EmbeddingBackend::OpenAi);
    }

    #[test]
    fn explicit_embedding_backend_wins() {
        let settings = Settings::from_lookup(lookup(&[
            ("LLM_BACKEND", "openai"),
            ("EMBEDDING_BACKEND", "hf"),
        ]))
        .unwrap();
        assert_eq!(settings.resolved_embedding_backend(), EmbeddingBackend::HuggingFace);
    }

    #[test]
    fn ollama_embedding_model_fallback_chain() {
        let only_general = Settings::from_lookup(lookup(&[("OLLAMA_MODEL", "mistral")])).unwrap();
        assert_eq!(only_general.resolved_ollama_embedding_model(), "mistral");

        let both = Settings::from_lookup(lookup(&[
            ("OLLAMA_MODEL", "mistral"),
            ("OLLAMA_EMBEDDING_MODEL", "nomic-embed-text"),
        ]))
        .unwrap();
        assert_eq!(both.resolved_ollama_embedding_model(), "nomic-embed-text");
    }

    #[test]
    fn unknown_backends_are_rejected() {
        let err = Settings::from_lookup(lookup(&[("LLM_BACKEND", "llamafile")])).unwrap_err();
        assert!(matches!(err, RagentError::Config(ref msg) if msg.contains("llamafile")));

        let err = Settings::from_lookup(lookup(&[("EMBEDDING_BACKEND", "cohere")])).unwrap_err();
        assert!(matches!(err, RagentError::Config(_)));
    }

    #[test]
    fn blank_api_key_counts_as_unset() {
        let settings = Settings::from_lookup(lookup(&[("OPENAI_API_KEY", "   ")])).unwrap();
        assert!(settings.openai_api_key.is_none());
        assert!(settings.require_openai_api_key().is_err());

        let settings = Settings::builder().openai_api_key("").build().unwrap();
        assert!(settings.require_openai_api_key().is_err());

        let settings = Settings::builder().openai_api_key("sk-test").build().unwrap();
        assert_eq!(settings.require_openai_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn overrides_apply_to_the_active_backend() {
        let settings = Settings::from_lookup(lookup(&[("OPENAI_MODEL", "gpt-4o-mini")]))
            .unwrap()
            .with_llm_backend(LlmBackend::OpenAi);
        assert_eq!(settings.llm_backend_source, SettingSource::Override);
        assert_eq!(settings.active_model(), Some("gpt-4o-mini"));

        let settings = settings.with_model("davinci-002");
        assert_eq!(settings.openai_model.as_deref(), Some("davinci-002"));
        assert!(settings.ollama_model.is_none());
    }

    #[test]
    fn numeric_settings_are_validated() {
        assert!(Settings::from_lookup(lookup(&[("RAG_TOP_K", "five")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("RAG_TOP_K", "0")])).is_err());
        assert!(Settings::builder().max_context_chars(0).build().is_err());

        let settings = Settings::from_lookup(lookup(&[
            ("RAG_TOP_K", "5"),
            ("RAG_MAX_CONTEXT_CHARS", "2000"),
        ]))
        .unwrap();
        assert_eq!(settings.top_k, 5);
        assert_eq!(settings.max_context_chars, Some(2000));
    }

    #[test]
    fn backend_names_round_trip_through_display() {
        for backend in [LlmBackend::Ollama, LlmBackend::OpenAi] {
            assert_eq!(backend.to_string().parse::<LlmBackend>().unwrap(), backend);
        }
        for backend in
            [EmbeddingBackend::Ollama, EmbeddingBackend::OpenAi, EmbeddingBackend::HuggingFace]
        {
            assert_eq!(backend.to_string().parse::<EmbeddingBackend>().unwrap(), backend);
        }
    }
}
