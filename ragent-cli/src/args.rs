//! CLI argument parsing using clap.

use clap::{Parser, ValueEnum};
use ragent_core::LlmBackend;

/// Ask questions about a folder of text files.
///
/// Documents are ingested into a local vector store on every start, then
/// each question is answered from the closest documents.
#[derive(Debug, Parser)]
#[command(name = "ragent", version, about)]
pub struct Cli {
    /// LLM backend to use (overrides LLM_BACKEND)
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,

    /// Model name for the backend (e.g. llama2, gpt-4o)
    #[arg(long)]
    pub model: Option<String>,

    /// Show effective config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Print every stored collection and document, then exit
    #[arg(long)]
    pub dump_store: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Ollama,
    Openai,
}

impl From<BackendArg> for LlmBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Ollama => LlmBackend::Ollama,
            BackendArg::Openai => LlmBackend::OpenAi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_and_model() {
        let cli = Cli::try_parse_from(["ragent", "--backend", "openai", "--model", "davinci-002"])
            .unwrap();
        assert_eq!(cli.backend, Some(BackendArg::Openai));
        assert_eq!(cli.model.as_deref(), Some("davinci-002"));
        assert!(!cli.show_config);
        assert_eq!(LlmBackend::from(cli.backend.unwrap()), LlmBackend::OpenAi);
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["ragent", "--backend", "anthropic"]).is_err());
    }

    #[test]
    fn flags_default_off() {
        let cli = Cli::try_parse_from(["ragent", "--show-config"]).unwrap();
        assert!(cli.show_config);
        assert!(!cli.dump_store);
        assert_eq!(cli.backend, None);
    }
}
