//! # ragent-cli
//!
//! The `ragent` command: loads `.env`, resolves settings, ingests the chosen
//! knowledge base and answers questions interactively.
//!
//! ```text
//! $ ragent --backend ollama --model llama2
//! $ ragent --backend openai --model gpt-4o-mini
//! $ ragent --show-config
//! $ ragent --dump-store
//! ```

pub mod args;
pub mod console;
pub mod dotenv;
pub mod dump;
pub mod knowledge;
pub mod report;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use ragent_core::config::{DEFAULT_OLLAMA_MODEL, DEFAULT_OPENAI_MODEL};
use ragent_core::{LlmBackend, Settings};
use ragent_model::resolve_llm;
use ragent_rag::{IngestOutcome, RagPipeline, SqliteVectorStore, resolve_embedding_provider};
use tracing::{info, warn};

pub use args::{BackendArg, Cli};
use console::{LineSource, Terminal};
use knowledge::KnowledgeBase;

/// Apply command-line overrides on top of environment settings.
pub fn apply_cli(mut settings: Settings, cli: &Cli) -> Settings {
    if let Some(backend) = cli.backend {
        settings = settings.with_llm_backend(backend.into());
    }
    if let Some(model) = &cli.model {
        settings = settings.with_model(model.clone());
    }
    settings
}

/// Fill in the model name for the active backend, asking for the local one.
pub fn settle_model(settings: Settings, input: &mut dyn LineSource) -> Result<Settings> {
    if settings.active_model().is_some() {
        return Ok(settings);
    }
    let model = match settings.llm_backend {
        LlmBackend::Ollama => input
            .read_line("Ollama model name (e.g. llama2, mistral): ")?
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
        LlmBackend::OpenAi => DEFAULT_OPENAI_MODEL.to_string(),
    };
    Ok(settings.with_model(model))
}

/// Pick the knowledge base: fixed `facts` for the local backend, a menu of
/// `DATA_ROOT` sub-folders for the hosted one.
pub fn choose_knowledge_base(
    settings: &Settings,
    input: &mut dyn LineSource,
    out: &mut dyn Write,
) -> Result<KnowledgeBase> {
    let data_root = &settings.data_root;
    match settings.llm_backend {
        LlmBackend::Ollama => {
            Ok(KnowledgeBase::named(data_root, knowledge::DEFAULT_KNOWLEDGE_BASE))
        }
        LlmBackend::OpenAi => {
            let folders = knowledge::list_folders(data_root)?;
            knowledge::require_folders(data_root, &folders)?;
            let default = knowledge::default_index(&folders);

            write!(out, "{}", knowledge::render_menu(&folders))?;
            out.flush()?;
            let prompt = format!("Select folder for context [default: {}]: ", folders[default]);
            let line = input.read_line(&prompt)?.unwrap_or_default();
            let choice = knowledge::parse_selection(&line, folders.len(), default);
            Ok(KnowledgeBase::named(data_root, &folders[choice]))
        }
    }
}

/// Run the `ragent` command.
pub async fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let dotenv_path = dotenv::load_dotenv(&cwd).context("failed to parse .env")?;
    let _ = ragent_telemetry::init_telemetry("info");

    let settings = apply_cli(Settings::from_env()?, &cli);
    let mut stdout = std::io::stdout();

    if cli.show_config {
        write!(stdout, "{}", report::render_config(&settings, dotenv_path.as_deref()))?;
        return Ok(());
    }

    let store = Arc::new(SqliteVectorStore::open(&settings.vector_db_dir).await?);
    if cli.dump_store {
        return dump::dump_store(&*store, &mut stdout).await;
    }

    info!(backend = %settings.llm_backend, source = %settings.llm_backend_source, "using backend");
    if settings.llm_backend == LlmBackend::OpenAi {
        settings.require_openai_api_key()?;
    }

    let mut terminal = Terminal::new()?;
    let settings = settle_model(settings, &mut terminal)?;
    info!(
        backend = %settings.llm_backend,
        model = settings.active_model().unwrap_or_default(),
        "model selected"
    );

    let kb = choose_knowledge_base(&settings, &mut terminal, &mut stdout)?;
    writeln!(stdout, "Using knowledge base folder: {}", kb.folder.display())?;

    let llm = resolve_llm(&settings)?;
    let embedder = resolve_embedding_provider(&settings)?;
    let pipeline = RagPipeline::builder()
        .settings(&settings)?
        .embedding_provider(embedder)
        .vector_store(store)
        .llm(llm)
        .build()?;

    if pipeline.ingest_folder(&kb.folder, &kb.collection).await? == IngestOutcome::NoDocuments {
        warn!(
            folder = %kb.folder.display(),
            "knowledge base is empty; answers will have no context"
        );
    }

    console::run_console(&pipeline, &kb.collection, &mut terminal, &mut stdout).await
}
