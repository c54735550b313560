//! # ragent-model
//!
//! LLM backends for RAGent.
//!
//! ## Overview
//!
//! - [`OllamaModel`] - a local Ollama server, driven completion-style
//! - [`OpenAIChatClient`] - hosted chat models (`gpt-*`)
//! - [`OpenAICompletionClient`] - hosted legacy completion models
//! - [`MockLlm`] - canned replies for tests
//!
//! [`resolve_llm`] picks one of the real backends from
//! [`Settings`](ragent_core::Settings) so that callers only ever hold an
//! `Arc<dyn Llm>`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ragent_core::{Message, Settings};
//! use ragent_model::resolve_llm;
//!
//! let settings = Settings::from_env()?;
//! let llm = resolve_llm(&settings)?;
//! let reply = llm.invoke(&[Message::user("Hello")]).await?;
//! println!("{}", reply.text());
//! ```

mod http;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod select;

pub use mock::MockLlm;
pub use ollama::OllamaModel;
pub use openai::{OpenAIChatClient, OpenAICompletionClient, OpenAIConfig};
pub use select::{CHAT_MODEL_PREFIX, InvocationStyle, resolve_llm};
