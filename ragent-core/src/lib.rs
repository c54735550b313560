//! # ragent-core
//!
//! Types shared by every RAGent crate:
//!
//! - [`Settings`] - the configuration value object, resolved once from the
//!   environment and passed by reference to each component
//! - [`LlmBackend`] / [`EmbeddingBackend`] - tagged backend selectors
//! - [`Message`] / [`Role`] - role-tagged prompt turns
//! - [`Llm`] - the capability trait implemented by every generation backend
//! - [`RagentError`] - configuration and model errors

pub mod config;
pub mod error;
pub mod http;
pub mod llm;
pub mod message;

pub use config::{EmbeddingBackend, LlmBackend, SettingSource, Settings, SettingsBuilder};
pub use error::{RagentError, Result};
pub use llm::{Llm, LlmResponse};
pub use message::{Message, Role, flatten_messages};
