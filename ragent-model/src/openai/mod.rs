//! OpenAI backends.
//!
//! Two invocation styles share one configuration:
//!
//! | Style | Endpoint | Used for |
//! |-------|----------|----------|
//! | chat | `/chat/completions` | names starting with `gpt-` (`gpt-4o`, `gpt-3.5-turbo`) |
//! | completion | `/completions` | everything else (`davinci-002`, `babbage-002`) |
//!
//! # Example
//!
//! ```rust,ignore
//! use ragent_model::openai::{OpenAIChatClient, OpenAIConfig};
//!
//! let model = OpenAIChatClient::new(OpenAIConfig::new(
//!     std::env::var("OPENAI_API_KEY").unwrap(),
//!     "gpt-4o-mini",
//! )?)?;
//! ```

mod client;
mod config;
mod convert;

pub use client::{OpenAIChatClient, OpenAICompletionClient};
pub use config::OpenAIConfig;
