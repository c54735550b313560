//! Mock LLM for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use ragent_core::{Llm, LlmResponse, Message, Result};
use serde_json::json;

/// An [`Llm`] that replies with a fixed answer and records every prompt it
/// was given.
pub struct MockLlm {
    name: String,
    reply: String,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl MockLlm {
    pub fn new(reply: impl Into<String>) -> Self {
        Self { name: "mock".into(), reply: reply.into(), calls: Mutex::new(Vec::new()) }
    }

    /// Every prompt received so far, oldest first.
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// The most recent prompt, if any.
    pub fn last_call(&self) -> Option<Vec<Message>> {
        self.calls().pop()
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(messages.to_vec());
        }
        Ok(LlmResponse::new(Some(self.reply.clone()), json!({ "content": self.reply })))
    }
}
