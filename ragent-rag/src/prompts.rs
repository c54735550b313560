//! Prompt templates and prompt assembly.

use std::path::Path;

use ragent_core::Message;

use crate::error::{RagError, Result};

/// Built-in system prompt: answer from the supplied context only.
pub const STRICT_CONTEXT_PROMPT: &str = "\
You are a question-answering assistant for a private knowledge base.
Answer the question using only the information in the provided context.
If the context does not contain the answer, reply that you don't know.
Do not use prior knowledge and do not make up facts.
Keep the answer short and direct.";

/// Read a system prompt from `path`, trimming surrounding whitespace.
///
/// # Errors
///
/// Returns [`RagError::Io`] if the file cannot be read and
/// [`RagError::ConfigError`] if it is blank.
pub fn load_system_prompt(path: &Path) -> Result<String> {
    let prompt = std::fs::read_to_string(path).map_err(|e| RagError::io(path, e))?;
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(RagError::ConfigError(format!(
            "system prompt file {} is empty",
            path.display()
        )));
    }
    Ok(prompt.to_string())
}

/// The user turn: context block followed by the question.
pub fn user_prompt(context: &str, question: &str) -> String {
    format!("Context:\n{context}\n\nQuestion: {question}\nAnswer:")
}

/// The two-message prompt sent to the LLM.
pub fn build_messages(system_prompt: &str, context: &str, question: &str) -> Vec<Message> {
    vec![Message::system(system_prompt.trim()), Message::user(user_prompt(context, question))]
}

/// Cut `text` to at most `max_chars` characters without splitting a character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
