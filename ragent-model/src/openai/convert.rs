//! Request bodies and response extraction for the OpenAI REST API.

use ragent_core::Message;
use serde::Serialize;
use serde_json::Value;

/// Token budget for legacy completions; the API default of 16 truncates answers.
pub(crate) const COMPLETION_MAX_TOKENS: u32 = 256;

#[derive(Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Serialize)]
pub(crate) struct CompletionRequest<'a> {
    pub model: &'a str,
    pub prompt: String,
    pub max_tokens: u32,
}

pub(crate) fn to_chat_messages(messages: &[Message]) -> Vec<ChatMessage<'_>> {
    messages.iter().map(|m| ChatMessage { role: m.role.as_str(), content: &m.content }).collect()
}

/// `choices[0].message.content` of a chat completion.
pub(crate) fn chat_content(raw: &Value) -> Option<String> {
    raw.pointer("/choices/0/message/content").and_then(Value::as_str).map(str::to_string)
}

/// `choices[0].text` of a legacy completion.
pub(crate) fn completion_text(raw: &Value) -> Option<String> {
    raw.pointer("/choices/0/text").and_then(Value::as_str).map(str::to_string)
}
