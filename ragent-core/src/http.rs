//! Helpers shared by the HTTP backends in `ragent-model` and `ragent-rag`.

use serde_json::Value;

/// Join a base URL and a path without doubling or dropping the slash.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Extract the human-readable message from an API error body.
///
/// OpenAI nests it (`{"error": {"message": ..}}`), Ollama does not
/// (`{"error": ".."}`).
pub fn api_error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        Value::String(message) => Some(message.clone()),
        nested => nested.get("message")?.as_str().map(str::to_string),
    }
}
