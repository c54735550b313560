//! JSON-over-HTTP plumbing shared by the backends.

use ragent_core::http::api_error_detail;
use ragent_core::{RagentError, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::error;

/// POST `body` as JSON to `url` and return the decoded response body.
///
/// Non-2xx statuses become [`RagentError::Model`] carrying the API's own
/// error message when the body has the usual `{"error": ...}` shape.
pub(crate) async fn post_json<B: Serialize + ?Sized>(
    client: &reqwest::Client,
    provider: &str,
    url: &str,
    bearer: Option<&str>,
    body: &B,
) -> Result<Value> {
    let mut request = client.post(url).json(body);
    if let Some(token) = bearer {
        request = request.bearer_auth(token);
    }

    let response = request.send().await.map_err(|e| {
        error!(provider, error = %e, "request failed");
        RagentError::model(provider, format!("request failed: {e}"))
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let detail = api_error_detail(&body).unwrap_or(body);
        error!(provider, %status, "API error");
        return Err(RagentError::model(provider, format!("API returned {status}: {detail}")));
    }

    response.json::<Value>().await.map_err(|e| {
        error!(provider, error = %e, "failed to parse response");
        RagentError::model(provider, format!("failed to parse response: {e}"))
    })
}
