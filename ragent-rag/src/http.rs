//! JSON-over-HTTP plumbing for the remote embedding providers.

use ragent_core::http::api_error_detail;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::error;

use crate::error::{RagError, Result};

/// POST `body` to `url` and decode the response as `R`.
pub(crate) async fn post_json<B, R>(
    client: &reqwest::Client,
    provider: &str,
    url: &str,
    bearer: Option<&str>,
    body: &B,
) -> Result<R>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let mut request = client.post(url).json(body);
    if let Some(token) = bearer {
        request = request.bearer_auth(token);
    }

    let response = request.send().await.map_err(|e| {
        error!(provider, error = %e, "request failed");
        RagError::embedding(provider, format!("request failed: {e}"))
    })?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = api_error_detail(&body).unwrap_or(body);

        error!(provider, %status, "API error");
        return Err(RagError::embedding(provider, format!("API returned {status}: {detail}")));
    }

    response.json::<R>().await.map_err(|e| {
        error!(provider, error = %e, "failed to parse response");
        RagError::embedding(provider, format!("failed to parse response: {e}"))
    })
}
