//! Backend clients. Both share the request path in [`post_json`].

pub mod ollama_service;
pub mod open_ai_service;

use std::time::Instant;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::error_handler::{
    HttpError, Provider, ProviderError, ProviderErrorKind, Result, make_snippet,
};

/// POSTs `body` as JSON and decodes a successful answer into `R`.
///
/// Non-2xx answers become `HttpStatus` with a short body snippet; an
/// undecodable payload becomes `Decode` with `expected` appended.
pub(crate) async fn post_json<B, R>(
    client: &reqwest::Client,
    provider: Provider,
    url: &str,
    body: &B,
    expected: &str,
) -> Result<R>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let started = Instant::now();
    debug!(%provider, "POST {url}");
    let resp = client.post(url).json(body).send().await?;

    let status = resp.status();
    if !status.is_success() {
        let snippet = make_snippet(&resp.text().await.unwrap_or_default());
        error!(
            %provider,
            %status,
            %url,
            %snippet,
            latency_ms = started.elapsed().as_millis(),
            "non-success status"
        );
        let http = HttpError {
            status,
            url: url.to_string(),
            snippet,
        };
        return Err(ProviderError::new(provider, ProviderErrorKind::HttpStatus(http)).into());
    }

    resp.json::<R>().await.map_err(|e| {
        ProviderError::new(
            provider,
            ProviderErrorKind::Decode(format!("serde error: {e}; {expected}")),
        )
        .into()
    })
}
