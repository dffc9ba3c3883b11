//! Ollama client for non-streaming text generation.
//!
//! `POST {endpoint}/api/generate` with `stream=false`. The system prompt from
//! [`LlmModelConfig`] is sent in the `system` field, generation knobs go into
//! `options`.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::post_json;
use crate::config::default_config::DEFAULT_TIMEOUT_SECS;
use crate::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
use crate::error_handler::{Provider, ProviderError, ProviderErrorKind, Result};

/// Thin client for a local Ollama daemon.
#[derive(Debug)]
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_generate: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - `InvalidProvider` if `cfg.provider` is not Ollama
    /// - `InvalidEndpoint` if `cfg.endpoint` is empty or not http(s)
    /// - [`crate::error_handler::AiLlmError::HttpTransport`] if the client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        if cfg.provider != LlmProvider::Ollama {
            return Err(
                ProviderError::new(Provider::Ollama, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        let endpoint = cfg.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        let url_generate = format!("{}/api/generate", endpoint.trim_end_matches('/'));

        debug!(model = %cfg.model, endpoint = %cfg.endpoint, "OllamaService initialized");
        Ok(Self {
            client,
            cfg,
            url_generate,
        })
    }

    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Performs a **non-streaming** generation request and returns the
    /// trimmed completion text. A blank answer comes back as an empty string.
    ///
    /// Mapped options:
    /// - `system`      ← `cfg.system_prompt`
    /// - `num_predict` ← `cfg.max_tokens`
    /// - `temperature` ← `cfg.temperature`
    /// - `top_p`       ← `cfg.top_p`
    #[instrument(skip_all, fields(model = %self.cfg.model, prompt_len = prompt.len()))]
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let started = Instant::now();
        let body = GenerateRequest::from_cfg(&self.cfg, prompt);

        let out: GenerateResponse = post_json(
            &self.client,
            Provider::Ollama,
            &self.url_generate,
            &body,
            "ensure `stream=false` is used",
        )
        .await?;

        let text = out.response.trim();
        if text.is_empty() {
            warn!("model returned a blank answer");
        }

        info!(
            latency_ms = started.elapsed().as_millis(),
            answer_len = text.len(),
            "generation completed"
        );
        Ok(text.to_string())
    }
}

/// Request body for `/api/generate` (non-streaming).
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    options: GenerateOptions,
}

impl<'a> GenerateRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str) -> Self {
        Self {
            model: &cfg.model,
            prompt,
            system: cfg.system_prompt.as_deref(),
            stream: false,
            options: GenerateOptions {
                temperature: cfg.temperature,
                top_p: cfg.top_p,
                num_predict: cfg.max_tokens,
            },
        }
    }
}

/// Subset of Ollama `options`.
#[derive(Debug, Default, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::AiLlmError;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn cfg(endpoint: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "qwen2.5-coder:14b".into(),
            endpoint: endpoint.into(),
            api_key: None,
            system_prompt: Some("be brief".into()),
            max_tokens: Some(2048),
            temperature: Some(0.4),
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn rejects_foreign_provider_and_bad_endpoint() {
        let mut c = cfg("http://localhost:11434");
        c.provider = LlmProvider::OpenAI;
        assert!(matches!(
            OllamaService::new(c),
            Err(AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::InvalidProvider,
                ..
            }))
        ));
        assert!(matches!(
            OllamaService::new(cfg("localhost:11434")),
            Err(AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::InvalidEndpoint(_),
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn generate_sends_options_and_trims_answer() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_body(Matcher::PartialJson(json!({
                "model": "qwen2.5-coder:14b",
                "system": "be brief",
                "stream": false,
                "options": { "num_predict": 2048, "temperature": 0.4 }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "response": "\n  Looks good.  \n", "done": true }).to_string())
            .create_async()
            .await;

        let svc = OllamaService::new(cfg(&format!("{}/", server.url()))).unwrap();
        let out = svc.generate("review this").await.unwrap();

        mock.assert_async().await;
        assert_eq!(out, "Looks good.");
    }

    #[tokio::test]
    async fn non_success_status_carries_snippet() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/api/generate")
            .with_status(404)
            .with_body("model 'qwen2.5-coder:14b' not found")
            .create_async()
            .await;

        let svc = OllamaService::new(cfg(&server.url())).unwrap();
        let err = svc.generate("x").await.unwrap_err();
        match err {
            AiLlmError::Provider(ProviderError {
                provider: Provider::Ollama,
                kind: ProviderErrorKind::HttpStatus(h),
            }) => {
                assert_eq!(h.status.as_u16(), 404);
                assert!(h.snippet.contains("not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn blank_answer_is_returned_as_empty_text() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_body(json!({ "response": "  \n " }).to_string())
            .create_async()
            .await;

        let svc = OllamaService::new(cfg(&server.url())).unwrap();
        assert_eq!(svc.generate("x").await.unwrap(), "");
    }
}
