//! Provider-agnostic entry point used by callers that only need a completion.
//!
//! [`LlmService`] is built once from an [`LlmModelConfig`] and dispatches to
//! the matching backend client.

use tracing::info;

use crate::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
use crate::error_handler::{ConfigError, Result};
use crate::services::{ollama_service::OllamaService, open_ai_service::OpenAiService};

/// A ready-to-use completion client for one configured model.
#[derive(Debug)]
pub enum LlmService {
    Ollama(OllamaService),
    OpenAI(OpenAiService),
}

impl LlmService {
    /// Builds the backend client selected by `cfg.provider`.
    pub fn from_config(cfg: LlmModelConfig) -> Result<Self> {
        if cfg.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }

        info!(provider = ?cfg.provider, model = %cfg.model, "LLM service configured");
        match cfg.provider {
            LlmProvider::Ollama => Ok(Self::Ollama(OllamaService::new(cfg)?)),
            LlmProvider::OpenAI => Ok(Self::OpenAI(OpenAiService::new(cfg)?)),
        }
    }

    /// Single non-streaming completion; the answer is trimmed and may be empty.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        match self {
            Self::Ollama(svc) => svc.generate(prompt).await,
            Self::OpenAI(svc) => svc.generate(prompt).await,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Self::Ollama(svc) => svc.model(),
            Self::OpenAI(svc) => svc.model(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::AiLlmError;

    fn cfg(provider: LlmProvider, model: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider,
            model: model.into(),
            endpoint: "http://localhost:11434".into(),
            api_key: Some("k".into()),
            system_prompt: None,
            max_tokens: Some(16),
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(1),
        }
    }

    #[test]
    fn dispatches_on_provider() {
        let svc = LlmService::from_config(cfg(LlmProvider::Ollama, "m1")).unwrap();
        assert!(matches!(svc, LlmService::Ollama(_)));
        assert_eq!(svc.model(), "m1");

        let svc = LlmService::from_config(cfg(LlmProvider::OpenAI, "m2")).unwrap();
        assert!(matches!(svc, LlmService::OpenAI(_)));
    }

    #[test]
    fn empty_model_is_config_error() {
        assert!(matches!(
            LlmService::from_config(cfg(LlmProvider::Ollama, "  ")),
            Err(AiLlmError::Config(ConfigError::EmptyModel))
        ));
    }
}
