//! LLM config loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`          = `ollama` (default) or `openai`
//! - `LLM_SYSTEM_PROMPT` = optional system instruction
//! - `LLM_MAX_TOKENS`    = max tokens to generate (default 2048)
//! - `LLM_TEMPERATURE`   = sampling temperature, `0.0..=2.0` (default 0.4)
//! - `LLM_TOP_P`         = optional nucleus sampling, `0.0..=1.0`
//! - `LLM_TIMEOUT_SECS`  = request timeout (default 600)
//!
//! Ollama:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`                = model (mandatory)
//!
//! OpenAI-compatible:
//! - `OPENAI_URL`     = endpoint (default `https://api.openai.com`)
//! - `OPENAI_API_KEY` = API key (mandatory)
//! - `OPENAI_MODEL`   = model (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt, env_opt_f32, env_opt_u32, env_opt_u64, must_env,
        validate_http_endpoint, validate_range_f32,
    },
};

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an experienced software engineer doing a careful code review.";
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const DEFAULT_TEMPERATURE: f32 = 0.4;
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;
const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

/// Builds the generation config for the provider selected by `LLM_KIND`.
pub fn config_from_env() -> Result<LlmModelConfig, AiLlmError> {
    let provider = match env_opt("LLM_KIND") {
        Some(kind) => kind
            .parse::<LlmProvider>()
            .map_err(ConfigError::UnsupportedProvider)?,
        None => LlmProvider::Ollama,
    };

    match provider {
        LlmProvider::Ollama => config_ollama(),
        LlmProvider::OpenAI => config_openai(),
    }
}

/// Resolves the Ollama endpoint strictly from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Some(url) = env_opt("OLLAMA_URL") {
        validate_http_endpoint("OLLAMA_URL", &url)?;
        return Ok(url);
    }
    if let Some(port) = env_opt("OLLAMA_PORT") {
        let _ = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{}", port.trim()));
    }
    Err(AiLlmError::Config(ConfigError::MissingVar(
        "OLLAMA_URL or OLLAMA_PORT",
    )))
}

/// Config for a local Ollama model.
pub fn config_ollama() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = ollama_endpoint()?;
    let model = must_env("OLLAMA_MODEL")?;
    with_generation_env(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        system_prompt: None,
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: None,
    })
}

/// Config for an OpenAI-compatible chat completions endpoint.
pub fn config_openai() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = env_opt("OPENAI_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string());
    validate_http_endpoint("OPENAI_URL", &endpoint)?;
    let api_key = must_env("OPENAI_API_KEY")?;
    let model = must_env("OPENAI_MODEL")?;
    with_generation_env(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model,
        endpoint,
        api_key: Some(api_key),
        system_prompt: None,
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: None,
    })
}

/// Fills the provider-independent generation knobs.
fn with_generation_env(mut cfg: LlmModelConfig) -> Result<LlmModelConfig, AiLlmError> {
    let temperature = env_opt_f32("LLM_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("temperature", temperature, 0.0, 2.0)?;
    let top_p = env_opt_f32("LLM_TOP_P")?;
    if let Some(p) = top_p {
        validate_range_f32("top_p", p, 0.0, 1.0)?;
    }

    cfg.system_prompt =
        Some(env_opt("LLM_SYSTEM_PROMPT").unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()));
    cfg.max_tokens = Some(env_opt_u32("LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS));
    cfg.temperature = Some(temperature);
    cfg.top_p = top_p;
    cfg.timeout_secs = Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS));
    Ok(cfg)
}
