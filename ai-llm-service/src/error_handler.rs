//! Errors of `ai-llm-service` and the env helpers that produce them.
//!
//! [`AiLlmError`] is the only error type crossing the crate boundary. Startup
//! problems land in [`ConfigError`], upstream failures in [`ProviderError`]
//! tagged with the backend that produced them.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AiLlmError>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Backend answered, but not with a usable completion.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Connect, TLS or timeout failure before any answer arrived.
    #[error("[AI LLM Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("[AI LLM Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    /// `LLM_KIND` names no known backend.
    #[error("[AI LLM Service] unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        var: &'static str,
        reason: &'static str,
    },

    #[error("[AI LLM Service] {field} is out of range: {detail}")]
    OutOfRange {
        field: &'static str,
        detail: &'static str,
    },

    #[error("[AI LLM Service] model name must not be empty")]
    EmptyModel,
}

/// Backend that produced a [`ProviderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Ollama,
    OpenAI,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Provider::Ollama => "ollama",
            Provider::OpenAI => "openai",
        })
    }
}

/// Non-2xx answer. `snippet` is a bounded prefix of the body.
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub url: String,
    pub snippet: String,
}

#[derive(Debug, Error)]
#[error("[AI LLM Service] {provider}: {kind}")]
pub struct ProviderError {
    pub provider: Provider,
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(provider: Provider, kind: ProviderErrorKind) -> Self {
        Self { provider, kind }
    }
}

#[derive(Debug, Error)]
pub enum ProviderErrorKind {
    /// Config was built for the other backend.
    #[error("invalid provider for this service")]
    InvalidProvider,

    #[error("missing api key")]
    MissingApiKey,

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("HTTP {} from {}: {}", .0.status, .0.url, .0.snippet)]
    HttpStatus(HttpError),

    #[error("decode error: {0}")]
    Decode(String),

    /// Answer carried no completion at all.
    #[error("empty completion")]
    EmptyResponse,
}

const SNIPPET_CHARS: usize = 240;

/// Bounded, trimmed prefix of an error body, safe to log.
pub fn make_snippet(body: &str) -> String {
    body.trim().chars().take(SNIPPET_CHARS).collect()
}

/// Required variable; blank counts as missing.
pub fn must_env(name: &'static str) -> Result<String> {
    env_opt(name).ok_or_else(|| ConfigError::MissingVar(name).into())
}

/// Optional variable; blank counts as unset.
pub fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

pub fn env_opt_u32(name: &'static str) -> Result<Option<u32>> {
    parse_opt(name, "expected u32")
}

pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    parse_opt(name, "expected u64")
}

pub fn env_opt_f32(name: &'static str) -> Result<Option<f32>> {
    parse_opt(name, "expected floating point number")
}

fn parse_opt<T: std::str::FromStr>(name: &'static str, reason: &'static str) -> Result<Option<T>> {
    env_opt(name)
        .map(|v| v.trim().parse::<T>())
        .transpose()
        .map_err(|_| ConfigError::InvalidNumber { var: name, reason }.into())
}

pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        return Ok(());
    }
    Err(ConfigError::InvalidFormat {
        var,
        reason: "must start with http:// or https://",
    }
    .into())
}

/// Inclusive range check; NaN and infinities are rejected.
pub fn validate_range_f32(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        return Ok(());
    }
    Err(ConfigError::OutOfRange {
        field,
        detail: "expected value in inclusive range",
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_is_trimmed_and_bounded() {
        let long = format!("  {}  ", "x".repeat(1000));
        let s = make_snippet(&long);
        assert_eq!(s.len(), SNIPPET_CHARS);
        assert!(s.starts_with('x'));
    }

    #[test]
    fn endpoint_and_range_validation() {
        assert!(validate_http_endpoint("X", "http://localhost:11434").is_ok());
        assert!(validate_http_endpoint("X", "localhost:11434").is_err());
        assert!(validate_range_f32("temperature", 0.4, 0.0, 2.0).is_ok());
        assert!(validate_range_f32("temperature", f32::NAN, 0.0, 2.0).is_err());
        assert!(validate_range_f32("temperature", 3.0, 0.0, 2.0).is_err());
    }

    #[test]
    fn provider_error_names_backend() {
        let e = AiLlmError::from(ProviderError::new(
            Provider::OpenAI,
            ProviderErrorKind::EmptyResponse,
        ));
        assert_eq!(e.to_string(), "[AI LLM Service] openai: empty completion");
    }
}
