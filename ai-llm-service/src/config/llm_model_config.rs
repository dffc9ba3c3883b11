use crate::config::llm_provider::LlmProvider;

/// Configuration for an LLM model invocation.
///
/// # Fields
///
/// - `provider`: Which backend to use.
/// - `model`: The model identifier (e.g., `"qwen2.5-coder:14b"`, `"gpt-4o-mini"`).
/// - `endpoint`: Base URL of the inference server, without the API path.
/// - `api_key`: Optional API key for providers that require authentication.
/// - `system_prompt`: Optional system instruction sent with every request.
/// - `max_tokens`: Maximum number of tokens to generate.
/// - `temperature`: Controls randomness (0.0 = deterministic).
/// - `top_p`: Nucleus sampling cutoff.
/// - `timeout_secs`: Request timeout in seconds (600 when unset).
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub system_prompt: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub timeout_secs: Option<u64>,
}
