/// Represents the provider (backend) used for large language model (LLM) inference.
///
/// This enum distinguishes between a local Ollama runtime and any endpoint
/// speaking the OpenAI chat completions protocol (OpenAI itself, vLLM,
/// LM Studio, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime (`/api/generate`).
    Ollama,
    /// OpenAI-compatible chat completions (`/v1/chat/completions`).
    OpenAI,
}

impl std::str::FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(LlmProvider::Ollama),
            "openai" | "chatgpt" | "openai-compatible" => Ok(LlmProvider::OpenAI),
            other => Err(other.to_string()),
        }
    }
}
