//! Text completion over a local Ollama daemon or any OpenAI-compatible
//! endpoint.
//!
//! Configuration comes from the environment ([`config::default_config`]),
//! [`LlmService`] hides which backend answers, and [`telemetry`] provides
//! the log layer used by the binaries.

pub mod config;
pub mod error_handler;
pub mod llm_service;
pub mod services;
pub mod telemetry;

pub use config::default_config::config_from_env;
pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{AiLlmError, Result};
pub use llm_service::LlmService;
