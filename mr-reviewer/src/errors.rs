//! Crate-wide error hierarchy for mr-reviewer.
//!
//! Lower layers keep their own error types; they are wrapped here so every
//! public function returns [`MrResult`].

use std::path::PathBuf;

use ai_llm_service::AiLlmError;
use git_context_engine::GitContextEngineError;
use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type MrResult<T> = Result<T, Error>;

/// Root error type for the mr-reviewer crate.
#[derive(Debug, Error)]
pub enum Error {
    /// URL parsing, GitLab transport or diff reconciliation failure.
    #[error(transparent)]
    Engine(#[from] GitContextEngineError),

    /// Text completion failure.
    #[error(transparent)]
    Llm(#[from] AiLlmError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Reading the styles file or writing the report.
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Review settings that could not be read from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid number in {var}: {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("REVIEW_MAX_LINES must be greater than zero")]
    ZeroMaxLines,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
