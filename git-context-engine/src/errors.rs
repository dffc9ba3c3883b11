//! Crate-wide error hierarchy for git-context-engine.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type GitContextEngineResult<T> = Result<T, GitContextEngineError>;

/// Root error type for the git-context-engine crate.
///
/// Every variant is fatal for a review run. Missing or binary file content is
/// not an error at all: it is reported as `None` by the raw file fetcher.
#[derive(Debug, Error)]
pub enum GitContextEngineError {
    /// The merge request URL has no `merge_requests/<iid>` shape.
    #[error("invalid merge request reference: {0}")]
    InvalidReference(String),

    /// Any HTTP-level failure while talking to GitLab.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Configuration problems (missing token, bad base URL).
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Transport-level failure. Never retried.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Unauthorized (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden (HTTP 403).
    #[error("forbidden")]
    Forbidden,

    /// Not found (HTTP 404) on an endpoint where absence is not legitimate.
    #[error("not found")]
    NotFound,

    /// Rate limited (HTTP 429).
    #[error("rate limited")]
    RateLimited {
        /// Optional `Retry-After` hint in seconds when available.
        retry_after_secs: Option<u64>,
    },

    /// Gateway / server error (HTTP 5xx).
    #[error("server error: status {0}")]
    Server(u16),

    /// Other non-2xx status.
    #[error("http status error: status {0}")]
    HttpStatus(u16),

    /// The request did not complete within its timeout.
    #[error("timeout")]
    Timeout,

    /// DNS/connect/reset failures without an HTTP status.
    #[error("network error: {0}")]
    Network(String),

    /// Payload did not have the expected shape (missing `diff_refs`, bad JSON, ...).
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Configuration and setup errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing access token.
    #[error("missing provider token")]
    MissingToken,

    /// Invalid base API URL.
    #[error("invalid base api url: {0}")]
    InvalidBaseUrl(String),
}

impl From<reqwest::Error> for GitContextEngineError {
    fn from(e: reqwest::Error) -> Self {
        GitContextEngineError::Transport(TransportError::from(e))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return TransportError::Timeout;
        }

        if let Some(status) = e.status() {
            return TransportError::from_status(status.as_u16());
        }

        if e.is_decode() {
            return TransportError::InvalidResponse(e.to_string());
        }

        TransportError::Network(e.to_string())
    }
}

impl TransportError {
    /// Maps a non-2xx status code onto a variant.
    pub fn from_status(code: u16) -> Self {
        match code {
            401 => TransportError::Unauthorized,
            403 => TransportError::Forbidden,
            404 => TransportError::NotFound,
            429 => TransportError::RateLimited {
                retry_after_secs: None,
            },
            500..=599 => TransportError::Server(code),
            _ => TransportError::HttpStatus(code),
        }
    }
}
