//! Provider layer: GitLab REST client and its configuration.
//!
//! Configuration is an explicit value built once (usually from the parsed
//! merge request URL plus environment) and handed to the client; nothing in
//! the client is mutated after construction.

pub mod types;
pub use types::*;

pub mod gitlab;

use std::time::Duration;

use crate::errors::{ConfigError, GitContextEngineResult};

/// Per-endpoint request timeouts. Every GitLab call is bounded by one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Merge request metadata (`diff_refs`).
    pub meta: Duration,
    /// Bulk change listing.
    pub changes: Duration,
    /// Raw file content.
    pub raw_file: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            meta: Duration::from_secs(60),
            changes: Duration::from_secs(120),
            raw_file: Duration::from_secs(60),
        }
    }
}

/// Runtime configuration for the GitLab client.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API base, e.g. "https://gitlab.com/api/v4".
    pub base_api: String,
    /// Access token sent as `PRIVATE-TOKEN`.
    pub token: String,
    pub timeouts: HttpTimeouts,
}

impl ProviderConfig {
    /// Validates the token and base URL and normalizes the trailing slash.
    pub fn new(
        base_api: impl Into<String>,
        token: impl Into<String>,
        timeouts: HttpTimeouts,
    ) -> GitContextEngineResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::MissingToken.into());
        }

        let base_api = base_api.into();
        let base_api = base_api.trim().trim_end_matches('/').to_string();
        if !(base_api.starts_with("http://") || base_api.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_api).into());
        }

        Ok(Self {
            base_api,
            token,
            timeouts,
        })
    }
}
