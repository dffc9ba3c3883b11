//! Review run settings, built once from the environment.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use git_context_engine::HttpTimeouts;
use tracing::debug;

use crate::errors::{ConfigError, Error, MrResult};

pub const DEFAULT_MAX_LINES: NonZeroUsize = match NonZeroUsize::new(200) {
    Some(n) => n,
    None => unreachable!(),
};
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

/// Everything `run_review` needs besides the LLM client.
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    /// Merge request URL as pasted from the browser.
    pub mr_url: String,
    /// Sent as `PRIVATE-TOKEN`; never logged.
    pub token: String,
    /// Overrides the API root derived from the URL.
    pub api_base: Option<String>,
    pub timeouts: HttpTimeouts,
    /// Diffs longer than this are reviewed in parts.
    pub max_lines: NonZeroUsize,
    /// The report lands in `{output_dir}/{iid}.md`.
    pub output_dir: PathBuf,
    /// Team code style, inserted verbatim into every prompt.
    pub team_styles: String,
}

impl ReviewConfig {
    pub fn new(mr_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            mr_url: mr_url.into(),
            token: token.into(),
            api_base: None,
            timeouts: HttpTimeouts::default(),
            max_lines: DEFAULT_MAX_LINES,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            team_styles: String::new(),
        }
    }

    /// Reads `MR_LINK`, `GITLAB_TOKEN`, `GITLAB_API_BASE`, the
    /// `GITLAB_*_TIMEOUT_SECS` family, `REVIEW_MAX_LINES`,
    /// `REVIEW_OUTPUT_DIR` and `REVIEW_STYLES_PATH`.
    pub fn from_env() -> MrResult<Self> {
        let mut cfg = Self::new(must_env("MR_LINK")?.trim(), must_env("GITLAB_TOKEN")?);
        cfg.api_base = env_opt("GITLAB_API_BASE");

        let defaults = HttpTimeouts::default();
        cfg.timeouts = HttpTimeouts {
            meta: env_secs("GITLAB_META_TIMEOUT_SECS")?.unwrap_or(defaults.meta),
            changes: env_secs("GITLAB_CHANGES_TIMEOUT_SECS")?.unwrap_or(defaults.changes),
            raw_file: env_secs("GITLAB_RAW_TIMEOUT_SECS")?.unwrap_or(defaults.raw_file),
        };

        if let Some(n) = env_parse::<usize>("REVIEW_MAX_LINES")? {
            cfg.max_lines = NonZeroUsize::new(n).ok_or(ConfigError::ZeroMaxLines)?;
        }
        if let Some(dir) = env_opt("REVIEW_OUTPUT_DIR") {
            cfg.output_dir = PathBuf::from(dir);
        }
        if let Some(path) = env_opt("REVIEW_STYLES_PATH") {
            cfg.team_styles =
                std::fs::read_to_string(&path).map_err(|e| Error::io(path.clone(), e))?;
            debug!(path = %path, bytes = cfg.team_styles.len(), "team styles loaded");
        }

        Ok(cfg)
    }
}

fn must_env(name: &'static str) -> Result<String, ConfigError> {
    env_opt(name).ok_or(ConfigError::MissingVar(name))
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env_opt(name) {
        Some(v) => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var: name, value: v }),
        None => Ok(None),
    }
}

fn env_secs(name: &'static str) -> Result<Option<Duration>, ConfigError> {
    Ok(env_parse::<u64>(name)?.map(Duration::from_secs))
}
