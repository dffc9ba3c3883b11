//! GitLab provider (REST v4) for merge request refs, changes and raw files.
//!
//! Endpoints used:
//!   * GET /projects/:id/merge_requests/:iid
//!   * GET /projects/:id/merge_requests/:iid/changes
//!   * GET /projects/:id/repository/files/:path/raw?ref=:ref
//!
//! Every request carries `PRIVATE-TOKEN` and its own timeout. Tokens and
//! response bodies are never logged.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::content::decode_text;
use crate::errors::{GitContextEngineResult, TransportError};
use crate::git_providers::ProviderConfig;
use crate::git_providers::types::{ChangeRecord, DiffRefs, MergeRequestRef};
use crate::reconcile::RawFileSource;

/// GitLab HTTP client wrapper.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    http: Client,
    cfg: ProviderConfig,
}

impl GitLabClient {
    /// Builds the HTTP client with a stable user agent.
    pub fn new(cfg: ProviderConfig) -> GitContextEngineResult<Self> {
        debug!("Creating GitLabClient with base_api={}", cfg.base_api);
        let http = Client::builder()
            .user_agent("git-context-engine/0.1")
            .build()?;
        Ok(Self { http, cfg })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.cfg
    }

    /// Fetches the base/head commits of a merge request.
    ///
    /// A payload without `diff_refs` (or with null SHAs) is an
    /// `InvalidResponse`; GitLab leaves them empty while a merge request is
    /// still being prepared.
    #[instrument(skip_all, fields(project = %mr.project_path, iid = mr.iid))]
    pub async fn get_diff_refs(&self, mr: &MergeRequestRef) -> GitContextEngineResult<DiffRefs> {
        let url = format!(
            "{}/projects/{}/merge_requests/{}",
            self.cfg.base_api,
            urlencoding::encode(&mr.project_path),
            mr.iid
        );
        debug!("GitLab get_diff_refs: {}", url);

        let resp: GitLabMr = self.get_json(&url, self.cfg.timeouts.meta).await?;
        let refs = resp
            .diff_refs
            .ok_or_else(|| TransportError::InvalidResponse("missing diff_refs".into()))?;

        match (refs.base_sha, refs.head_sha) {
            (Some(base_sha), Some(head_sha)) => {
                debug!(%base_sha, %head_sha, "diff refs resolved");
                Ok(DiffRefs { base_sha, head_sha })
            }
            _ => Err(TransportError::InvalidResponse(
                "diff_refs without base_sha/head_sha".into(),
            )
            .into()),
        }
    }

    /// Fetches the change listing; diffs inside may be truncated or absent.
    #[instrument(skip_all, fields(project = %mr.project_path, iid = mr.iid))]
    pub async fn get_changes(
        &self,
        mr: &MergeRequestRef,
    ) -> GitContextEngineResult<Vec<ChangeRecord>> {
        let url = format!(
            "{}/projects/{}/merge_requests/{}/changes",
            self.cfg.base_api,
            urlencoding::encode(&mr.project_path),
            mr.iid
        );
        debug!("GitLab get_changes: {}", url);

        let resp: GitLabMrChanges = self.get_json(&url, self.cfg.timeouts.changes).await?;
        let changes = resp
            .changes
            .into_iter()
            .map(ChangeRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            files = changes.len(),
            overflowed = changes.iter().filter(|c| c.is_overflowed).count(),
            "changes fetched"
        );
        Ok(changes)
    }

    /// Fetches raw file bytes at a specific ref.
    ///
    /// Returns `Ok(None)` if the file does not exist at the given ref (404).
    pub async fn get_file_raw(
        &self,
        project_path: &str,
        file_path: &str,
        git_ref: &str,
    ) -> GitContextEngineResult<Option<Vec<u8>>> {
        let url = format!(
            "{}/projects/{}/repository/files/{}/raw",
            self.cfg.base_api,
            urlencoding::encode(project_path),
            urlencoding::encode(file_path),
        );
        debug!("GitLab get_file_raw: {}", url);

        let resp = self
            .http
            .get(url)
            .query(&[("ref", git_ref)])
            .header("PRIVATE-TOKEN", &self.cfg.token)
            .timeout(self.cfg.timeouts.raw_file)
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            debug!(file_path, git_ref, "GitLab file not found at given ref");
            return Ok(None);
        }

        let resp = resp.error_for_status()?;
        let bytes = resp.bytes().await?;
        Ok(Some(bytes.to_vec()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        timeout: Duration,
    ) -> GitContextEngineResult<T> {
        let body = self
            .http
            .get(url)
            .header("PRIVATE-TOKEN", &self.cfg.token)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        serde_json::from_slice(&body)
            .map_err(|e| TransportError::InvalidResponse(e.to_string()).into())
    }
}

impl RawFileSource for GitLabClient {
    /// Raw file as text; `None` for 404 or binary content.
    #[instrument(skip(self), level = "debug")]
    async fn fetch_text(
        &self,
        project_path: &str,
        revision: &str,
        file_path: &str,
    ) -> GitContextEngineResult<Option<String>> {
        let Some(bytes) = self.get_file_raw(project_path, file_path, revision).await? else {
            return Ok(None);
        };

        let text = decode_text(&bytes);
        if text.is_none() {
            debug!(file_path, revision, size = bytes.len(), "binary content");
        }
        Ok(text)
    }
}

/// GitLab MR response (subset).
#[derive(Debug, Deserialize)]
struct GitLabMr {
    #[serde(default)]
    diff_refs: Option<GitLabDiffRefs>,
}

#[derive(Debug, Deserialize)]
struct GitLabDiffRefs {
    #[serde(default)]
    base_sha: Option<String>,
    #[serde(default)]
    head_sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitLabMrChanges {
    #[serde(default)]
    changes: Vec<GitLabChange>,
}

#[derive(Debug, Deserialize)]
struct GitLabChange {
    #[serde(default)]
    old_path: Option<String>,
    #[serde(default)]
    new_path: Option<String>,
    #[serde(default)]
    new_file: bool,
    #[serde(default)]
    deleted_file: bool,
    #[serde(default)]
    diff: Option<String>,
    #[serde(default)]
    overflow: Option<bool>,
    #[serde(default)]
    too_large: Option<bool>,
}

impl TryFrom<GitLabChange> for ChangeRecord {
    type Error = TransportError;

    fn try_from(c: GitLabChange) -> Result<Self, Self::Error> {
        if c.old_path.is_none() && c.new_path.is_none() {
            return Err(TransportError::InvalidResponse(
                "change entry without old_path and new_path".into(),
            ));
        }

        Ok(ChangeRecord {
            old_path: c.old_path,
            new_path: c.new_path,
            is_new_file: c.new_file,
            is_deleted_file: c.deleted_file,
            server_diff: c.diff,
            is_overflowed: c.overflow.unwrap_or(false) || c.too_large.unwrap_or(false),
        })
    }
}
