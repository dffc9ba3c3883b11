//! Data model for merge requests, their changes and reconciled diffs.

use serde::{Deserialize, Serialize};

/// A unique reference to a merge request on a GitLab host.
///
/// * `host`         – authority of the instance, e.g. `gitlab.com` or `127.0.0.1:8080`.
/// * `project_path` – slash-joined namespace path, e.g. `group/subgroup/project`.
/// * `iid`          – project-scoped merge request number (always > 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequestRef {
    pub host: String,
    pub project_path: String,
    pub iid: u64,
}

/// Output of the URL parser: the reference plus the REST root derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMergeRequestUrl {
    pub reference: MergeRequestRef,
    /// e.g. `https://gitlab.com/api/v4`
    pub api_root: String,
}

/// The two commits bounding a merge request.
///
/// Fetched once per run and used for every raw file retrieval in that run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRefs {
    pub base_sha: String,
    pub head_sha: String,
}

/// One entry of the GitLab `changes` listing, normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    pub is_new_file: bool,
    pub is_deleted_file: bool,
    /// Unified diff as returned by the server; may be absent or truncated.
    pub server_diff: Option<String>,
    /// `overflow` or `too_large` was set on the entry.
    pub is_overflowed: bool,
}

impl ChangeRecord {
    /// Server diff that can be used verbatim, if any.
    ///
    /// An empty body is treated like a missing one.
    pub fn trusted_server_diff(&self) -> Option<&str> {
        if self.is_overflowed {
            return None;
        }
        self.server_diff.as_deref().filter(|d| !d.is_empty())
    }

    /// Path used for logs and reports (new path, falling back to old path).
    pub fn display_path(&self) -> &str {
        self.new_path
            .as_deref()
            .or(self.old_path.as_deref())
            .unwrap_or_default()
    }
}

/// Final, complete diff for one changed file.
///
/// Built exactly once by the reconciler through one of the three
/// constructors, so that `is_binary` always implies an empty `diff_text`
/// and `was_generated` is only set for locally computed diffs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDiff {
    old_path: Option<String>,
    new_path: Option<String>,
    diff_text: String,
    was_generated: bool,
    is_binary: bool,
}

impl ResolvedDiff {
    /// Diff taken verbatim from the server.
    pub fn server(old_path: Option<String>, new_path: Option<String>, diff_text: String) -> Self {
        Self {
            old_path,
            new_path,
            diff_text,
            was_generated: false,
            is_binary: false,
        }
    }

    /// Diff computed locally from both file sides.
    pub fn generated(
        old_path: Option<String>,
        new_path: Option<String>,
        diff_text: String,
    ) -> Self {
        Self {
            old_path,
            new_path,
            diff_text,
            was_generated: true,
            is_binary: false,
        }
    }

    /// Neither side has usable text (binary, or unavailable at both revisions).
    pub fn binary(old_path: Option<String>, new_path: Option<String>) -> Self {
        Self {
            old_path,
            new_path,
            diff_text: String::new(),
            was_generated: false,
            is_binary: true,
        }
    }

    pub fn old_path(&self) -> Option<&str> {
        self.old_path.as_deref()
    }

    pub fn new_path(&self) -> Option<&str> {
        self.new_path.as_deref()
    }

    pub fn diff_text(&self) -> &str {
        &self.diff_text
    }

    pub fn was_generated(&self) -> bool {
        self.was_generated
    }

    pub fn is_binary(&self) -> bool {
        self.is_binary
    }

    /// New path, falling back to the old path for deletions.
    pub fn display_path(&self) -> &str {
        self.new_path
            .as_deref()
            .or(self.old_path.as_deref())
            .unwrap_or_default()
    }
}
