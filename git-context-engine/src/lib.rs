//! GitLab merge request access with complete diffs.
//!
//! The crate turns a merge request URL into one complete diff per changed
//! file:
//!   * [`parser`] extracts project path, IID and API root from the URL
//!   * [`git_providers::gitlab`] reads `diff_refs`, the change listing and raw files
//!   * [`content`] classifies raw bytes as text or binary
//!   * [`reconcile`] keeps trustworthy server diffs and rebuilds truncated ones
//!   * [`unified`] renders locally computed unified diffs

pub mod content;
pub mod errors;
pub mod git_providers;
pub mod parser;
pub mod reconcile;
pub mod unified;

use tracing::info;

pub use errors::{GitContextEngineError, GitContextEngineResult, TransportError};
pub use git_providers::gitlab::GitLabClient;
pub use git_providers::types::{
    ChangeRecord, DiffRefs, MergeRequestRef, ParsedMergeRequestUrl, ResolvedDiff,
};
pub use git_providers::{HttpTimeouts, ProviderConfig};
pub use parser::parse_merge_request_url;
pub use reconcile::{RawFileSource, reconcile};

/// Fetches `diff_refs` and the change listing of a merge request and
/// reconciles every file into a complete diff.
///
/// Requests are issued sequentially; the first failure aborts the call.
pub async fn fetch_resolved_diffs(
    client: &GitLabClient,
    mr: &MergeRequestRef,
) -> GitContextEngineResult<Vec<ResolvedDiff>> {
    info!(project = %mr.project_path, iid = mr.iid, "fetching merge request diffs");

    let refs = client.get_diff_refs(mr).await?;
    let changes = client.get_changes(mr).await?;
    reconcile(client, &mr.project_path, &refs, &changes).await
}
