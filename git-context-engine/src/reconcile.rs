//! Diff reconciliation: turns a possibly truncated `changes` listing into a
//! complete diff per file.
//!
//! GitLab omits or truncates diffs of large files and only signals it through
//! the `overflow` / `too_large` flags. For such entries both file sides are
//! fetched at the merge request's base and head commits and the diff is
//! computed locally. This costs two extra requests per affected file.

use tracing::{debug, info, instrument};

use crate::errors::GitContextEngineResult;
use crate::git_providers::types::{ChangeRecord, DiffRefs, ResolvedDiff};
use crate::unified::{DEV_NULL, split_lines, unified_diff};

/// Something that can return the text of a file at a revision.
///
/// `Ok(None)` means "no usable text": the file does not exist at that
/// revision, or its content is binary. Errors are transport failures and
/// abort the reconciliation.
#[allow(async_fn_in_trait)]
pub trait RawFileSource {
    async fn fetch_text(
        &self,
        project_path: &str,
        revision: &str,
        file_path: &str,
    ) -> GitContextEngineResult<Option<String>>;
}

/// Resolves every change into a complete diff, preserving input order.
///
/// Files are processed one after another. The first transport error aborts
/// the whole run; no partial result is returned.
#[instrument(skip_all, fields(project = %project_path, files = changes.len()))]
pub async fn reconcile<S: RawFileSource>(
    source: &S,
    project_path: &str,
    refs: &DiffRefs,
    changes: &[ChangeRecord],
) -> GitContextEngineResult<Vec<ResolvedDiff>> {
    let mut out = Vec::with_capacity(changes.len());
    for change in changes {
        out.push(resolve_one(source, project_path, refs, change).await?);
    }

    let generated = out.iter().filter(|d| d.was_generated()).count();
    let binary = out.iter().filter(|d| d.is_binary()).count();
    info!(
        total = out.len(),
        generated, binary, "reconciled merge request diffs"
    );

    Ok(out)
}

async fn resolve_one<S: RawFileSource>(
    source: &S,
    project_path: &str,
    refs: &DiffRefs,
    change: &ChangeRecord,
) -> GitContextEngineResult<ResolvedDiff> {
    let path = change.display_path();

    if let Some(diff) = change.trusted_server_diff() {
        debug!(path, "using server diff");
        return Ok(ResolvedDiff::server(
            change.old_path.clone(),
            change.new_path.clone(),
            diff.to_string(),
        ));
    }

    debug!(
        path,
        overflowed = change.is_overflowed,
        "server diff missing or truncated; rebuilding from raw files"
    );

    let base_text = match (&change.old_path, change.is_new_file) {
        (Some(old_path), false) => {
            source
                .fetch_text(project_path, &refs.base_sha, old_path)
                .await?
        }
        _ => None,
    };
    let head_text = match (&change.new_path, change.is_deleted_file) {
        (Some(new_path), false) => {
            source
                .fetch_text(project_path, &refs.head_sha, new_path)
                .await?
        }
        _ => None,
    };

    if base_text.is_none() && head_text.is_none() {
        debug!(path, "no text on either side; marking as binary");
        return Ok(ResolvedDiff::binary(
            change.old_path.clone(),
            change.new_path.clone(),
        ));
    }

    let base_lines = base_text.as_deref().map(split_lines).unwrap_or_default();
    let head_lines = head_text.as_deref().map(split_lines).unwrap_or_default();
    let diff = unified_diff(
        &base_lines,
        &head_lines,
        change.old_path.as_deref().unwrap_or(DEV_NULL),
        change.new_path.as_deref().unwrap_or(DEV_NULL),
    );

    Ok(ResolvedDiff::generated(
        change.old_path.clone(),
        change.new_path.clone(),
        diff,
    ))
}
