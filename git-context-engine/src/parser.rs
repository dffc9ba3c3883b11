//! Merge request URL parsing.
//!
//! Accepts both GitLab URL shapes:
//!   * `https://host/group/project/-/merge_requests/42`
//!   * `https://host/group/project/merge_requests/42`
//!
//! and yields the same project path and IID for either.

use tracing::debug;
use url::Url;

use crate::errors::{GitContextEngineError, GitContextEngineResult};
use crate::git_providers::types::{MergeRequestRef, ParsedMergeRequestUrl};

const MR_SEGMENT: &str = "merge_requests";
const SENTINEL_SEGMENT: &str = "-";

/// Extracts project path, IID and API root from a merge request URL.
///
/// Pure function; no network access.
///
/// # Errors
/// [`GitContextEngineError::InvalidReference`] when the string is not an
/// absolute URL with a host, has no `merge_requests` segment, has no positive
/// numeric IID after it, or has no project segments before it.
pub fn parse_merge_request_url(raw: &str) -> GitContextEngineResult<ParsedMergeRequestUrl> {
    let raw = raw.trim();
    let url = Url::parse(raw).map_err(|e| invalid(raw, &e.to_string()))?;

    let host = url
        .host_str()
        .ok_or_else(|| invalid(raw, "url has no host"))?;
    let authority = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    let segments: Vec<&str> = url
        .path_segments()
        .map(|it| it.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    let mr_index = segments
        .iter()
        .position(|s| *s == MR_SEGMENT)
        .ok_or_else(|| invalid(raw, "no merge_requests segment"))?;

    let iid = segments
        .get(mr_index + 1)
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|iid| *iid > 0)
        .ok_or_else(|| invalid(raw, "missing or non-numeric merge request iid"))?;

    let mut project = &segments[..mr_index];
    if project.last() == Some(&SENTINEL_SEGMENT) {
        project = &project[..project.len() - 1];
    }
    if project.is_empty() {
        return Err(invalid(raw, "no project path before merge_requests"));
    }
    let project_path = project.join("/");

    let api_root = format!("{}://{}/api/v4", url.scheme(), authority);
    debug!(project = %project_path, iid, api_root = %api_root, "parsed merge request url");

    Ok(ParsedMergeRequestUrl {
        reference: MergeRequestRef {
            host: authority,
            project_path,
            iid,
        },
        api_root,
    })
}

fn invalid(raw: &str, reason: &str) -> GitContextEngineError {
    GitContextEngineError::InvalidReference(format!("{raw}: {reason}"))
}
