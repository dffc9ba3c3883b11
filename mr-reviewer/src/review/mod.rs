//! Per-unit review: chunking, prompting and the model call.

pub mod chunk;
pub mod prompt;

use std::time::Instant;

use ai_llm_service::LlmService;
use git_context_engine::ResolvedDiff;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::MrResult;
use prompt::build_review_prompt;

/// Report body for units that are never sent to the model.
pub const NOT_REVIEWED_NOTE: &str = "_Binary file or no textual changes; not reviewed._";

/// One model call worth of diff: a whole file or one chunk of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewUnit {
    /// New path, or the old path for deletions.
    pub file_path: String,
    pub diff_text: String,
    pub is_binary: bool,
    /// 1-based; `None` when the diff was not split.
    pub chunk_index: Option<usize>,
    pub chunk_total: Option<usize>,
}

impl ReviewUnit {
    pub(crate) fn whole(diff: &ResolvedDiff) -> Self {
        Self {
            file_path: diff.display_path().to_string(),
            diff_text: diff.diff_text().to_string(),
            is_binary: diff.is_binary(),
            chunk_index: None,
            chunk_total: None,
        }
    }

    /// Binary files and empty diffs have nothing to review.
    pub fn is_reviewable(&self) -> bool {
        !self.is_binary && !self.diff_text.trim().is_empty()
    }
}

/// Review result of one unit, in report order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReview {
    pub file_path: String,
    pub chunk_index: Option<usize>,
    pub chunk_total: Option<usize>,
    pub body: String,
}

impl FileReview {
    /// `path` or `path (part i/n)`.
    pub fn heading(&self) -> String {
        match (self.chunk_index, self.chunk_total) {
            (Some(i), Some(n)) => format!("{} (part {i}/{n})", self.file_path),
            _ => self.file_path.clone(),
        }
    }
}

/// Reviews units one after another; the first model failure aborts.
pub async fn review_units(
    llm: &LlmService,
    units: &[ReviewUnit],
    team_styles: &str,
) -> MrResult<Vec<FileReview>> {
    let mut out = Vec::with_capacity(units.len());

    for unit in units {
        let body = if unit.is_reviewable() {
            info!(
                file = %unit.file_path,
                chunk = ?unit.chunk_index,
                lines = unit.diff_text.lines().count(),
                "reviewing"
            );
            let started = Instant::now();
            let prompt = build_review_prompt(unit, team_styles);
            let answer = llm.generate(&prompt).await?;
            debug!(
                file = %unit.file_path,
                latency_ms = started.elapsed().as_millis(),
                "review received"
            );
            answer
        } else {
            warn!(file = %unit.file_path, binary = unit.is_binary, "skipped, nothing to review");
            NOT_REVIEWED_NOTE.to_string()
        };

        out.push(FileReview {
            file_path: unit.file_path.clone(),
            chunk_index: unit.chunk_index,
            chunk_total: unit.chunk_total,
            body,
        });
    }

    Ok(out)
}
