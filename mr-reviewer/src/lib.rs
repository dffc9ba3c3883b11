//! Public entry for the mr-reviewer pipeline.
//!
//! [`run_review`] drives one merge request end to end:
//!
//! 1. parse the URL (nothing touches the network on a bad URL)
//! 2. fetch `diff_refs` and the change listing, reconcile complete diffs
//! 3. split oversized diffs into units of at most `max_lines` lines
//! 4. ask the model about every unit, strictly in order
//! 5. write `{output_dir}/{iid}.md`
//!
//! Every step is awaited before the next starts; the first error aborts the
//! run and no partial report is written.

pub mod config;
pub mod errors;
pub mod publish;
pub mod review;

use std::path::PathBuf;
use std::time::Instant;

use ai_llm_service::LlmService;
use git_context_engine::{
    GitLabClient, ProviderConfig, fetch_resolved_diffs, parse_merge_request_url,
};
use serde::Serialize;
use tracing::{debug, info, instrument};

pub use config::ReviewConfig;
pub use errors::{Error, MrResult};
pub use review::{FileReview, ReviewUnit};

/// Result of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewReport {
    pub iid: u64,
    pub path: PathBuf,
    pub sections: Vec<FileReview>,
}

/// Runs the review for `cfg.mr_url` and writes the Markdown report.
#[instrument(skip_all, fields(model = %llm.model()))]
pub async fn run_review(cfg: &ReviewConfig, llm: &LlmService) -> MrResult<ReviewReport> {
    let parsed = parse_merge_request_url(&cfg.mr_url)?;
    let mr = parsed.reference;
    let api_root = cfg.api_base.clone().unwrap_or(parsed.api_root);
    info!(host = %mr.host, project = %mr.project_path, iid = mr.iid, "review started");

    let provider = ProviderConfig::new(api_root, cfg.token.clone(), cfg.timeouts)?;
    let client = GitLabClient::new(provider)?;

    let diffs = fetch_resolved_diffs(&client, &mr).await?;
    debug!(
        files = diffs.len(),
        generated = diffs.iter().filter(|d| d.was_generated()).count(),
        binary = diffs.iter().filter(|d| d.is_binary()).count(),
        "diffs resolved"
    );

    let units = review::chunk::split_large_diffs(&diffs, cfg.max_lines);
    info!(files = diffs.len(), units = units.len(), "diffs chunked");

    let started = Instant::now();
    let sections = review::review_units(llm, &units, &cfg.team_styles).await?;
    info!(
        units = sections.len(),
        elapsed_secs = started.elapsed().as_secs_f64(),
        "generation finished"
    );

    let text = publish::render_report(&sections);
    let path = publish::write_report(&cfg.output_dir, mr.iid, &text).await?;

    Ok(ReviewReport {
        iid: mr.iid,
        path,
        sections,
    })
}
