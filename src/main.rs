use anyhow::Context;
use tracing::{Level, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ai_llm_service::{LlmService, config_from_env, telemetry};
use mr_reviewer::{ReviewConfig, run_review};

/// Targets rendered by the log layer.
const LOG_TARGETS: &[&str] = &[
    "mr_ai_review",
    "mr_reviewer",
    "git_context_engine",
    "ai_llm_service",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the variables may come from the shell.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level(
            "info",
            telemetry::TARGET_PREFIX,
            Level::INFO,
        ))
        .with(telemetry::layer(LOG_TARGETS))
        .init();

    let review_cfg = ReviewConfig::from_env().context("review configuration")?;
    let llm_cfg = config_from_env().context("LLM configuration")?;
    let llm = LlmService::from_config(llm_cfg).context("LLM client")?;

    let report = run_review(&review_cfg, &llm)
        .await
        .with_context(|| format!("review of {}", review_cfg.mr_url))?;

    info!(
        path = %report.path.display(),
        sections = report.sections.len(),
        "code review saved"
    );
    Ok(())
}
