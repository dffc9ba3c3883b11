//! Formatting layer and filter helpers shared by the binaries of the workspace.

use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Target prefix of events emitted by this crate.
pub const TARGET_PREFIX: &str = "ai_llm_service";

/// RFC3339 UTC timer implemented via `chrono`, e.g. `2025-09-12T10:20:30Z`.
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        w.write_str(&now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

/// Compact single-line layer that renders only events whose target starts
/// with one of `targets` (crate names in snake case).
///
/// Span close events are logged, so `#[instrument]`ed calls report their
/// duration. ANSI colors are enabled only on a terminal.
pub fn layer<S>(targets: &'static [&'static str]) -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();
    let selected = filter::filter_fn(move |meta| {
        targets.iter().any(|t| meta.target().starts_with(t))
    });

    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(selected)
}

/// `{target}={level}` directive, or `None` if `target` is not a valid
/// directive name.
pub fn level_directive(target: &str, level: Level) -> Option<Directive> {
    format!("{target}={}", level.as_str().to_lowercase())
        .parse()
        .ok()
}

/// `RUST_LOG` if set, otherwise `default`, with `target` raised to `level`.
pub fn env_filter_with_level(default: &str, target: &str, level: Level) -> EnvFilter {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    match level_directive(target, level) {
        Some(d) => base.add_directive(d),
        None => base,
    }
}
