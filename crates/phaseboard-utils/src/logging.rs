//! Logging and observability infrastructure for phaseboard
//!
//! This module installs the `tracing` subscriber used by the CLI and provides
//! the structured log helpers shared by the engine.

use tracing::{Level, debug, error, span, warn};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::cache::CacheStats;
use crate::error::{DuplicateKeyError, EmptyInputWarning};

/// Environment variable holding an `EnvFilter` directive for phaseboard.
pub const LOG_ENV_VAR: &str = "PHASEBOARD_LOG";

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new("phaseboard=debug,phaseboard_engine=debug,info")
            } else {
                EnvFilter::try_new("phaseboard=info,phaseboard_engine=info,warn")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the tracing subscriber for structured logging.
///
/// Verbose mode adds targets and span close events (with durations) to the
/// compact format. Logs go to stderr so that JSON written to stdout stays
/// machine-readable.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .compact();

    if verbose {
        tracing_subscriber::registry()
            .with(env_filter(true))
            .with(
                layer
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter(false))
            .with(layer.with_target(false))
            .try_init()?;
    }

    Ok(())
}

/// Span wrapping one engine operation over a record set.
pub fn engine_span(operation: &'static str, record_count: usize) -> tracing::Span {
    span!(
        Level::DEBUG,
        "engine",
        operation = operation,
        records = record_count,
    )
}

/// Log a non-fatal empty-input condition.
pub fn log_empty_input(warning: EmptyInputWarning) {
    warn!(operation = warning.operation, "{warning}");
}

/// Log a pivot conflict before it is propagated to the caller.
pub fn log_duplicate_key(err: &DuplicateKeyError) {
    error!(
        project = %err.project,
        phase = %err.phase,
        first_status = %err.first_status,
        second_status = %err.second_status,
        "Duplicate progress record detected"
    );
}

/// Log read-cache statistics at debug level.
pub fn log_cache_stats(stats: &CacheStats) {
    debug!(
        hits = stats.hits,
        misses = stats.misses,
        invalidations = stats.invalidations,
        writes = stats.writes,
        hit_ratio = %format!("{:.1}%", stats.hit_ratio() * 100.0),
        "Record cache statistics"
    );
}
