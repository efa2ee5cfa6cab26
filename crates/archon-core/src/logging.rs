//! ABOUTME: Structured logging setup shared by every binary in the workspace
//! ABOUTME: Controlled by `RUST_LOG`, falling back to the `LOG_LEVEL` config key

use std::io;
use tracing_subscriber::EnvFilter;

/// Output format for the process-wide tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, for local development.
    #[default]
    Pretty,
    /// Newline-delimited JSON, for production log aggregation.
    Json,
}

/// Initialize the global `tracing` subscriber.
///
/// Priority: `RUST_LOG` env var > `default_level`. Logs go to stderr so
/// stdout stays reserved for program output. Every span/event should carry
/// `correlation_id` and, where applicable, `tenant_id` and `task_type` as
/// structured fields rather than interpolating them into the message.
///
/// # Panics
/// Panics if a global subscriber has already been installed.
pub fn init(format: LogFormat, default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match format {
        LogFormat::Pretty => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .with_target(true)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .with_target(true)
                .with_current_span(true)
                .init();
        }
    }
}

/// Parse the `LOG_LEVEL` configuration key into a `LogFormat`/level pair.
/// `LOG_LEVEL` values follow `tracing`'s level names (`trace`, `debug`,
/// `info`, `warn`, `error`); anything unrecognized defaults to `info`.
#[must_use]
pub fn normalize_level(raw: &str) -> &'static str {
    match raw.to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "info",
    }
}
