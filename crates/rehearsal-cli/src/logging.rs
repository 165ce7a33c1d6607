//! Structured logging for the CLI.
//!
//! Logs go to stderr so stdout stays clean JSON. The filter is read from
//! `REHEARSAL_LOG`, then `RUST_LOG`, and otherwise defaults to `warn`
//! (`debug` with `--verbose`). A set but malformed filter is an error.

use std::env;
use std::io;

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "REHEARSAL_LOG";

/// Errors that can arise while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid logging filter: {0}")]
    Filter(#[from] ParseError),
    #[error("failed to install logging subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global stderr subscriber.
pub fn init_logging(verbose: bool) -> Result<(), LoggingError> {
    let filter = build_filter(verbose)?;
    let layer = tracing_subscriber::fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_target(true)
        .with_writer(io::stderr)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()?;
    Ok(())
}

fn build_filter(verbose: bool) -> Result<EnvFilter, ParseError> {
    filter_from(
        env::var(LOG_ENV_VAR).ok(),
        env::var(EnvFilter::DEFAULT_ENV).ok(),
        verbose,
    )
}

/// The first non-blank variable wins and must parse; otherwise the default level applies.
fn filter_from(
    rehearsal_log: Option<String>,
    rust_log: Option<String>,
    verbose: bool,
) -> Result<EnvFilter, ParseError> {
    let directives = [rehearsal_log, rust_log]
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty());

    match directives {
        Some(directives) => EnvFilter::try_new(directives),
        None => EnvFilter::try_new(if verbose { "debug" } else { "warn" }),
    }
}
