//! Diagnostic output for the `capigen` binary.
//!
//! Events go to stderr through a compact `tracing-subscriber` fmt layer so
//! stdout stays free for anything a caller might pipe. The library itself
//! only emits events; installing a subscriber is the binary's job.

use std::env;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const ENV_LOG: &str = "CAPIGEN_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log directive: {0}")]
    InvalidFilter(String),
    #[error("failed to install tracing subscriber: {0}")]
    SubscriberInit(#[source] tracing_subscriber::util::TryInitError),
}

/// Pick the filter: explicit directive, `CAPIGEN_LOG`, `RUST_LOG`, then `warn`.
fn resolve_filter(directive: Option<&str>) -> Result<EnvFilter, LoggingError> {
    let explicit = directive
        .map(str::to_string)
        .or_else(|| env::var(ENV_LOG).ok())
        .filter(|d| !d.trim().is_empty());
    match explicit {
        Some(directive) => {
            EnvFilter::try_new(&directive).map_err(|err| LoggingError::InvalidFilter(err.to_string()))
        }
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))),
    }
}

/// Install the process-wide subscriber.
pub fn init(directive: Option<&str>) -> Result<(), LoggingError> {
    let filter = resolve_filter(directive)?;
    let layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(LoggingError::SubscriberInit)
}
