//! Logging setup for the binary.

use crate::error::{CliError, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when neither `--log-level` nor `RUST_LOG` is set
pub const DEFAULT_FILTER: &str = "info";

/// Build the log filter: an explicit directive wins over `RUST_LOG`
pub fn build_filter(directive: Option<&str>) -> Result<EnvFilter> {
    match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .map_err(|e| CliError::Config(format!("Invalid log filter {:?}: {}", directive, e))),
        None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

/// Install the global subscriber, logging to stderr
pub fn init_logging(directive: Option<&str>) -> Result<()> {
    let filter = build_filter(directive)?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| CliError::Config(format!("Failed to install logger: {}", e)))
}
