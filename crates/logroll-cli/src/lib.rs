//! Logroll CLI library.
//!
//! This library provides the core functionality for the `logroll` binary,
//! including configuration lookup, logging setup, command execution, and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;

pub use cli::{Cli, Command};
pub use config::load_config;
pub use error::{CliError, Result};
pub use output::Formatter;
