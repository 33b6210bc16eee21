//! Configuration file lookup for the CLI.

use crate::error::Result;
use logroll_archiver::ArchiverConfig;
use std::path::{Path, PathBuf};

/// Per-user configuration file location (`<config dir>/logroll/logroll.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("logroll").join("logroll.toml"))
}

/// Load the archiver configuration
///
/// An explicit path must exist and parse. Without one, the per-user file is
/// used when present, otherwise built-in defaults apply.
pub fn load_config(explicit: Option<&Path>) -> Result<ArchiverConfig> {
    if let Some(path) = explicit {
        return Ok(ArchiverConfig::from_file(path)?);
    }

    match default_config_path() {
        Some(path) if path.is_file() => {
            tracing::debug!("Loading configuration from {}", path.display());
            Ok(ArchiverConfig::from_file(&path)?)
        }
        _ => Ok(ArchiverConfig::default()),
    }
}
