//! Configuration for Archiver operations
//!
//! Defines where logs are found, where archives go, the size budget, the
//! per-file merge policies, and the scheduling cadence.

use crate::ArchiverError;
use logroll_domain::{MergePolicy, DEFAULT_MAX_ARCHIVE_BYTES};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for the Archiver service
///
/// # Examples
///
/// ```
/// use logroll_archiver::ArchiverConfig;
/// use logroll_domain::MergePolicy;
///
/// let config = ArchiverConfig::default();
/// assert_eq!(config.max_archive_bytes, 2_621_440);
/// assert_eq!(config.policy_for("jniorboot.log.bak"), MergePolicy::RotatingQueue);
/// assert_eq!(config.policy_for("access.log.bak"), MergePolicy::PlainAppend);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiverConfig {
    /// Directory holding the live logs
    /// Default: `/`
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Extension marking a file as a candidate for archival (no leading dot)
    /// Default: `bak`
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    /// Directory holding the archive entries, created on first use
    /// Default: `/flash/baks`
    #[serde(default = "default_archive_dir")]
    pub archive_dir: PathBuf,

    /// Extension given to archive entries (no leading dot)
    /// Default: `gz`
    #[serde(default = "default_archive_extension")]
    pub archive_extension: String,

    /// Maximum decompressed size of an entry after an update merge
    /// Default: 2,621,440 bytes (2.5 MiB)
    #[serde(default = "default_max_archive_bytes")]
    pub max_archive_bytes: usize,

    /// How often to run a merge pass (in minutes)
    /// Default: every 15 minutes
    #[serde(default = "default_scan_interval")]
    pub scan_interval_minutes: u64,

    /// Run passes on wall-clock multiples of the interval (the quarter hour)
    /// Default: true
    #[serde(default = "default_true")]
    pub align_to_interval: bool,

    /// Liveness budget for one pass (in minutes); exceeding it is fatal
    /// Default: 20 minutes
    #[serde(default = "default_pass_timeout")]
    pub pass_timeout_minutes: u64,

    /// Upper bound on merges running at the same time within a pass
    /// Default: 2
    #[serde(default = "default_max_concurrent_merges")]
    pub max_concurrent_merges: usize,

    /// gzip compression level, 0-9
    /// Default: 6
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,

    /// Apply the size cap to first-time archives as well
    ///
    /// Off by default: a new entry stores the complete source and only later
    /// updates are capped.
    #[serde(default)]
    pub cap_first_archive: bool,

    /// Policy for files without an explicit rule
    /// Default: `plain_append`
    #[serde(default = "default_policy")]
    pub default_policy: String,

    /// Per-file policy rules, matched on the exact source file name
    #[serde(default = "default_policies")]
    pub policies: Vec<PolicyRule>,
}

/// Merge policy assigned to one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Source file name, e.g. `jniorboot.log.bak`
    pub file: String,

    /// `rotating_queue` or `plain_append`
    pub policy: String,
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("/")
}

fn default_source_extension() -> String {
    "bak".to_string()
}

fn default_archive_dir() -> PathBuf {
    PathBuf::from("/flash/baks")
}

fn default_archive_extension() -> String {
    "gz".to_string()
}

fn default_max_archive_bytes() -> usize {
    DEFAULT_MAX_ARCHIVE_BYTES
}

fn default_scan_interval() -> u64 {
    15
}

fn default_true() -> bool {
    true
}

fn default_pass_timeout() -> u64 {
    20
}

fn default_max_concurrent_merges() -> usize {
    2
}

fn default_compression_level() -> u32 {
    6
}

fn default_policy() -> String {
    MergePolicy::PlainAppend.as_str().to_string()
}

fn default_policies() -> Vec<PolicyRule> {
    // The boot log is rewritten as a queue on every boot
    vec![PolicyRule {
        file: "jniorboot.log.bak".to_string(),
        policy: MergePolicy::RotatingQueue.as_str().to_string(),
    }]
}

impl Default for ArchiverConfig {
    /// Reference deployment: `/*.bak` archived into `/flash/baks` every quarter hour
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            source_extension: default_source_extension(),
            archive_dir: default_archive_dir(),
            archive_extension: default_archive_extension(),
            max_archive_bytes: default_max_archive_bytes(),
            scan_interval_minutes: default_scan_interval(),
            align_to_interval: true,
            pass_timeout_minutes: default_pass_timeout(),
            max_concurrent_merges: default_max_concurrent_merges(),
            compression_level: default_compression_level(),
            cap_first_archive: false,
            default_policy: default_policy(),
            policies: default_policies(),
        }
    }
}

impl ArchiverConfig {
    /// Default configuration rooted at the given directories
    pub fn for_directories<P: AsRef<Path>, Q: AsRef<Path>>(source_dir: P, archive_dir: Q) -> Self {
        Self {
            source_dir: source_dir.as_ref().to_path_buf(),
            archive_dir: archive_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Load and validate configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ArchiverError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ArchiverError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ArchiverError> {
        let config: ArchiverConfig = toml::from_str(contents)
            .map_err(|e| ArchiverError::Config(format!("Failed to parse config TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges and policy names
    pub fn validate(&self) -> Result<(), ArchiverError> {
        if self.max_archive_bytes == 0 {
            return Err(ArchiverError::Config("max_archive_bytes must be positive".into()));
        }
        if self.scan_interval_minutes == 0 {
            return Err(ArchiverError::Config("scan_interval_minutes must be positive".into()));
        }
        if self.pass_timeout_minutes == 0 {
            return Err(ArchiverError::Config("pass_timeout_minutes must be positive".into()));
        }
        if self.max_concurrent_merges == 0 {
            return Err(ArchiverError::Config("max_concurrent_merges must be at least 1".into()));
        }
        if self.compression_level > 9 {
            return Err(ArchiverError::Config(format!(
                "compression_level must be 0-9, got {}",
                self.compression_level
            )));
        }

        for (field, ext) in [
            ("source_extension", &self.source_extension),
            ("archive_extension", &self.archive_extension),
        ] {
            if ext.is_empty() || ext.starts_with('.') || ext.contains('/') {
                return Err(ArchiverError::Config(format!(
                    "{} must be a bare extension like \"bak\", got {:?}",
                    field, ext
                )));
            }
        }

        self.default_policy
            .parse::<MergePolicy>()
            .map_err(ArchiverError::Config)?;
        for rule in &self.policies {
            rule.policy.parse::<MergePolicy>().map_err(|e| {
                ArchiverError::Config(format!("{} (rule for {})", e, rule.file))
            })?;
        }

        Ok(())
    }

    /// Resolve the merge policy for a source file name
    pub fn policy_for(&self, file_name: &str) -> MergePolicy {
        let default: MergePolicy = self.default_policy.parse().unwrap_or_default();
        self.policies
            .iter()
            .find(|rule| rule.file == file_name)
            .and_then(|rule| rule.policy.parse::<MergePolicy>().ok())
            .unwrap_or(default)
    }

    /// Size cap for first-time archives, if enabled
    pub fn first_archive_cap(&self) -> Option<usize> {
        self.cap_first_archive.then_some(self.max_archive_bytes)
    }

    /// Get scan interval as Duration
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_minutes * 60)
    }

    /// Get pass liveness budget as Duration
    pub fn pass_timeout(&self) -> Duration {
        Duration::from_secs(self.pass_timeout_minutes * 60)
    }
}
