//! Metrics collection for Archiver operations

use crate::engine::MergeReport;
use logroll_domain::{MergeDecision, TailOrigin};
use std::time::Duration;

/// Outcome of a single merge pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Candidate source files found
    pub candidates: usize,

    /// First-time archives written
    pub archived_new: usize,

    /// Existing entries updated
    pub updated: usize,

    /// Sources skipped because their entry was current
    pub skipped: usize,

    /// Merges abandoned because of an error
    pub failed: usize,

    /// Stored (compressed) bytes written
    pub bytes_written: u64,

    /// Wall time of the pass
    pub duration: Duration,
}

impl PassReport {
    /// Number of entries written in this pass
    pub fn written(&self) -> usize {
        self.archived_new + self.updated
    }
}

/// Cumulative metrics across all passes
///
/// Tracks archives written, dedup and cap effects, and failures.
#[derive(Debug, Clone, Default)]
pub struct ArchiverMetrics {
    /// Total passes completed
    pub pass_count: usize,

    /// First-time archives written
    pub archived_new: usize,

    /// Entry updates written
    pub updated: usize,

    /// Sources skipped as current
    pub skipped: usize,

    /// Per-file merges abandoned
    pub failed: usize,

    /// Stored bytes written
    pub bytes_written: u64,

    /// Source bytes recognized as already archived
    pub deduplicated_bytes: u64,

    /// Updates of rotating logs whose fingerprint was not found
    pub fingerprint_misses: usize,

    /// Bytes dropped from the front of entries by the cap
    pub trimmed_bytes: u64,

    /// Caps that had to cut mid-line
    pub hard_truncations: usize,

    /// Total runtime across passes
    pub total_runtime: Duration,
}

impl ArchiverMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successful merge
    pub fn record_merge(&mut self, report: &MergeReport) {
        match report.decision {
            MergeDecision::New => self.archived_new += 1,
            MergeDecision::Update => self.updated += 1,
            MergeDecision::Skip => {}
        }
        self.bytes_written += report.stored_len;
        self.trimmed_bytes += report.trimmed_bytes as u64;
        match report.origin {
            TailOrigin::Deduplicated { skipped } => self.deduplicated_bytes += skipped as u64,
            TailOrigin::FingerprintMissing => self.fingerprint_misses += 1,
            TailOrigin::Wholesale => {}
        }
        if report.hard_truncated {
            self.hard_truncations += 1;
        }
    }

    /// Record an abandoned merge
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Record a pass completion
    pub fn record_pass(&mut self, report: &PassReport) {
        self.pass_count += 1;
        self.skipped += report.skipped;
        self.total_runtime += report.duration;
    }

    /// Total entries written (new and updated)
    pub fn total_written(&self) -> usize {
        self.archived_new + self.updated
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Archiver Metrics Summary".to_string(),
            "========================".to_string(),
            format!("Passes: {}", self.pass_count),
            format!("Total runtime: {:.2}s", self.total_runtime.as_secs_f64()),
            String::new(),
            format!("New archives: {}", self.archived_new),
            format!("Updates: {}", self.updated),
            format!("Skipped: {}", self.skipped),
            format!("Failed: {}", self.failed),
            format!("Bytes written: {}", self.bytes_written),
        ];

        if self.deduplicated_bytes > 0 || self.fingerprint_misses > 0 {
            lines.push(String::new());
            lines.push(format!("Deduplicated bytes: {}", self.deduplicated_bytes));
            lines.push(format!("Fingerprint misses: {}", self.fingerprint_misses));
        }

        if self.trimmed_bytes > 0 {
            lines.push(String::new());
            lines.push(format!("Trimmed bytes: {}", self.trimmed_bytes));
            lines.push(format!("Hard truncations: {}", self.hard_truncations));
        }

        lines.join("\n")
    }
}
