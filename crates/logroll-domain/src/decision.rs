//! Merge decision module - what a scan decides for one source file

use std::time::SystemTime;

/// Outcome of comparing a source file against its archive entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeDecision {
    /// No archive entry exists yet: first-time archival
    New,

    /// The archive entry exists and the source is strictly newer
    Update,

    /// The archive entry is as new as or newer than the source
    Skip,
}

impl MergeDecision {
    /// Decide what to do with a source given its entry's timestamp (if any)
    ///
    /// An entry stamped at or after the source's modification time is skipped,
    /// which keeps repeated scans idempotent until the source changes again.
    ///
    /// # Examples
    ///
    /// ```
    /// use logroll_domain::MergeDecision;
    /// use std::time::{Duration, SystemTime};
    ///
    /// let t = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
    /// assert_eq!(MergeDecision::decide(None, t), MergeDecision::New);
    /// assert_eq!(MergeDecision::decide(Some(t), t), MergeDecision::Skip);
    /// ```
    pub fn decide(entry_modified: Option<SystemTime>, source_modified: SystemTime) -> Self {
        match entry_modified {
            None => MergeDecision::New,
            Some(entry) if entry >= source_modified => MergeDecision::Skip,
            Some(_) => MergeDecision::Update,
        }
    }

    /// Get the decision name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeDecision::New => "new",
            MergeDecision::Update => "update",
            MergeDecision::Skip => "skip",
        }
    }

    /// Whether this decision requires a merge
    pub fn needs_merge(&self) -> bool {
        !matches!(self, MergeDecision::Skip)
    }
}

impl std::fmt::Display for MergeDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
