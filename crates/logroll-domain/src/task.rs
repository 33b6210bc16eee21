//! Merge task - one unit of work handed from the scan to the merge engine

use crate::{MergeDecision, MergePolicy, SourceFile};

/// A qualifying (source, archive entry) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeTask {
    /// The source file to archive
    pub source: SourceFile,

    /// Logical name of the archive entry
    pub entry_name: String,

    /// `New` or `Update` for work handed to the merge engine; `Skip` only
    /// appears in scan plans used for reporting
    pub decision: MergeDecision,

    /// Policy used to locate new content
    pub policy: MergePolicy,
}

impl MergeTask {
    /// Create a new merge task
    pub fn new(
        source: SourceFile,
        entry_name: impl Into<String>,
        decision: MergeDecision,
        policy: MergePolicy,
    ) -> Self {
        Self {
            source,
            entry_name: entry_name.into(),
            decision,
            policy,
        }
    }
}
