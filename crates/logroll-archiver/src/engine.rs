//! Merge engine - runs one task's read, merge, and write-back

use crate::{ArchiverConfig, ArchiverError};
use logroll_domain::merge::{first_archive, merge};
use logroll_domain::traits::{ArchiveStore, SourceCatalog};
use logroll_domain::{MergeDecision, MergeTask, TailOrigin};
use std::fmt::Display;
use std::time::{Duration, Instant};

/// What one merge did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Source file name
    pub source_name: String,

    /// Archive entry name
    pub entry_name: String,

    /// Decision the merge acted on
    pub decision: MergeDecision,

    /// How the appended tail was located
    pub origin: TailOrigin,

    /// Decompressed size of the written entry
    pub content_len: usize,

    /// Stored (compressed) size of the written entry
    pub stored_len: u64,

    /// Source bytes appended before capping
    pub appended: usize,

    /// Bytes dropped from the front by the cap
    pub trimmed_bytes: usize,

    /// True when the cap cut mid-line
    pub hard_truncated: bool,

    /// Time spent on this file
    pub duration: Duration,
}

/// Executes merge tasks against a catalog and an archive
///
/// Each task is strictly sequential: read entry, read source, merge, replace.
/// A failure at any step leaves the existing entry untouched.
#[derive(Debug, Clone)]
pub struct MergeEngine {
    max_archive_bytes: usize,
    first_archive_cap: Option<usize>,
}

impl MergeEngine {
    /// Create an engine with the size rules of `config`
    pub fn new(config: &ArchiverConfig) -> Self {
        Self {
            max_archive_bytes: config.max_archive_bytes,
            first_archive_cap: config.first_archive_cap(),
        }
    }

    /// Run one merge task to completion
    ///
    /// The written entry is stamped with the source's modification time seen
    /// at scan time, so the next scan skips it unless the source changed again.
    pub fn process<C, S>(&self, task: &MergeTask, catalog: &C, store: &S) -> Result<MergeReport, ArchiverError>
    where
        C: SourceCatalog,
        S: ArchiveStore,
        C::Error: Display,
        S::Error: Display,
    {
        let start = Instant::now();

        let previous = match task.decision {
            MergeDecision::Update => store
                .read_entry(&task.entry_name)
                .map_err(|e| ArchiverError::Store(format!("{}: {}", task.entry_name, e)))?,
            MergeDecision::New => None,
            MergeDecision::Skip => {
                return Err(ArchiverError::Worker(format!(
                    "{} is current and should not have been scheduled",
                    task.source.name
                )))
            }
        };

        let source = catalog
            .read_source(&task.source)
            .map_err(|e| ArchiverError::Source(format!("{}: {}", task.source.name, e)))?;

        let (decision, outcome) = match previous {
            Some(previous) => (
                MergeDecision::Update,
                merge(&previous, &source, task.policy, self.max_archive_bytes),
            ),
            None => {
                if task.decision == MergeDecision::Update {
                    tracing::debug!("{} vanished since the scan, archiving from scratch", task.entry_name);
                }
                (MergeDecision::New, first_archive(&source, self.first_archive_cap))
            }
        };

        if outcome.hard_truncated {
            tracing::warn!(
                "{}: no line boundary within the last {} bytes, cut mid-line ({} bytes dropped)",
                task.entry_name,
                self.max_archive_bytes,
                outcome.trimmed_bytes
            );
        }
        if let TailOrigin::FingerprintMissing = outcome.origin {
            tracing::debug!("{}: last archived line not found, appending full source", task.source.name);
        }

        let info = store
            .replace_entry(&task.entry_name, &outcome.content, Some(task.source.modified))
            .map_err(|e| ArchiverError::Store(format!("{}: {}", task.entry_name, e)))?;

        let duration = start.elapsed();
        tracing::info!(
            "Archived /{} ({} bytes, {} stored, {:.2} secs)",
            task.source.name,
            outcome.content.len(),
            info.stored_len,
            duration.as_secs_f64()
        );

        Ok(MergeReport {
            source_name: task.source.name.clone(),
            entry_name: task.entry_name.clone(),
            decision,
            origin: outcome.origin,
            content_len: outcome.content.len(),
            stored_len: info.stored_len,
            appended: outcome.appended,
            trimmed_bytes: outcome.trimmed_bytes,
            hard_truncated: outcome.hard_truncated,
            duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, MemoryArchive, MemorySources};
    use logroll_domain::{MergePolicy, SourceFile};

    fn task(sources: &MemorySources, name: &str, decision: MergeDecision, policy: MergePolicy) -> MergeTask {
        let source: SourceFile = sources
            .list_sources()
            .unwrap()
            .into_iter()
            .find(|s| s.name == name)
            .unwrap();
        let entry = logroll_domain::archive_name(name, "bak", "gz");
        MergeTask::new(source, entry, decision, policy)
    }

    fn engine(max: usize) -> MergeEngine {
        let config = ArchiverConfig {
            max_archive_bytes: max,
            ..Default::default()
        };
        MergeEngine::new(&config)
    }

    #[test]
    fn test_new_archive_stores_full_source() {
        let mut sources = MemorySources::new();
        let content = b"line one\nline two\nline three\n";
        sources.add("boot.log.bak", content, at(50));
        let archive = MemoryArchive::new();

        // Budget smaller than the source: first archives are not capped
        let report = engine(10)
            .process(&task(&sources, "boot.log.bak", MergeDecision::New, MergePolicy::PlainAppend), &sources, &archive)
            .unwrap();

        assert_eq!(archive.get("boot.log.gz").unwrap(), content);
        assert_eq!(archive.modified("boot.log.gz"), Some(at(50)));
        assert_eq!(report.decision, MergeDecision::New);
        assert_eq!(report.trimmed_bytes, 0);
    }

    #[test]
    fn test_new_archive_capped_when_enabled() {
        let mut sources = MemorySources::new();
        sources.add("boot.log.bak", b"aaaa\nbbbb\ncccc\n", at(50));
        let archive = MemoryArchive::new();

        let config = ArchiverConfig {
            max_archive_bytes: 6,
            cap_first_archive: true,
            ..Default::default()
        };
        MergeEngine::new(&config)
            .process(&task(&sources, "boot.log.bak", MergeDecision::New, MergePolicy::PlainAppend), &sources, &archive)
            .unwrap();

        assert_eq!(archive.get("boot.log.gz").unwrap(), b"cccc\n");
    }

    #[test]
    fn test_update_dedups_rotating_log() {
        let mut sources = MemorySources::new();
        sources.add("jniorboot.log.bak", b"08:00 L\n08:15 X\n08:30 Y\n", at(200));
        let archive = MemoryArchive::new();
        archive.insert("jniorboot.log.gz", b"07:45 K\n08:00 L\n", at(100));

        let report = engine(1024)
            .process(
                &task(&sources, "jniorboot.log.bak", MergeDecision::Update, MergePolicy::RotatingQueue),
                &sources,
                &archive,
            )
            .unwrap();

        assert_eq!(
            archive.get("jniorboot.log.gz").unwrap(),
            b"07:45 K\n08:00 L\n08:15 X\n08:30 Y\n"
        );
        assert_eq!(report.origin, TailOrigin::Deduplicated { skipped: 8 });
        assert_eq!(archive.modified("jniorboot.log.gz"), Some(at(200)));
    }

    #[test]
    fn test_update_caps_to_budget() {
        let mut sources = MemorySources::new();
        sources.add("a.log.bak", b"cc\ndd\n", at(200));
        let archive = MemoryArchive::new();
        archive.insert("a.log.gz", b"aa\nbb\n", at(100));

        let report = engine(7)
            .process(&task(&sources, "a.log.bak", MergeDecision::Update, MergePolicy::PlainAppend), &sources, &archive)
            .unwrap();

        // "aa\nbb\ncc\ndd\n" is 12 bytes; the window starts at 5 ("\ncc\ndd\n")
        assert_eq!(archive.get("a.log.gz").unwrap(), b"cc\ndd\n");
        assert_eq!(report.trimmed_bytes, 6);
        assert!(!report.hard_truncated);
    }

    #[test]
    fn test_source_read_failure_leaves_entry_untouched() {
        let mut sources = MemorySources::new();
        sources.add("a.log.bak", b"new\n", at(200));
        sources.fail_read_on("a.log.bak");
        let archive = MemoryArchive::new();
        archive.insert("a.log.gz", b"old\n", at(100));

        let result = engine(1024).process(
            &task(&sources, "a.log.bak", MergeDecision::Update, MergePolicy::PlainAppend),
            &sources,
            &archive,
        );

        assert!(matches!(result, Err(ArchiverError::Source(_))));
        assert_eq!(archive.get("a.log.gz").unwrap(), b"old\n");
        assert_eq!(archive.modified("a.log.gz"), Some(at(100)));
    }

    #[test]
    fn test_vanished_entry_archives_from_scratch() {
        let mut sources = MemorySources::new();
        sources.add("a.log.bak", b"fresh\n", at(300));
        let archive = MemoryArchive::new();

        let report = engine(1024)
            .process(&task(&sources, "a.log.bak", MergeDecision::Update, MergePolicy::RotatingQueue), &sources, &archive)
            .unwrap();

        assert_eq!(report.decision, MergeDecision::New);
        assert_eq!(archive.get("a.log.gz").unwrap(), b"fresh\n");
    }

    #[test]
    fn test_skip_task_is_rejected() {
        let mut sources = MemorySources::new();
        sources.add("a.log.bak", b"x\n", at(1));
        let archive = MemoryArchive::new();

        let result = engine(1024).process(
            &task(&sources, "a.log.bak", MergeDecision::Skip, MergePolicy::PlainAppend),
            &sources,
            &archive,
        );
        assert!(result.is_err());
        assert!(archive.get("a.log.gz").is_none());
    }
}
