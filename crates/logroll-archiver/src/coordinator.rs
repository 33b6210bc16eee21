//! Scan coordinator - decides which sources need merging

use crate::{ArchiverConfig, ArchiverError};
use logroll_domain::traits::{ArchiveStore, SourceCatalog};
use logroll_domain::{archive_name, MergeDecision, MergeTask};
use std::fmt::Display;

/// Compares each candidate source against its archive entry
///
/// Scanning has no side effects: only metadata is read, no file body is
/// opened and nothing is written.
#[derive(Debug, Clone)]
pub struct ScanCoordinator {
    config: ArchiverConfig,
}

impl ScanCoordinator {
    /// Create a coordinator using the naming and policy rules of `config`
    pub fn new(config: ArchiverConfig) -> Self {
        Self { config }
    }

    /// Produce the merge tasks for one pass
    ///
    /// Sources whose entry is already current are left out. No candidates
    /// means an empty list.
    pub fn scan<C, S>(&self, catalog: &C, store: &S) -> Result<Vec<MergeTask>, ArchiverError>
    where
        C: SourceCatalog,
        S: ArchiveStore,
        C::Error: Display,
        S::Error: Display,
    {
        Ok(self
            .plan(catalog, store)?
            .into_iter()
            .filter(|task| task.decision.needs_merge())
            .collect())
    }

    /// Decide for every candidate, including the ones that will be skipped
    ///
    /// A source whose entry cannot be looked up is logged and left out of the
    /// plan; it is retried on the next pass.
    pub fn plan<C, S>(&self, catalog: &C, store: &S) -> Result<Vec<MergeTask>, ArchiverError>
    where
        C: SourceCatalog,
        S: ArchiveStore,
        C::Error: Display,
        S::Error: Display,
    {
        let sources = catalog
            .list_sources()
            .map_err(|e| ArchiverError::Source(e.to_string()))?;

        if sources.is_empty() {
            tracing::debug!("No candidate sources found");
            return Ok(Vec::new());
        }

        let mut plan = Vec::with_capacity(sources.len());
        for source in sources {
            let entry_name = archive_name(
                &source.name,
                &self.config.source_extension,
                &self.config.archive_extension,
            );

            let entry = match store.entry_info(&entry_name) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Cannot inspect archive entry {}: {}", entry_name, e);
                    continue;
                }
            };

            let decision = MergeDecision::decide(entry.map(|e| e.modified), source.modified);
            let policy = self.config.policy_for(&source.name);
            tracing::debug!("{} -> {} ({}, {})", source.name, entry_name, decision, policy);

            plan.push(MergeTask::new(source, entry_name, decision, policy));
        }

        Ok(plan)
    }
}
