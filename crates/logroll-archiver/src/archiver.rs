//! Core Archiver implementation: one merge pass over all candidates

use crate::engine::{MergeEngine, MergeReport};
use crate::{ArchiverConfig, ArchiverError, ArchiverMetrics, PassReport, ScanCoordinator};
use logroll_domain::traits::{ArchiveStore, SourceCatalog};
use logroll_domain::{MergeDecision, MergeTask};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::fmt::Display;
use std::time::Instant;

/// Archiver service driving scan and merge
///
/// Responsible for:
/// - Scanning candidates and deciding New / Update / Skip
/// - Running the merges of a pass, several at a time
/// - Isolating per-file failures so one bad file never stops the others
/// - Collecting metrics
///
/// # Examples
///
/// ```no_run
/// use logroll_archiver::{Archiver, ArchiverConfig};
/// use logroll_store::{DirectorySource, GzipArchive};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ArchiverConfig::default();
/// let catalog = DirectorySource::new(&config.source_dir, &config.source_extension);
/// let archive = GzipArchive::open(&config.archive_dir, config.compression_level)?;
/// let mut archiver = Archiver::new(config);
///
/// let report = archiver.pass(&catalog, &archive)?;
/// println!("{} entries written", report.written());
/// # Ok(())
/// # }
/// ```
pub struct Archiver {
    config: ArchiverConfig,
    coordinator: ScanCoordinator,
    engine: MergeEngine,
    metrics: ArchiverMetrics,
}

impl Archiver {
    /// Create a new Archiver with the given configuration
    pub fn new(config: ArchiverConfig) -> Self {
        Self {
            coordinator: ScanCoordinator::new(config.clone()),
            engine: MergeEngine::new(&config),
            config,
            metrics: ArchiverMetrics::new(),
        }
    }

    /// Create an Archiver with default configuration
    pub fn default_config() -> Self {
        Self::new(ArchiverConfig::default())
    }

    /// The active configuration
    pub fn config(&self) -> &ArchiverConfig {
        &self.config
    }

    /// The scan coordinator used by passes
    pub fn coordinator(&self) -> &ScanCoordinator {
        &self.coordinator
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &ArchiverMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Perform one complete merge pass
    ///
    /// This is the main entry point. It:
    /// 1. Scans all candidates against their archive entries
    /// 2. Merges every `New` / `Update` task, up to `max_concurrent_merges` at once
    /// 3. Logs and counts per-file failures without aborting the pass
    ///
    /// Only a failure to enumerate candidates fails the pass itself.
    pub fn pass<C, S>(&mut self, catalog: &C, store: &S) -> Result<PassReport, ArchiverError>
    where
        C: SourceCatalog + Sync,
        S: ArchiveStore + Sync,
        C::Error: Display,
        S::Error: Display,
    {
        let start = Instant::now();

        let plan = self.coordinator.plan(catalog, store)?;
        let candidates = plan.len();
        let (tasks, skipped): (Vec<MergeTask>, Vec<MergeTask>) =
            plan.into_iter().partition(|task| task.decision.needs_merge());

        let results = self.run_tasks(&tasks, catalog, store);

        let mut report = PassReport {
            candidates,
            skipped: skipped.len(),
            ..Default::default()
        };
        for (task, result) in tasks.iter().zip(results) {
            match result {
                Ok(merged) => {
                    match merged.decision {
                        MergeDecision::New => report.archived_new += 1,
                        _ => report.updated += 1,
                    }
                    report.bytes_written += merged.stored_len;
                    self.metrics.record_merge(&merged);
                }
                Err(e) => {
                    tracing::warn!("Merge of {} abandoned until next pass: {}", task.source.name, e);
                    report.failed += 1;
                    self.metrics.record_failure();
                }
            }
        }

        report.duration = start.elapsed();
        self.metrics.record_pass(&report);

        tracing::info!(
            "Pass completed: {} candidates, {} new, {} updated, {} skipped, {} failed ({:.2} secs)",
            report.candidates,
            report.archived_new,
            report.updated,
            report.skipped,
            report.failed,
            report.duration.as_secs_f64()
        );

        Ok(report)
    }

    /// Run tasks on a bounded pool; results keep task order
    fn run_tasks<C, S>(&self, tasks: &[MergeTask], catalog: &C, store: &S) -> Vec<Result<MergeReport, ArchiverError>>
    where
        C: SourceCatalog + Sync,
        S: ArchiveStore + Sync,
        C::Error: Display,
        S::Error: Display,
    {
        let process = |task: &MergeTask| self.engine.process(task, catalog, store);

        let threads = self.config.max_concurrent_merges.min(tasks.len());
        if threads <= 1 {
            return tasks.iter().map(process).collect();
        }

        ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map(|pool| pool.install(|| tasks.par_iter().map(process).collect::<Vec<_>>()))
            .unwrap_or_else(|e| {
                tracing::debug!("Merge pool unavailable ({}), merging sequentially", e);
                tasks.iter().map(process).collect()
            })
    }
}
