//! Background worker for scheduled merge passes

use crate::{Archiver, ArchiverConfig, ArchiverError, ArchiverMetrics, PassReport};
use logroll_domain::traits::{ArchiveStore, SourceCatalog};
use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::time::{interval, sleep, timeout, Duration};

/// Delay from `now` until the next wall-clock multiple of `period`
///
/// Always positive: at an exact boundary the full period is returned, so the
/// first pass after start never runs immediately.
pub fn delay_until_boundary(now: SystemTime, period: Duration) -> Duration {
    let period_ms = period.as_millis().max(1);
    let now_ms = now.duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    let wait_ms = period_ms - (now_ms % period_ms);
    Duration::from_millis(u64::try_from(wait_ms).unwrap_or(u64::MAX))
}

/// Background worker that runs merge passes on a schedule
///
/// Each pass runs on the blocking thread pool under a liveness budget. Exceeding
/// the budget is fatal: the worker returns [`ArchiverError::PassTimeout`] so the
/// process exits and its supervisor restarts it. Other pass errors are logged
/// and the schedule continues.
///
/// # Examples
///
/// ```no_run
/// use logroll_archiver::{ArchiverConfig, ArchiverWorker};
/// use logroll_store::{DirectorySource, GzipArchive};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ArchiverConfig::default();
///     let catalog = Arc::new(DirectorySource::new(&config.source_dir, &config.source_extension));
///     let archive = Arc::new(GzipArchive::open(&config.archive_dir, config.compression_level)?);
///     let mut worker = ArchiverWorker::new(config);
///
///     // Run until Ctrl+C
///     worker.run(catalog, archive, async {
///         let _ = tokio::signal::ctrl_c().await;
///     }).await?;
///     Ok(())
/// }
/// ```
pub struct ArchiverWorker {
    archiver: Arc<Mutex<Archiver>>,
    interval: Duration,
    align: bool,
    pass_timeout: Duration,
}

impl ArchiverWorker {
    /// Create a new background worker with the given configuration
    pub fn new(config: ArchiverConfig) -> Self {
        let interval = config.scan_interval();
        let align = config.align_to_interval;
        let pass_timeout = config.pass_timeout();
        Self {
            archiver: Arc::new(Mutex::new(Archiver::new(config))),
            interval,
            align,
            pass_timeout,
        }
    }

    /// Create a worker with default configuration
    pub fn default_config() -> Self {
        Self::new(ArchiverConfig::default())
    }

    /// Override the pass interval (disables wall-clock alignment)
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self.align = false;
        self
    }

    /// Override the per-pass liveness budget
    pub fn with_pass_timeout(mut self, pass_timeout: Duration) -> Self {
        self.pass_timeout = pass_timeout;
        self
    }

    /// Delay before the next scheduled pass
    fn next_delay(&self) -> Duration {
        if self.align {
            delay_until_boundary(SystemTime::now(), self.interval)
        } else {
            self.interval
        }
    }

    /// Run the worker until `shutdown` resolves
    ///
    /// The first pass happens at the first interval boundary after start. A
    /// pass in progress is allowed to finish before shutdown is honored, since
    /// its entry writes are atomic but not interruptible.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiverError::PassTimeout`] if a pass exceeds its budget, or a
    /// worker error if the blocking task cannot be joined.
    pub async fn run<C, S, F>(&mut self, catalog: Arc<C>, store: Arc<S>, shutdown: F) -> Result<(), ArchiverError>
    where
        C: SourceCatalog + Send + Sync + 'static,
        S: ArchiveStore + Send + Sync + 'static,
        C::Error: Display,
        S::Error: Display,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        tracing::info!(
            "Archiver worker started (interval: {:?}, aligned: {}, pass budget: {:?})",
            self.interval,
            self.align,
            self.pass_timeout
        );

        loop {
            let delay = self.next_delay();
            tracing::debug!("Next pass in {:?}", delay);

            tokio::select! {
                _ = sleep(delay) => {}
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received, stopping archiver");
                    break;
                }
            }

            match self.run_pass(Arc::clone(&catalog), Arc::clone(&store)).await {
                Ok(_) => {}
                Err(e @ ArchiverError::PassTimeout(_)) | Err(e @ ArchiverError::Worker(_)) => {
                    tracing::error!("Fatal: {}", e);
                    return Err(e);
                }
                Err(e) => {
                    tracing::error!("Pass failed: {}", e);
                }
            }
        }

        let metrics = self.metrics()?;
        tracing::info!("Archiver stopped. Final metrics:\n{}", metrics.summary());

        Ok(())
    }

    /// Run a specific number of passes (useful for testing and one-shot runs)
    ///
    /// The first pass starts immediately; later ones follow the interval.
    /// Any pass error stops the run.
    pub async fn run_cycles<C, S>(&mut self, catalog: Arc<C>, store: Arc<S>, cycles: usize) -> Result<Vec<PassReport>, ArchiverError>
    where
        C: SourceCatalog + Send + Sync + 'static,
        S: ArchiveStore + Send + Sync + 'static,
        C::Error: Display,
        S::Error: Display,
    {
        let mut ticker = interval(self.interval);
        let mut reports = Vec::with_capacity(cycles);

        tracing::info!(
            "Archiver worker started for {} cycles (interval: {:?})",
            cycles,
            self.interval
        );

        for cycle in 0..cycles {
            ticker.tick().await;
            tracing::debug!("Starting pass {}/{}", cycle + 1, cycles);

            match self.run_pass(Arc::clone(&catalog), Arc::clone(&store)).await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    tracing::error!("Pass {}/{} failed: {}", cycle + 1, cycles, e);
                    return Err(e);
                }
            }
        }

        Ok(reports)
    }

    /// Run one pass on the blocking pool, bounded by the liveness budget
    async fn run_pass<C, S>(&self, catalog: Arc<C>, store: Arc<S>) -> Result<PassReport, ArchiverError>
    where
        C: SourceCatalog + Send + Sync + 'static,
        S: ArchiveStore + Send + Sync + 'static,
        C::Error: Display,
        S::Error: Display,
    {
        let archiver = Arc::clone(&self.archiver);

        let handle = tokio::task::spawn_blocking(move || {
            let mut archiver = archiver
                .lock()
                .map_err(|_| ArchiverError::Worker("archiver state poisoned".to_string()))?;
            archiver.pass(catalog.as_ref(), store.as_ref())
        });

        timeout(self.pass_timeout, handle)
            .await
            .map_err(|_| ArchiverError::PassTimeout(self.pass_timeout))?
            .map_err(|e| ArchiverError::Worker(format!("Task join error: {}", e)))?
    }

    /// Snapshot of the cumulative metrics
    pub fn metrics(&self) -> Result<ArchiverMetrics, ArchiverError> {
        self.archiver
            .lock()
            .map(|archiver| archiver.metrics().clone())
            .map_err(|_| ArchiverError::Worker("archiver state poisoned".to_string()))
    }

    /// Reset the archiver's metrics counters
    pub fn reset_metrics(&self) -> Result<(), ArchiverError> {
        self.archiver
            .lock()
            .map(|mut archiver| archiver.reset_metrics())
            .map_err(|_| ArchiverError::Worker("archiver state poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, MemoryArchive, MemorySources};

    #[test]
    fn test_delay_until_boundary() {
        let quarter = Duration::from_secs(15 * 60);

        // 10:07:30 -> 10:15:00
        let now = UNIX_EPOCH + Duration::from_secs(10 * 3600 + 7 * 60 + 30);
        assert_eq!(delay_until_boundary(now, quarter), Duration::from_secs(7 * 60 + 30));

        // Exactly on a boundary waits a full period
        let now = UNIX_EPOCH + Duration::from_secs(10 * 3600);
        assert_eq!(delay_until_boundary(now, quarter), quarter);

        let now = UNIX_EPOCH + Duration::from_millis(10 * 3600 * 1000 + 1);
        assert_eq!(delay_until_boundary(now, quarter), quarter - Duration::from_millis(1));
    }

    #[tokio::test]
    async fn test_worker_creation() {
        let worker = ArchiverWorker::default_config();
        assert_eq!(worker.metrics().unwrap().pass_count, 0);
        assert_eq!(worker.interval, Duration::from_secs(15 * 60));
        assert!(worker.align);
    }

    #[tokio::test]
    async fn test_run_cycles() {
        let mut sources = MemorySources::new();
        sources.add("jniorboot.log.bak", b"boot\n", at(100));
        let sources = Arc::new(sources);
        let archive = Arc::new(MemoryArchive::new());

        let mut worker = ArchiverWorker::default_config().with_interval(Duration::from_millis(10));
        let reports = worker
            .run_cycles(Arc::clone(&sources), Arc::clone(&archive), 2)
            .await
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].archived_new, 1);
        assert_eq!(reports[1].skipped, 1);
        assert_eq!(worker.metrics().unwrap().pass_count, 2);
        assert_eq!(archive.get("jniorboot.log.gz").unwrap(), b"boot\n");
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let sources = Arc::new(MemorySources::new());
        let archive = Arc::new(MemoryArchive::new());

        let mut worker = ArchiverWorker::default_config().with_interval(Duration::from_millis(5));
        worker
            .run(sources, archive, sleep(Duration::from_millis(60)))
            .await
            .unwrap();

        assert!(worker.metrics().unwrap().pass_count >= 1);
    }

    #[tokio::test]
    async fn test_shutdown_before_first_pass() {
        let mut worker = ArchiverWorker::default_config();
        worker
            .run(Arc::new(MemorySources::new()), Arc::new(MemoryArchive::new()), async {})
            .await
            .unwrap();

        assert_eq!(worker.metrics().unwrap().pass_count, 0);
    }

    #[tokio::test]
    async fn test_reset_metrics() {
        let mut worker = ArchiverWorker::default_config().with_interval(Duration::from_millis(10));
        worker
            .run_cycles(Arc::new(MemorySources::new()), Arc::new(MemoryArchive::new()), 1)
            .await
            .unwrap();
        assert_eq!(worker.metrics().unwrap().pass_count, 1);

        worker.reset_metrics().unwrap();
        assert_eq!(worker.metrics().unwrap().pass_count, 0);
    }
}
