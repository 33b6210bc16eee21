//! Once command implementation.

use crate::error::{CliError, Result};
use crate::output::Formatter;
use logroll_archiver::{ArchiverConfig, ArchiverWorker};
use logroll_store::{DirectorySource, GzipArchive};
use std::sync::Arc;

/// Execute the once command: a single pass, then a metrics summary.
pub async fn execute_once(config: ArchiverConfig, formatter: &Formatter) -> Result<()> {
    let (archive, _lock) = GzipArchive::open_exclusive(&config.archive_dir, config.compression_level)?;
    let catalog = DirectorySource::new(&config.source_dir, &config.source_extension);

    let mut worker = ArchiverWorker::new(config);
    let reports = worker.run_cycles(Arc::new(catalog), Arc::new(archive), 1).await?;
    let report = reports
        .first()
        .ok_or_else(|| CliError::Config("pass produced no report".to_string()))?;

    println!("{}", formatter.pass_result(report));
    println!();
    println!("{}", worker.metrics()?.summary());

    Ok(())
}
