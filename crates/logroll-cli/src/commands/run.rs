//! Run command implementation.

use crate::error::Result;
use crate::output::Formatter;
use logroll_archiver::{ArchiverConfig, ArchiverWorker};
use logroll_store::{DirectorySource, GzipArchive};
use std::sync::Arc;

/// Execute the run command: archive on schedule until Ctrl+C.
pub async fn execute_run(config: ArchiverConfig, formatter: &Formatter) -> Result<()> {
    let (archive, _lock) = GzipArchive::open_exclusive(&config.archive_dir, config.compression_level)?;
    let catalog = DirectorySource::new(&config.source_dir, &config.source_extension);

    eprintln!(
        "{}",
        formatter.info(&format!(
            "Archiving {}/*.{} into {}",
            config.source_dir.display(),
            config.source_extension,
            config.archive_dir.display()
        ))
    );

    let mut worker = ArchiverWorker::new(config);
    worker
        .run(Arc::new(catalog), Arc::new(archive), shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on Ctrl+C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
