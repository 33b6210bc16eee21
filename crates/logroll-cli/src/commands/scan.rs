//! Scan command implementation.

use crate::cli::ScanArgs;
use crate::error::Result;
use crate::output::Formatter;
use logroll_archiver::{ArchiverConfig, ScanCoordinator};
use logroll_store::{DirectorySource, GzipArchive};

/// Execute the scan command: print each candidate and its decision.
///
/// The archive is only inspected, so this is safe to run next to a live worker.
pub fn execute_scan(args: ScanArgs, config: ArchiverConfig, formatter: &Formatter) -> Result<()> {
    let catalog = DirectorySource::new(&config.source_dir, &config.source_extension);
    let archive = GzipArchive::inspect(&config.archive_dir);

    let plan = ScanCoordinator::new(config).plan(&catalog, &archive)?;

    if args.json {
        println!("{}", formatter.format_plan_json(&plan)?);
    } else {
        println!("{}", formatter.format_plan(&plan));
    }

    Ok(())
}
