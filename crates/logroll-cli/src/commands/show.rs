//! Show command implementation.

use crate::cli::ShowArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use logroll_archiver::ArchiverConfig;
use logroll_domain::traits::ArchiveStore;
use logroll_store::GzipArchive;
use std::io::Write;

/// Execute the show command.
///
/// With an entry name, writes the decompressed entry to stdout unchanged.
/// Without one, lists the entries in the archive.
pub fn execute_show(args: ShowArgs, config: ArchiverConfig, formatter: &Formatter) -> Result<()> {
    let archive = GzipArchive::inspect(&config.archive_dir);

    match args.entry {
        Some(name) => {
            let content = archive
                .read_entry(&name)?
                .ok_or(CliError::EntryNotFound(name))?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&content)?;
            stdout.flush()?;
        }
        None => {
            let mut entries = Vec::new();
            for name in archive.list_entries()? {
                if let Some(info) = archive.entry_info(&name)? {
                    entries.push(info);
                }
            }
            println!("{}", formatter.format_entries(&entries));
        }
    }

    Ok(())
}
