//! Logroll Archiver
//!
//! Scheduling and merge orchestration for the incremental log archiver.
//!
//! # Overview
//!
//! The archiver is responsible for:
//! - **Scanning**: Pairing every candidate log with its archive entry and deciding
//!   New, Update or Skip from the two modification times
//! - **Merging**: Appending only what the archive has not seen yet and trimming the
//!   result to the byte budget on a line boundary
//! - **Scheduling**: Running a pass on every quarter-hour boundary under a liveness budget
//! - **Metrics collection**: Counting archived, updated, skipped and failed files
//!
//! ## Policies
//!
//! | Policy | New content | Typical source |
//! |--------|-------------|----------------|
//! | **rotating_queue** | Everything after the last archived line | `jniorboot.log.bak` |
//! | **plain_append** | The whole source | Every other `.bak` |
//!
//! # Usage
//!
//! ## One-time Pass
//!
//! ```no_run
//! use logroll_archiver::{Archiver, ArchiverConfig};
//! use logroll_store::{DirectorySource, GzipArchive};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ArchiverConfig::for_directories("/", "/flash/baks");
//! let catalog = DirectorySource::new(&config.source_dir, &config.source_extension);
//! let archive = GzipArchive::open(&config.archive_dir, config.compression_level)?;
//! let mut archiver = Archiver::new(config);
//!
//! let report = archiver.pass(&catalog, &archive)?;
//! println!("{} written, {} skipped", report.written(), report.skipped);
//! println!("{}", archiver.metrics().summary());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! The archiver can be configured via TOML:
//!
//! ```toml
//! source_dir = "/"
//! source_extension = "bak"
//! archive_dir = "/flash/baks"
//! archive_extension = "gz"
//! max_archive_bytes = 2621440
//! scan_interval_minutes = 15
//! pass_timeout_minutes = 20
//! default_policy = "plain_append"
//!
//! [[policies]]
//! file = "jniorboot.log.bak"
//! policy = "rotating_queue"
//! ```

#![warn(missing_docs)]

mod archiver;
mod config;
mod coordinator;
mod engine;
mod error;
mod metrics;
mod worker;

#[cfg(test)]
mod testing;

pub use archiver::Archiver;
pub use config::{ArchiverConfig, PolicyRule};
pub use coordinator::ScanCoordinator;
pub use engine::{MergeEngine, MergeReport};
pub use error::ArchiverError;
pub use metrics::{ArchiverMetrics, PassReport};
pub use worker::{delay_until_boundary, ArchiverWorker};
