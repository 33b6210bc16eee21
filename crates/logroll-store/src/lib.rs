//! Logroll Storage Layer
//!
//! Implements the SourceCatalog and ArchiveStore traits on top of the local filesystem.
//!
//! # Architecture
//!
//! - [`DirectorySource`] enumerates candidate logs in a flat root directory
//! - [`GzipArchive`] keeps one gzip file per logical entry in the destination directory
//! - [`InstanceLock`] guards against two archivers sharing one destination
//!
//! Entry replacement stages the compressed data in a temporary file inside the archive
//! directory, syncs it, and renames it over the old entry. Readers of any entry see
//! either the old or the new version.
//!
//! # Examples
//!
//! ```no_run
//! use logroll_domain::traits::ArchiveStore;
//! use logroll_store::GzipArchive;
//!
//! let archive = GzipArchive::open("/flash/baks", 6).unwrap();
//! archive.replace_entry("boot.log.gz", b"line\n", None).unwrap();
//! ```

#![warn(missing_docs)]

mod archive;
mod error;
mod lock;
mod source;

pub use archive::GzipArchive;
pub use error::StoreError;
pub use lock::InstanceLock;
pub use source::DirectorySource;
