//! Logroll Domain Layer
//!
//! This crate contains the core model and merge algorithm for Logroll, the incremental
//! log archiver. It has ZERO runtime dependencies and defines the value types, the pure
//! merge logic, and the trait interfaces that the storage and scheduling layers implement.
//!
//! ## Key Concepts
//!
//! - **SourceFile**: A live, append-mostly text log owned by an external writer
//! - **Archive entry**: The compressed, persisted counterpart of a source file
//! - **MergeDecision**: Whether a source needs a first archival, an update, or nothing
//! - **MergePolicy**: How new content is located (`RotatingQueue` dedups, `PlainAppend` does not)
//! - **Merge**: Dedup, concatenate, then cap to a byte budget on a line boundary
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure logic only; all I/O goes through [`traits::SourceCatalog`] and [`traits::ArchiveStore`]
//! - Offsets are raw byte offsets, newlines are `\n` only

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod decision;
pub mod entry;
pub mod merge;
pub mod policy;
pub mod source;
pub mod task;
pub mod traits;

// Re-exports for convenience
pub use decision::MergeDecision;
pub use entry::ArchiveEntryInfo;
pub use merge::{CapOutcome, MergeOutcome, TailOrigin, DEFAULT_MAX_ARCHIVE_BYTES};
pub use policy::MergePolicy;
pub use source::{archive_name, SourceFile};
pub use task::MergeTask;
