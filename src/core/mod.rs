//! Core engine
//!
//! Business logic layered over the record types:
//!
//! - [`batch`] - the batch state machine: `verify` / `build` / `validate`
//! - [`iat_batch`] - the international batch variant
//! - [`file`] - the file aggregator and its derived control record
//! - [`merge`] - consolidation of many files under the line limit
//!
//! Per-Standard-Entry-Class rule sets live in the private `sec` module and
//! are reached through `Batch::validate`.

pub mod batch;
pub mod file;
pub mod iat_batch;
pub mod merge;
pub(crate) mod sec;

pub use batch::Batch;
pub use file::File;
pub use iat_batch::IatBatch;
pub use merge::{merge_files, FILE_LINE_LIMIT};
