//! NACHA ACH file engine
//!
//! # Overview
//!
//! This library reads, validates, builds, merges, and writes files in the
//! NACHA Automated Clearing House (ACH) format: fixed-width 94-character
//! ASCII records grouped into a File → Batches → Entries → Addenda
//! hierarchy, with summary records at each level that must stay
//! arithmetically consistent with everything beneath them.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`records`] - the record codec: typed values with `parse`,
//!   `Display`, and `validate` for every record shape
//! - [`core`] - business logic components:
//!   - [`core::batch`] - the batch engine and per-SEC-code rule sets
//!   - [`core::iat_batch`] - international (IAT) batches
//!   - [`core::file`] - the file aggregator
//!   - [`core::merge`] - consolidation under the 10,000-line cap
//! - [`io`] - the streaming [`io::Reader`] and [`io::Writer`]
//! - [`types`] - error taxonomy and shared code tables
//!
//! # Building a file
//!
//! Headers and entries are populated by client code (or the reader);
//! control records are derived. Call `create` on each batch and then on
//! the file before writing:
//!
//! ```no_run
//! use nacha_engine::{Batch, File, Writer};
//! use nacha_engine::records::{BatchHeader, EntryDetail, FileHeader};
//!
//! let mut batch = Batch::new(BatchHeader::default()).unwrap();
//! batch.add_entry(EntryDetail::default());
//! batch.create().unwrap();
//!
//! let mut file = File::new(FileHeader::default());
//! file.add_batch(batch);
//! file.create().unwrap();
//!
//! let mut out = Vec::new();
//! Writer::new(&mut out).write(&file).unwrap();
//! ```

pub mod core;
pub mod io;
pub mod records;
pub mod types;

pub use crate::core::{merge_files, Batch, File, IatBatch, FILE_LINE_LIMIT};
pub use crate::io::{Reader, Writer};
pub use crate::types::{AchError, Category, SecCode};
