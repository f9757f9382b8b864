//! Record types
//!
//! One module per NACHA record type. Every record implements [`Record`]:
//! `parse` maps a 94-character ASCII line into a typed value, `Display`
//! renders the canonical line back, and `validate` applies the field-level
//! NACHA format rules. For any valid record `r`,
//! `Record::parse(&r.to_string())` succeeds, validates, and equals `r`.
//!
//! # Components
//!
//! - `field` - fixed-width field codec and validation predicates
//! - `file_header` / `file_control` - the file envelope
//! - `batch_header` / `batch_control` - the batch envelope
//! - `entry_detail` - domestic entries and their addenda slots
//! - `addenda` - addenda types 02, 05, 98 (NOC), and 99 (Return)
//! - `iat_header` / `iat_entry` / `iat_addenda` - the IAT record suite

pub mod addenda;
pub mod batch_control;
pub mod batch_header;
pub mod entry_detail;
pub mod field;
pub mod file_control;
pub mod file_header;
pub mod iat_addenda;
pub mod iat_entry;
pub mod iat_header;

pub use addenda::{Addenda02, Addenda05, Addenda98, Addenda99};
pub use batch_control::BatchControl;
pub use batch_header::BatchHeader;
pub use entry_detail::EntryDetail;
pub use file_control::FileControl;
pub use file_header::FileHeader;
pub use iat_addenda::{
    Addenda10, Addenda11, Addenda12, Addenda13, Addenda14, Addenda15, Addenda16, Addenda17,
    Addenda18,
};
pub use iat_entry::IatEntryDetail;
pub use iat_header::IatBatchHeader;

use crate::types::error::AchError;
use std::fmt;

/// Contract shared by every 94-character record type
///
/// The reader drives parsing through this trait so that line-number and
/// record-name context can be attached uniformly.
pub trait Record: Sized + fmt::Display {
    /// Record name used in parse-error context
    const NAME: &'static str;

    /// Parse a 94-character line into a typed record
    fn parse(line: &str) -> Result<Self, AchError>;

    /// Apply NACHA field-format rules; never mutates
    fn validate(&self) -> Result<(), AchError>;
}

/// Structural checks shared by every record parser
///
/// Verifies the line is exactly 94 printable-ASCII characters and starts
/// with the expected record type code before any field is sliced out.
pub(crate) fn check_line(line: &str, record_type: char) -> Result<(), AchError> {
    if line.len() != field::RECORD_LENGTH || !line.is_ascii() {
        return Err(AchError::file(
            "RecordLength",
            &line.len().to_string(),
            "must be 94 characters",
        ));
    }
    if !line.starts_with(record_type) {
        return Err(AchError::field(
            "recordType",
            &line[0..1],
            &format!("must be {record_type}"),
        ));
    }
    Ok(())
}
