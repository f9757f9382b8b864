//! Error types for the ACH engine
//!
//! This module defines all error types that can occur while parsing,
//! building, validating, or merging ACH files.
//!
//! # Error Categories
//!
//! - **Field errors**: invalid charset, out-of-range enum, missing required
//!   field, failed check digit, invalid month/year/date
//! - **Batch errors**: SEC-specific policy violations, count/hash/total
//!   mismatches, addenda cardinality or category rule violations
//! - **File errors**: duplicate file header/control, record length mismatch,
//!   unknown record type, file-level count/hash mismatch
//! - **Parse errors**: any of the above wrapped with line number and record
//!   name by the reader

use thiserror::Error;

/// Main error type for the ACH engine
///
/// Each variant includes the context needed to diagnose the defect.
/// Validation is strict-first-error: the first defect found is returned
/// and no automatic repair is performed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AchError {
    /// A single field failed format validation
    #[error("{field_name} {value} {msg}")]
    Field {
        /// Name of the offending field
        field_name: String,
        /// The offending value
        value: String,
        /// Description of the defect
        msg: String,
    },

    /// A batch-level rule was violated
    #[error("batch #{batch_number} {field_name} {msg}")]
    Batch {
        /// Batch number from the batch header
        batch_number: u64,
        /// Name of the offending field
        field_name: String,
        /// Description of the defect
        msg: String,
    },

    /// A file-level rule was violated
    #[error("file {field_name} {value} {msg}")]
    File {
        /// Name of the offending field
        field_name: String,
        /// The offending value
        value: String,
        /// Description of the defect
        msg: String,
    },

    /// A lower-level error wrapped with reader context
    #[error("line:{line} record:{record} {source}")]
    Parse {
        /// Line number (1-based) where the error occurred
        line: usize,
        /// Name of the record being parsed
        record: String,
        /// The underlying error
        source: Box<AchError>,
    },

    /// I/O error while reading or writing
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },
}

// Conversion from io::Error to AchError. The message is kept as a String
// so AchError stays Clone + PartialEq.
impl From<std::io::Error> for AchError {
    fn from(error: std::io::Error) -> Self {
        AchError::Io {
            message: error.to_string(),
        }
    }
}

impl AchError {
    /// Create a Field error
    pub fn field(field_name: &str, value: &str, msg: &str) -> Self {
        AchError::Field {
            field_name: field_name.to_string(),
            value: value.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Create a Batch error
    pub fn batch(batch_number: u64, field_name: &str, msg: &str) -> Self {
        AchError::Batch {
            batch_number,
            field_name: field_name.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Create a File error
    pub fn file(field_name: &str, value: &str, msg: &str) -> Self {
        AchError::File {
            field_name: field_name.to_string(),
            value: value.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Wrap an error with the reader's line and record context
    pub fn parse(line: usize, record: &str, source: AchError) -> Self {
        AchError::Parse {
            line,
            record: record.to_string(),
            source: Box::new(source),
        }
    }

    /// The field name carried by this error, if any
    ///
    /// Parse errors delegate to the wrapped error, which lets callers assert
    /// on the offending field without unwrapping the reader context.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            AchError::Field { field_name, .. }
            | AchError::Batch { field_name, .. }
            | AchError::File { field_name, .. } => Some(field_name),
            AchError::Parse { source, .. } => source.field_name(),
            AchError::Io { .. } => None,
        }
    }
}
