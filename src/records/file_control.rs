//! File control record
//!
//! The last record of every ACH file, carrying the file-level totals that
//! must stay arithmetically consistent with every batch beneath it.

use crate::records::field;
use crate::records::{check_line, Record};
use crate::types::error::AchError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// File control record (record type 9)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileControl {
    /// Number of batch header records in the file
    pub batch_count: u64,
    /// Number of ten-record blocks, rounded up
    pub block_count: u64,
    /// Number of entry and addenda records in the file
    pub entry_addenda_count: u64,
    /// Sum of the batch-level entry hashes, rightmost ten digits
    pub entry_hash: u64,
    /// Accumulated debit amounts across the file, in cents
    pub total_debit_entry_dollar_amount: u64,
    /// Accumulated credit amounts across the file, in cents
    pub total_credit_entry_dollar_amount: u64,
}

impl Record for FileControl {
    const NAME: &'static str = "FileControl";

    fn parse(line: &str) -> Result<Self, AchError> {
        check_line(line, '9')?;
        Ok(FileControl {
            batch_count: field::parse_num(&line[1..7])?,
            block_count: field::parse_num(&line[7..13])?,
            entry_addenda_count: field::parse_num(&line[13..21])?,
            entry_hash: field::parse_num(&line[21..31])?,
            total_debit_entry_dollar_amount: field::parse_num(&line[31..43])?,
            total_credit_entry_dollar_amount: field::parse_num(&line[43..55])?,
        })
    }

    fn validate(&self) -> Result<(), AchError> {
        // All fields are numeric by construction; cross-record consistency
        // is the file aggregator's responsibility.
        Ok(())
    }
}

impl fmt::Display for FileControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "9{batches}{blocks}{count}{hash}{debit}{credit}{reserved}",
            batches = field::numeric(self.batch_count, 6),
            blocks = field::numeric(self.block_count, 6),
            count = field::numeric(self.entry_addenda_count, 8),
            hash = field::numeric(self.entry_hash, 10),
            debit = field::numeric(self.total_debit_entry_dollar_amount, 12),
            credit = field::numeric(self.total_credit_entry_dollar_amount, 12),
            reserved = " ".repeat(39),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn mock_file_control() -> FileControl {
        FileControl {
            batch_count: 1,
            block_count: 1,
            entry_addenda_count: 1,
            entry_hash: 5320001,
            total_debit_entry_dollar_amount: 10500,
            total_credit_entry_dollar_amount: 0,
        }
    }

    #[test]
    fn test_file_control_round_trip() {
        let control = mock_file_control();
        let line = control.to_string();
        assert_eq!(line.len(), 94);
        assert_eq!(&line[0..1], "9");
        assert_eq!(&line[21..31], "0005320001");

        let reparsed = FileControl::parse(&line).unwrap();
        assert_eq!(reparsed, control);
    }

    #[test]
    fn test_parse_rejects_short_line() {
        let err = FileControl::parse("9000001").unwrap_err();
        assert_eq!(err.field_name(), Some("RecordLength"));
    }
}
