//! Batch control record

use crate::records::field;
use crate::records::{check_line, Record};
use crate::types::error::AchError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Batch control record (record type 8)
///
/// Closes a batch. Every field other than the message authentication code
/// is derived by `build` from the header and entries above it; `verify`
/// recomputes the derivations and flags any mismatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchControl {
    /// Echo of the batch header's service class code
    pub service_class_code: u32,
    /// Entry records plus addenda records in the batch
    pub entry_addenda_count: u64,
    /// Sum of the entries' eight-digit RDFI identifications, rightmost ten digits
    pub entry_hash: u64,
    /// Accumulated debit entry amounts, in cents
    pub total_debit_entry_dollar_amount: u64,
    /// Accumulated credit entry amounts, in cents
    pub total_credit_entry_dollar_amount: u64,
    /// Echo of the batch header's company identification
    pub company_identification: String,
    /// Bank-assigned message authentication code, normally blank
    pub message_authentication_code: String,
    /// Echo of the batch header's ODFI identification
    pub odfi_identification: String,
    /// Echo of the batch header's batch number
    pub batch_number: u64,
}

impl Record for BatchControl {
    const NAME: &'static str = "BatchControl";

    fn parse(line: &str) -> Result<Self, AchError> {
        check_line(line, '8')?;
        Ok(BatchControl {
            service_class_code: field::parse_num(&line[1..4])? as u32,
            entry_addenda_count: field::parse_num(&line[4..10])?,
            entry_hash: field::parse_num(&line[10..20])?,
            total_debit_entry_dollar_amount: field::parse_num(&line[20..32])?,
            total_credit_entry_dollar_amount: field::parse_num(&line[32..44])?,
            company_identification: field::parse_alpha(&line[44..54]),
            message_authentication_code: field::parse_alpha(&line[54..73]),
            odfi_identification: line[79..87].to_string(),
            batch_number: field::parse_num(&line[87..94])?,
        })
    }

    fn validate(&self) -> Result<(), AchError> {
        field::is_service_class_code(self.service_class_code)?;
        field::is_alphanumeric(&self.company_identification)?;
        field::is_alphanumeric(&self.message_authentication_code)?;
        Ok(())
    }
}

impl fmt::Display for BatchControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "8{scc}{count}{hash}{debit}{credit}{company}{mac}{reserved}{odfi}{number}",
            scc = field::numeric(self.service_class_code as u64, 3),
            count = field::numeric(self.entry_addenda_count, 6),
            hash = field::numeric(self.entry_hash, 10),
            debit = field::numeric(self.total_debit_entry_dollar_amount, 12),
            credit = field::numeric(self.total_credit_entry_dollar_amount, 12),
            company = field::alpha(&self.company_identification, 10),
            mac = field::alpha(&self.message_authentication_code, 19),
            reserved = "      ",
            odfi = field::zero_padded(&self.odfi_identification, 8),
            number = field::numeric(self.batch_number, 7),
        )
    }
}
