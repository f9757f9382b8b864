//! File aggregator
//!
//! The root of the hierarchy: a header, the ordered batches (domestic and
//! IAT), and a control record whose counts, hash, and totals must stay
//! consistent with everything beneath it. `create` derives the control
//! record; `validate` recomputes and compares without mutating.

use crate::core::batch::{Batch, ENTRY_HASH_MODULUS};
use crate::core::iat_batch::IatBatch;
use crate::records::{FileControl, FileHeader, Record};
use crate::types::codes::Category;
use crate::types::error::AchError;
use serde::{Deserialize, Serialize};

const MSG_CONTROL_EQUALITY: &str = "calculated value is out-of-balance with file control";

/// A parsed or client-built ACH file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// Client-defined reference, never written to the wire
    #[serde(default)]
    pub id: String,
    /// The file header
    #[serde(rename = "fileHeader")]
    pub header: FileHeader,
    /// Domestic batches in insertion order
    pub batches: Vec<Batch>,
    /// International batches in insertion order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub iat_batches: Vec<IatBatch>,
    /// The file control, derived by `create`
    #[serde(rename = "fileControl")]
    pub control: FileControl,
}

impl File {
    /// Create an empty file with the given header
    pub fn new(header: FileHeader) -> Self {
        File {
            header,
            ..File::default()
        }
    }

    /// Append a batch, preserving insertion order
    pub fn add_batch(&mut self, batch: Batch) {
        self.batches.push(batch);
    }

    /// Append an IAT batch, preserving insertion order
    pub fn add_iat_batch(&mut self, batch: IatBatch) {
        self.iat_batches.push(batch);
    }

    /// Replace the file header
    pub fn set_header(&mut self, header: FileHeader) -> &mut Self {
        self.header = header;
        self
    }

    /// Batches carrying notifications of change
    ///
    /// Recomputed on demand; the file owns its batches, so the view hands
    /// out references rather than aliases.
    pub fn notifications_of_change(&self) -> Vec<&Batch> {
        self.batches
            .iter()
            .filter(|b| b.category() == Category::Noc)
            .collect()
    }

    /// Batches carrying return entries
    pub fn return_entries(&self) -> Vec<&Batch> {
        self.batches
            .iter()
            .filter(|b| b.category() == Category::Return)
            .collect()
    }

    /// Derive batch numbers and the file control record
    ///
    /// Assumes each batch's own `create` already populated its control
    /// record. Assigns ascending batch numbers in insertion order (domestic
    /// batches first, then IAT), then sums counts, hash, and totals.
    pub fn create(&mut self) -> Result<(), AchError> {
        self.header.validate()?;
        if self.batches.is_empty() && self.iat_batches.is_empty() {
            return Err(AchError::file(
                "Batches",
                "0",
                "must have at least one batch to be built",
            ));
        }

        let mut batch_seq: u64 = 1;
        // file header and file control
        let mut record_count: u64 = 2;
        let mut entry_addenda_count: u64 = 0;
        let mut entry_hash: u64 = 0;
        let mut total_debit: u64 = 0;
        let mut total_credit: u64 = 0;

        for batch in &mut self.batches {
            batch.header.batch_number = batch_seq;
            batch.control.batch_number = batch_seq;
            batch_seq += 1;
            entry_addenda_count += batch.control.entry_addenda_count;
            record_count += 2 + batch.control.entry_addenda_count;
            entry_hash += batch.control.entry_hash;
            total_debit += batch.control.total_debit_entry_dollar_amount;
            total_credit += batch.control.total_credit_entry_dollar_amount;
        }
        for batch in &mut self.iat_batches {
            batch.header.batch_number = batch_seq;
            batch.control.batch_number = batch_seq;
            batch_seq += 1;
            entry_addenda_count += batch.control.entry_addenda_count;
            record_count += 2 + batch.control.entry_addenda_count;
            entry_hash += batch.control.entry_hash;
            total_debit += batch.control.total_debit_entry_dollar_amount;
            total_credit += batch.control.total_credit_entry_dollar_amount;
        }

        self.control = FileControl {
            batch_count: batch_seq - 1,
            block_count: record_count.div_ceil(10),
            entry_addenda_count,
            entry_hash: entry_hash % ENTRY_HASH_MODULUS,
            total_debit_entry_dollar_amount: total_debit,
            total_credit_entry_dollar_amount: total_credit,
        };
        Ok(())
    }

    /// Recompute the file-level aggregates and flag any mismatch
    pub fn validate(&self) -> Result<(), AchError> {
        let batch_count = (self.batches.len() + self.iat_batches.len()) as u64;
        if self.control.batch_count != batch_count {
            return Err(AchError::file(
                "BatchCount",
                &batch_count.to_string(),
                MSG_CONTROL_EQUALITY,
            ));
        }

        let mut entry_addenda_count: u64 = 0;
        let mut entry_hash: u64 = 0;
        let mut total_debit: u64 = 0;
        let mut total_credit: u64 = 0;
        for control in self
            .batches
            .iter()
            .map(|b| &b.control)
            .chain(self.iat_batches.iter().map(|b| &b.control))
        {
            entry_addenda_count += control.entry_addenda_count;
            entry_hash += control.entry_hash;
            total_debit += control.total_debit_entry_dollar_amount;
            total_credit += control.total_credit_entry_dollar_amount;
        }

        if self.control.entry_addenda_count != entry_addenda_count {
            return Err(AchError::file(
                "EntryAddendaCount",
                &entry_addenda_count.to_string(),
                MSG_CONTROL_EQUALITY,
            ));
        }
        if self.control.total_debit_entry_dollar_amount != total_debit {
            return Err(AchError::file(
                "TotalDebitEntryDollarAmountInFile",
                &total_debit.to_string(),
                MSG_CONTROL_EQUALITY,
            ));
        }
        if self.control.total_credit_entry_dollar_amount != total_credit {
            return Err(AchError::file(
                "TotalCreditEntryDollarAmountInFile",
                &total_credit.to_string(),
                MSG_CONTROL_EQUALITY,
            ));
        }
        if self.control.entry_hash != entry_hash % ENTRY_HASH_MODULUS {
            return Err(AchError::file(
                "EntryHash",
                &(entry_hash % ENTRY_HASH_MODULUS).to_string(),
                MSG_CONTROL_EQUALITY,
            ));
        }
        Ok(())
    }

    /// Lines this file occupies when rendered, before block padding
    pub fn line_count(&self) -> u64 {
        2 + self
            .batches
            .iter()
            .map(Batch::line_count)
            .chain(self.iat_batches.iter().map(IatBatch::line_count))
            .sum::<u64>()
    }
}
