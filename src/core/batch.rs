//! Batch engine
//!
//! A batch is the common core shared by every Standard Entry Class: a
//! header, an ordered run of entries, and a derived control record. The
//! operations split three ways:
//!
//! - `verify` applies the structural checks that hold for every SEC code
//! - `build` derives trace numbers, addenda sequencing, and the control
//!   record from the header and entries
//! - `validate` runs `verify` and then the SEC-specific rule set
//!
//! `create` sequences `build` then `validate` and is what callers use
//! before writing a batch out.

use crate::core::sec;
use crate::records::{BatchControl, BatchHeader, EntryDetail, Record};
use crate::types::codes::{service_class_admits, Category, Polarity, SecCode};
use crate::types::error::AchError;
use serde::{Deserialize, Serialize};

const MSG_CONTROL_EQUALITY: &str = "calculated value is out-of-balance with batch control";
const MSG_ASCENDING: &str = "must be in ascending order";
const MSG_FIELD_INCLUSION: &str = "mandatory field has a default value";

/// Entry-hash sums keep only their rightmost ten digits
pub(crate) const ENTRY_HASH_MODULUS: u64 = 10_000_000_000;

/// A batch of entries validated under one Standard Entry Class code
///
/// The SEC code lives in the header; [`Batch::new`] rejects headers whose
/// code is unknown or "IAT" (use [`IatBatch`](crate::core::IatBatch) for
/// international batches).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    /// Opening record naming the company and rule set
    pub header: BatchHeader,
    /// Entries in insertion order
    pub entries: Vec<EntryDetail>,
    /// Closing record, derived by `build`
    pub control: BatchControl,
}

impl Batch {
    /// Create an empty batch from a header
    ///
    /// Fails with a file-level error when the header's SEC code is not a
    /// known domestic code.
    pub fn new(header: BatchHeader) -> Result<Self, AchError> {
        header.sec_code()?;
        Ok(Batch {
            header,
            entries: Vec::new(),
            control: BatchControl::default(),
        })
    }

    /// The batch's Standard Entry Class code
    pub fn sec_code(&self) -> Result<SecCode, AchError> {
        self.header.sec_code()
    }

    /// Append an entry, preserving insertion order
    pub fn add_entry(&mut self, entry: EntryDetail) {
        self.entries.push(entry);
    }

    /// The batch's processing category
    ///
    /// A single Return entry makes the whole batch a Return batch; failing
    /// that, a single NOC entry makes it a NOC batch.
    pub fn category(&self) -> Category {
        if self.entries.iter().any(|e| e.category() == Category::Return) {
            Category::Return
        } else if self.entries.iter().any(|e| e.category() == Category::Noc) {
            Category::Noc
        } else {
            Category::Forward
        }
    }

    /// Build a batch error carrying this batch's number
    pub(crate) fn error(&self, field_name: &str, msg: &str) -> AchError {
        AchError::batch(self.header.batch_number, field_name, msg)
    }

    /// Tabulate trace numbers, addenda sequencing, and the control record
    ///
    /// Entries that already carry a trace number keep it; addenda sequence
    /// numbers restart at 1 for each entry. Ends by populating every
    /// derived control field.
    pub fn build(&mut self) -> Result<(), AchError> {
        self.header.validate()?;
        if self.entries.is_empty() {
            return Err(self.error("entries", "must have Entry Record(s) to be built"));
        }

        let odfi = self.header.odfi_identification_field();
        for (i, entry) in self.entries.iter_mut().enumerate() {
            if entry.trace_number == 0 {
                entry.set_trace_number(&odfi, i as u64 + 1);
            }
            let edsn = entry.trace_sequence();
            for (j, addenda) in entry.addenda05.iter_mut().enumerate() {
                addenda.sequence_number = j as u64 + 1;
                addenda.entry_detail_sequence_number = edsn;
            }
            let trace = entry.trace_number;
            if let Some(addenda) = entry.addenda02.as_mut() {
                addenda.trace_number = trace;
            }
            if let Some(addenda) = entry.addenda98.as_mut() {
                addenda.trace_number = trace;
            }
            if let Some(addenda) = entry.addenda99.as_mut() {
                addenda.trace_number = trace;
            }
            entry.addenda_record_indicator = entry.has_addenda() as u32;
        }

        self.control = BatchControl {
            service_class_code: self.header.service_class_code,
            entry_addenda_count: self.entry_addenda_count(),
            entry_hash: self.entry_hash(),
            total_debit_entry_dollar_amount: self.total_amount(Polarity::Debit),
            total_credit_entry_dollar_amount: self.total_amount(Polarity::Credit),
            company_identification: self.header.company_identification.clone(),
            message_authentication_code: self.control.message_authentication_code.clone(),
            odfi_identification: self.header.odfi_identification.clone(),
            batch_number: self.header.batch_number,
        };
        Ok(())
    }

    /// Structural checks shared by every SEC code; never mutates
    pub fn verify(&self) -> Result<(), AchError> {
        if self.entries.is_empty() {
            return Err(self.error("entries", "must have Entry Record(s) to be built"));
        }
        if self.header.odfi_identification.trim_matches(['0', ' ']).is_empty() {
            return Err(self.error("ODFIIdentification", MSG_FIELD_INCLUSION));
        }
        if self.control.odfi_identification.trim_matches(['0', ' ']).is_empty() {
            return Err(self.error("ODFIIdentification", MSG_FIELD_INCLUSION));
        }
        if self.header.batch_number != self.control.batch_number {
            return Err(self.error("BatchNumber", MSG_CONTROL_EQUALITY));
        }
        if self.header.odfi_identification_field()
            != crate::records::field::zero_padded(&self.control.odfi_identification, 8)
        {
            return Err(self.error("ODFIIdentification", MSG_CONTROL_EQUALITY));
        }
        if self.entry_addenda_count() != self.control.entry_addenda_count {
            return Err(self.error("EntryAddendaCount", MSG_CONTROL_EQUALITY));
        }
        if self.entry_hash() != self.control.entry_hash {
            return Err(self.error("EntryHash", MSG_CONTROL_EQUALITY));
        }
        if self.total_amount(Polarity::Debit) != self.control.total_debit_entry_dollar_amount {
            return Err(self.error("TotalDebitEntryDollarAmount", MSG_CONTROL_EQUALITY));
        }
        if self.total_amount(Polarity::Credit) != self.control.total_credit_entry_dollar_amount {
            return Err(self.error("TotalCreditEntryDollarAmount", MSG_CONTROL_EQUALITY));
        }

        let header_odfi = self.header.odfi_identification_field();
        let mut last_trace: Option<u64> = None;
        for entry in &self.entries {
            entry.validate()?;
            if !service_class_admits(self.header.service_class_code, entry.polarity()) {
                return Err(self.error(
                    "ServiceClassCode",
                    &format!(
                        "service class code {} does not admit transaction code {}",
                        self.header.service_class_code, entry.transaction_code
                    ),
                ));
            }
            // Death notifications and other prenotes must come from an
            // originator with status code 2.
            if self.header.originator_status_code != 2
                && matches!(entry.transaction_code, 23 | 33)
            {
                return Err(self.error(
                    "OriginatorStatusCode",
                    "originator status code must be 2 for death notification entries",
                ));
            }
            if crate::records::field::numeric(entry.trace_odfi(), 8) != header_odfi {
                return Err(self.error(
                    "TraceNumber",
                    "trace number ODFI prefix does not match batch header ODFI",
                ));
            }
            if let Some(last) = last_trace {
                if entry.trace_number <= last {
                    return Err(self.error("TraceNumber", MSG_ASCENDING));
                }
            }
            last_trace = Some(entry.trace_number);

            self.verify_entry_addenda(entry)?;
        }

        let categories: Vec<Category> = self.entries.iter().map(EntryDetail::category).collect();
        if categories.contains(&Category::Return) && categories.contains(&Category::Forward) {
            return Err(self.error(
                "Category",
                "return and forward entries may not be mixed in one batch",
            ));
        }
        Ok(())
    }

    /// Addenda wiring checks for a single entry
    fn verify_entry_addenda(&self, entry: &EntryDetail) -> Result<(), AchError> {
        if (entry.addenda_record_indicator == 1) != entry.has_addenda() {
            return Err(self.error(
                "AddendaRecordIndicator",
                "addenda record indicator must be 1 exactly when addenda are present",
            ));
        }
        let edsn = entry.trace_sequence();
        let mut last_seq: Option<u64> = None;
        for addenda in &entry.addenda05 {
            addenda.validate()?;
            if addenda.entry_detail_sequence_number != edsn {
                return Err(self.error(
                    "TraceNumber",
                    "addenda sequence number does not match last seven digits of the trace number",
                ));
            }
            if let Some(last) = last_seq {
                if addenda.sequence_number <= last {
                    return Err(self.error("SequenceNumber", MSG_ASCENDING));
                }
            }
            last_seq = Some(addenda.sequence_number);
        }
        if let Some(addenda) = &entry.addenda02 {
            addenda.validate()?;
        }
        if let Some(addenda) = &entry.addenda98 {
            addenda.validate()?;
            if addenda.trace_number != entry.trace_number {
                return Err(self.error(
                    "TraceNumber",
                    "addenda trace number does not match the entry's trace number",
                ));
            }
        }
        if let Some(addenda) = &entry.addenda99 {
            addenda.validate()?;
            if addenda.trace_number != entry.trace_number {
                return Err(self.error(
                    "TraceNumber",
                    "addenda trace number does not match the entry's trace number",
                ));
            }
        }
        Ok(())
    }

    /// Run the structural checks and then the SEC-specific rule set
    pub fn validate(&self) -> Result<(), AchError> {
        self.verify()?;
        sec::validate(self)
    }

    /// Build the batch and validate the result
    pub fn create(&mut self) -> Result<(), AchError> {
        self.build()?;
        self.validate()
    }

    /// Whether two batches carry the same content
    ///
    /// Batch numbers are excluded so the merger can recognize a batch it
    /// has already placed in a renumbered output file.
    pub fn equal(&self, other: &Batch) -> bool {
        let mut a = self.header.clone();
        let mut b = other.header.clone();
        a.batch_number = 0;
        b.batch_number = 0;
        a == b && self.entries == other.entries
    }

    /// Entry records plus addenda records
    pub fn entry_addenda_count(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| 1 + e.addenda_count())
            .sum()
    }

    /// Sum of the entries' RDFI identifications, rightmost ten digits
    pub fn entry_hash(&self) -> u64 {
        let sum: u64 = self
            .entries
            .iter()
            .map(|e| {
                crate::records::field::zero_padded(&e.rdfi_identification, 8)
                    .parse::<u64>()
                    .unwrap_or(0)
            })
            .sum();
        sum % ENTRY_HASH_MODULUS
    }

    /// Accumulated entry amounts for one polarity, in cents
    pub fn total_amount(&self, polarity: Polarity) -> u64 {
        self.entries
            .iter()
            .filter(|e| e.polarity() == polarity)
            .map(|e| e.amount)
            .sum()
    }

    /// Lines this batch occupies when rendered: envelope, entries, addenda
    pub(crate) fn line_count(&self) -> u64 {
        2 + self.entry_addenda_count()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::records::addenda::tests::{mock_addenda05, mock_addenda99};
    use crate::records::batch_header::tests::mock_batch_header;
    use crate::records::entry_detail::tests::mock_entry_detail;

    pub(crate) fn mock_batch() -> Batch {
        let mut batch = Batch::new(mock_batch_header()).unwrap();
        batch.add_entry(mock_entry_detail());
        batch.build().unwrap();
        batch
    }

    #[test]
    fn test_mock_batch_verifies() {
        assert!(mock_batch().verify().is_ok());
    }

    #[test]
    fn test_batch_number_mismatch() {
        let mut batch = mock_batch();
        batch.control.batch_number = 2;
        let err = batch.verify().unwrap_err();
        assert_eq!(err.field_name(), Some("BatchNumber"));
    }

    #[test]
    fn test_credit_amount_mismatch() {
        let mut batch = mock_batch();
        batch.control.total_credit_entry_dollar_amount = 1;
        let err = batch.verify().unwrap_err();
        assert_eq!(err.field_name(), Some("TotalCreditEntryDollarAmount"));
    }

    #[test]
    fn test_debit_amount_mismatch() {
        let mut batch = mock_batch();
        batch.header.service_class_code = 200;
        batch.entries[0].transaction_code = 27;
        batch.build().unwrap();
        batch.control.total_debit_entry_dollar_amount = 1;
        let err = batch.verify().unwrap_err();
        assert_eq!(err.field_name(), Some("TotalDebitEntryDollarAmount"));
    }

    #[test]
    fn test_entry_hash_mismatch() {
        let mut batch = mock_batch();
        batch.control.entry_hash = 1;
        let err = batch.verify().unwrap_err();
        assert_eq!(err.field_name(), Some("EntryHash"));
    }

    #[test]
    fn test_entry_addenda_count_mismatch() {
        let mut batch = mock_batch();
        let mut entry = mock_entry_detail();
        entry.add_addenda05(mock_addenda05());
        entry.set_trace_number("12104288", 2);
        batch.add_entry(entry);
        batch.build().unwrap();

        batch.control.entry_addenda_count = 1;
        let err = batch.verify().unwrap_err();
        assert_eq!(err.field_name(), Some("EntryAddendaCount"));
    }

    #[test]
    fn test_addenda_indicator_must_match() {
        let mut batch = mock_batch();
        batch.entries[0].addenda05.push(mock_addenda05());
        batch.entries[0].addenda_record_indicator = 0;
        batch.control.entry_addenda_count = 2;
        let err = batch.verify().unwrap_err();
        assert_eq!(err.field_name(), Some("AddendaRecordIndicator"));
    }

    #[test]
    fn test_addenda_sequence_must_ascend() {
        let mut batch = mock_batch();
        batch.entries[0].add_addenda05(mock_addenda05());
        batch.entries[0].add_addenda05(mock_addenda05());
        batch.build().unwrap();

        batch.entries[0].addenda05[0].sequence_number = 2;
        batch.entries[0].addenda05[1].sequence_number = 1;
        let err = batch.verify().unwrap_err();
        assert_eq!(err.field_name(), Some("SequenceNumber"));
    }

    #[test]
    fn test_trace_numbers_must_ascend() {
        let mut batch = mock_batch();
        let mut entry = mock_entry_detail();
        entry.trace_number = batch.entries[0].trace_number;
        batch.add_entry(entry);
        batch.control.entry_addenda_count = 2;
        let err = batch.verify().unwrap_err();
        assert_eq!(err.field_name(), Some("TraceNumber"));
    }

    #[test]
    fn test_addenda_trace_must_match_entry() {
        let mut batch = mock_batch();
        batch.entries[0].add_addenda05(mock_addenda05());
        batch.build().unwrap();

        batch.entries[0].addenda05[0].entry_detail_sequence_number = 99;
        let err = batch.verify().unwrap_err();
        assert_eq!(err.field_name(), Some("TraceNumber"));
    }

    #[test]
    fn test_trace_prefix_must_match_odfi() {
        let mut batch = mock_batch();
        batch.entries[0].set_trace_number("99282720", 1);
        let err = batch.verify().unwrap_err();
        assert_eq!(err.field_name(), Some("TraceNumber"));
    }

    #[test]
    fn test_dne_requires_originator_status_two() {
        let mut batch = mock_batch();
        batch.entries[0].transaction_code = 23;
        batch.entries[0].amount = 0;
        batch.build().unwrap();

        batch.header.originator_status_code = 1;
        let err = batch.verify().unwrap_err();
        assert_eq!(err.field_name(), Some("OriginatorStatusCode"));
    }

    #[test]
    fn test_service_class_polarity() {
        let mut batch = mock_batch();
        // credits-only batch cannot contain a debit
        batch.entries[0].transaction_code = 27;
        batch.build().unwrap();
        batch.header.service_class_code = 220;
        batch.control.service_class_code = 220;
        let err = batch.verify().unwrap_err();
        assert_eq!(err.field_name(), Some("ServiceClassCode"));
    }

    #[test]
    fn test_category_from_return_addenda() {
        let mut batch = mock_batch();
        let mut entry = mock_entry_detail();
        entry.set_addenda99(mock_addenda99());
        batch.entries[0].set_addenda99(mock_addenda99());
        entry.set_trace_number("12104288", 2);
        batch.add_entry(entry);
        batch.build().unwrap();

        assert_eq!(batch.category(), Category::Return);
        assert!(batch.verify().is_ok());
    }

    #[test]
    fn test_mixed_forward_and_return_rejected() {
        let mut batch = mock_batch();
        let mut entry = mock_entry_detail();
        entry.set_addenda99(mock_addenda99());
        entry.set_trace_number("12104288", 2);
        batch.add_entry(entry);
        batch.build().unwrap();

        let err = batch.verify().unwrap_err();
        assert_eq!(err.field_name(), Some("Category"));
    }

    #[test]
    fn test_build_preserves_existing_trace_numbers() {
        let mut batch = mock_batch();
        let mut entry = mock_entry_detail();
        entry.set_trace_number("12104288", 77);
        let trace_before = entry.trace_number;
        batch.add_entry(entry);
        batch.build().unwrap();

        assert_eq!(batch.entries[1].trace_number, trace_before);
    }

    #[test]
    fn test_build_requires_entries() {
        let mut batch = Batch::new(mock_batch_header()).unwrap();
        let err = batch.build().unwrap_err();
        assert_eq!(err.field_name(), Some("entries"));
        let err = batch.verify().unwrap_err();
        assert_eq!(err.field_name(), Some("entries"));
    }

    #[test]
    fn test_header_odfi_is_required() {
        let mut batch = mock_batch();
        batch.header.odfi_identification = String::new();
        let err = batch.verify().unwrap_err();
        assert_eq!(err.field_name(), Some("ODFIIdentification"));
    }

    #[test]
    fn test_control_odfi_is_required() {
        let mut batch = mock_batch();
        batch.control.odfi_identification = String::new();
        let err = batch.verify().unwrap_err();
        assert_eq!(err.field_name(), Some("ODFIIdentification"));
    }

    #[test]
    fn test_new_batch_rejects_unknown_sec() {
        let mut header = mock_batch_header();
        header.standard_entry_class_code = "NIL".to_string();
        let err = Batch::new(header).unwrap_err();
        assert_eq!(err.field_name(), Some("StandardEntryClassCode"));
    }

    #[test]
    fn test_new_batch_rejects_iat() {
        let mut header = mock_batch_header();
        header.standard_entry_class_code = "IAT".to_string();
        assert!(Batch::new(header).is_err());
    }

    #[test]
    fn test_batch_equal_ignores_batch_numbers() {
        let a = mock_batch();
        let mut b = mock_batch();
        b.header.batch_number = 9;
        b.control.batch_number = 9;
        assert!(a.equal(&b));

        b.entries[0].amount += 1;
        assert!(!a.equal(&b));
    }

    #[test]
    fn test_entry_hash_truncates_to_ten_digits() {
        let mut batch = mock_batch();
        for seq in 2..=100u64 {
            let mut entry = mock_entry_detail();
            entry.set_rdfi("994442281"); // large routing prefix
            entry.set_trace_number("12104288", seq);
            batch.add_entry(entry);
        }
        // 12104288 + 99 * 99444228 = 9857080860 which still fits; force overflow
        for seq in 101..=110u64 {
            let mut entry = mock_entry_detail();
            entry.set_rdfi("994442281");
            entry.set_trace_number("12104288", seq);
            batch.add_entry(entry);
        }
        let raw: u64 = 12104288 + 109 * 99444228;
        assert_eq!(batch.entry_hash(), raw % ENTRY_HASH_MODULUS);
    }
}
