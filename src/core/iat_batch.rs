//! IAT batch engine
//!
//! International batches share the domestic batch's arithmetic but carry a
//! different header and a fixed addenda suite per entry: addenda 10-16
//! exactly once each on forward entries, up to two addenda 17 and five
//! addenda 18, with addenda 98/99 standing in for the suite on NOC and
//! return entries.

use crate::core::batch::ENTRY_HASH_MODULUS;
use crate::records::{field, BatchControl, IatBatchHeader, IatEntryDetail, Record};
use crate::types::codes::{service_class_admits, Category, Polarity};
use crate::types::error::AchError;
use serde::{Deserialize, Serialize};

const MSG_CONTROL_EQUALITY: &str = "calculated value is out-of-balance with batch control";
const MSG_ASCENDING: &str = "must be in ascending order";

/// Most addenda17 records allowed per IAT entry
pub const IAT_ADDENDA17_LIMIT: usize = 2;
/// Most addenda18 records allowed per IAT entry
pub const IAT_ADDENDA18_LIMIT: usize = 5;

/// A batch of International ACH Transactions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IatBatch {
    /// Opening record carrying the foreign-exchange context
    pub header: IatBatchHeader,
    /// Entries in insertion order
    pub entries: Vec<IatEntryDetail>,
    /// Closing record, derived by `build`
    pub control: BatchControl,
}

impl IatBatch {
    /// Create an empty IAT batch from a header
    pub fn new(header: IatBatchHeader) -> Self {
        IatBatch {
            header,
            entries: Vec::new(),
            control: BatchControl::default(),
        }
    }

    /// Append an entry, preserving insertion order
    pub fn add_entry(&mut self, entry: IatEntryDetail) {
        self.entries.push(entry);
    }

    /// The batch's processing category
    pub fn category(&self) -> Category {
        if self.entries.iter().any(|e| e.category() == Category::Return) {
            Category::Return
        } else if self.entries.iter().any(|e| e.category() == Category::Noc) {
            Category::Noc
        } else {
            Category::Forward
        }
    }

    fn error(&self, field_name: &str, msg: &str) -> AchError {
        AchError::batch(self.header.batch_number, field_name, msg)
    }

    /// Tabulate trace numbers, addenda wiring, and the control record
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
            if let Some(a) = entry.addenda10.as_mut() {
                a.entry_detail_sequence_number = edsn;
            }
            if let Some(a) = entry.addenda11.as_mut() {
                a.entry_detail_sequence_number = edsn;
            }
            if let Some(a) = entry.addenda12.as_mut() {
                a.entry_detail_sequence_number = edsn;
            }
            if let Some(a) = entry.addenda13.as_mut() {
                a.entry_detail_sequence_number = edsn;
            }
            if let Some(a) = entry.addenda14.as_mut() {
                a.entry_detail_sequence_number = edsn;
            }
            if let Some(a) = entry.addenda15.as_mut() {
                a.entry_detail_sequence_number = edsn;
            }
            if let Some(a) = entry.addenda16.as_mut() {
                a.entry_detail_sequence_number = edsn;
            }
            for (j, a) in entry.addenda17.iter_mut().enumerate() {
                a.sequence_number = j as u64 + 1;
                a.entry_detail_sequence_number = edsn;
            }
            for (j, a) in entry.addenda18.iter_mut().enumerate() {
                a.sequence_number = j as u64 + 1;
                a.entry_detail_sequence_number = edsn;
            }
            let trace = entry.trace_number;
            if let Some(a) = entry.addenda98.as_mut() {
                a.trace_number = trace;
            }
            if let Some(a) = entry.addenda99.as_mut() {
                a.trace_number = trace;
            }
            entry.addenda_records = entry.addenda_count();
            entry.addenda_record_indicator = entry.has_addenda() as u32;
        }

        self.control = BatchControl {
            service_class_code: self.header.service_class_code,
            entry_addenda_count: self.entry_addenda_count(),
            entry_hash: self.entry_hash(),
            total_debit_entry_dollar_amount: self.total_amount(Polarity::Debit),
            total_credit_entry_dollar_amount: self.total_amount(Polarity::Credit),
            company_identification: self.header.originator_identification.clone(),
            message_authentication_code: self.control.message_authentication_code.clone(),
            odfi_identification: self.header.odfi_identification.clone(),
            batch_number: self.header.batch_number,
        };
        Ok(())
    }

    /// Structural checks plus the IAT addenda suite rules; never mutates
    pub fn verify(&self) -> Result<(), AchError> {
        if self.entries.is_empty() {
            return Err(self.error("entries", "must have Entry Record(s) to be built"));
        }
        if self.header.batch_number != self.control.batch_number {
            return Err(self.error("BatchNumber", MSG_CONTROL_EQUALITY));
        }
        if self.header.odfi_identification_field()
            != field::zero_padded(&self.control.odfi_identification, 8)
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
            if field::numeric(entry.trace_odfi(), 8) != header_odfi {
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

        let categories: Vec<Category> = self.entries.iter().map(IatEntryDetail::category).collect();
        if categories.contains(&Category::Return) && categories.contains(&Category::Forward) {
            return Err(self.error(
                "Category",
                "return and forward entries may not be mixed in one batch",
            ));
        }
        Ok(())
    }

    /// Presence and wiring checks for one entry's addenda suite
    fn verify_entry_addenda(&self, entry: &IatEntryDetail) -> Result<(), AchError> {
        if (entry.addenda_record_indicator == 1) != entry.has_addenda() {
            return Err(self.error(
                "AddendaRecordIndicator",
                "addenda record indicator must be 1 exactly when addenda are present",
            ));
        }
        if entry.addenda_records != entry.addenda_count() {
            return Err(self.error(
                "AddendaRecords",
                "addenda records field does not equal the attached addenda count",
            ));
        }
        match entry.category() {
            Category::Forward => {
                // the mandatory suite travels with every forward entry
                let mandatory = [
                    ("Addenda10", entry.addenda10.is_some()),
                    ("Addenda11", entry.addenda11.is_some()),
                    ("Addenda12", entry.addenda12.is_some()),
                    ("Addenda13", entry.addenda13.is_some()),
                    ("Addenda14", entry.addenda14.is_some()),
                    ("Addenda15", entry.addenda15.is_some()),
                    ("Addenda16", entry.addenda16.is_some()),
                ];
                for (name, present) in mandatory {
                    if !present {
                        return Err(self.error(
                            name,
                            "mandatory IAT addenda record is missing for a forward entry",
                        ));
                    }
                }
            }
            Category::Noc => {
                if let Some(addenda) = &entry.addenda98 {
                    addenda.validate()?;
                    if addenda.trace_number != entry.trace_number {
                        return Err(self.error(
                            "TraceNumber",
                            "addenda trace number does not match the entry's trace number",
                        ));
                    }
                }
            }
            Category::Return => {
                if let Some(addenda) = &entry.addenda99 {
                    addenda.validate()?;
                    if addenda.trace_number != entry.trace_number {
                        return Err(self.error(
                            "TraceNumber",
                            "addenda trace number does not match the entry's trace number",
                        ));
                    }
                }
            }
        }
        if entry.addenda17.len() > IAT_ADDENDA17_LIMIT {
            return Err(self.error(
                "AddendaCount",
                &format!(
                    "found {} addenda17 records where {IAT_ADDENDA17_LIMIT} are allowed",
                    entry.addenda17.len()
                ),
            ));
        }
        if entry.addenda18.len() > IAT_ADDENDA18_LIMIT {
            return Err(self.error(
                "AddendaCount",
                &format!(
                    "found {} addenda18 records where {IAT_ADDENDA18_LIMIT} are allowed",
                    entry.addenda18.len()
                ),
            ));
        }

        let edsn = entry.trace_sequence();
        let mandatory_edsn = [
            entry.addenda10.as_ref().map(|a| a.entry_detail_sequence_number),
            entry.addenda11.as_ref().map(|a| a.entry_detail_sequence_number),
            entry.addenda12.as_ref().map(|a| a.entry_detail_sequence_number),
            entry.addenda13.as_ref().map(|a| a.entry_detail_sequence_number),
            entry.addenda14.as_ref().map(|a| a.entry_detail_sequence_number),
            entry.addenda15.as_ref().map(|a| a.entry_detail_sequence_number),
            entry.addenda16.as_ref().map(|a| a.entry_detail_sequence_number),
        ];
        for sequence in mandatory_edsn.into_iter().flatten() {
            if sequence != edsn {
                return Err(self.error(
                    "TraceNumber",
                    "addenda sequence number does not match last seven digits of the trace number",
                ));
            }
        }
        for sequence in entry
            .addenda17
            .iter()
            .map(|a| a.entry_detail_sequence_number)
            .chain(entry.addenda18.iter().map(|a| a.entry_detail_sequence_number))
        {
            if sequence != edsn {
                return Err(self.error(
                    "TraceNumber",
                    "addenda sequence number does not match last seven digits of the trace number",
                ));
            }
        }
        Ok(())
    }

    /// Run the structural and suite checks
    pub fn validate(&self) -> Result<(), AchError> {
        self.verify()
    }

    /// Build the batch and validate the result
    pub fn create(&mut self) -> Result<(), AchError> {
        self.build()?;
        self.validate()
    }

    /// Whether two IAT batches carry the same content
    ///
    /// Batch numbers are excluded so the merger can recognize a batch it
    /// has already placed in a renumbered output file.
    pub fn equal(&self, other: &IatBatch) -> bool {
        let mut a = self.header.clone();
        let mut b = other.header.clone();
        a.batch_number = 0;
        b.batch_number = 0;
        a == b && self.entries == other.entries
    }

    /// Entry records plus addenda records
    pub fn entry_addenda_count(&self) -> u64 {
        self.entries.iter().map(|e| 1 + e.addenda_count()).sum()
    }

    /// Sum of the entries' RDFI identifications, rightmost ten digits
    pub fn entry_hash(&self) -> u64 {
        let sum: u64 = self
            .entries
            .iter()
            .map(|e| {
                field::zero_padded(&e.rdfi_identification, 8)
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

    /// Lines this batch occupies when rendered
    pub(crate) fn line_count(&self) -> u64 {
        2 + self.entry_addenda_count()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::records::addenda::tests::mock_addenda99;
    use crate::records::iat_addenda::tests::{mock_addenda17, mock_addenda18};
    use crate::records::iat_entry::tests::{mock_iat_entry_detail, mock_iat_entry_with_addenda};
    use crate::records::iat_header::tests::mock_iat_batch_header;

    pub(crate) fn mock_iat_batch() -> IatBatch {
        let mut batch = IatBatch::new(mock_iat_batch_header());
        batch.add_entry(mock_iat_entry_with_addenda());
        batch.build().unwrap();
        batch
    }

    #[test]
    fn test_mock_iat_batch_validates() {
        assert!(mock_iat_batch().validate().is_ok());
    }

    #[test]
    fn test_forward_entry_requires_mandatory_suite() {
        let mut batch = IatBatch::new(mock_iat_batch_header());
        let mut entry = mock_iat_entry_with_addenda();
        entry.addenda12 = None;
        entry.addenda_records = 6;
        batch.add_entry(entry);
        batch.build().unwrap();

        let err = batch.validate().unwrap_err();
        assert_eq!(err.field_name(), Some("Addenda12"));
    }

    #[test]
    fn test_addenda_records_field_must_match() {
        let mut batch = mock_iat_batch();
        batch.entries[0].addenda_records = 3;
        let err = batch.validate().unwrap_err();
        assert_eq!(err.field_name(), Some("AddendaRecords"));
    }

    #[test]
    fn test_optional_addenda_limits() {
        let mut batch = IatBatch::new(mock_iat_batch_header());
        let mut entry = mock_iat_entry_with_addenda();
        for _ in 0..3 {
            entry.add_addenda17(mock_addenda17());
        }
        batch.add_entry(entry);
        batch.build().unwrap();
        let err = batch.validate().unwrap_err();
        assert_eq!(err.field_name(), Some("AddendaCount"));

        let mut batch = IatBatch::new(mock_iat_batch_header());
        let mut entry = mock_iat_entry_with_addenda();
        for _ in 0..6 {
            entry.add_addenda18(mock_addenda18());
        }
        batch.add_entry(entry);
        batch.build().unwrap();
        let err = batch.validate().unwrap_err();
        assert_eq!(err.field_name(), Some("AddendaCount"));
    }

    #[test]
    fn test_return_entry_skips_mandatory_suite() {
        let mut batch = IatBatch::new(mock_iat_batch_header());
        let mut entry = mock_iat_entry_detail();
        entry.addenda99 = Some(mock_addenda99());
        batch.add_entry(entry);
        batch.build().unwrap();

        assert_eq!(batch.category(), Category::Return);
        assert!(batch.validate().is_ok());
    }

    #[test]
    fn test_iat_batch_equal_ignores_batch_numbers() {
        let a = mock_iat_batch();
        let mut b = mock_iat_batch();
        b.header.batch_number = 9;
        b.control.batch_number = 9;
        assert!(a.equal(&b));

        b.entries[0].amount += 1;
        assert!(!a.equal(&b));
    }

    #[test]
    fn test_entry_addenda_count_includes_suite() {
        let batch = mock_iat_batch();
        // one entry plus its seven mandatory addenda
        assert_eq!(batch.entry_addenda_count(), 8);
        assert_eq!(batch.control.entry_addenda_count, 8);
    }

    #[test]
    fn test_build_wires_sequence_numbers() {
        let mut batch = IatBatch::new(mock_iat_batch_header());
        let mut entry = mock_iat_entry_with_addenda();
        entry.add_addenda17(mock_addenda17());
        entry.add_addenda17(mock_addenda17());
        batch.add_entry(entry);
        batch.build().unwrap();

        let entry = &batch.entries[0];
        let edsn = entry.trace_sequence();
        assert_eq!(entry.addenda17[0].sequence_number, 1);
        assert_eq!(entry.addenda17[1].sequence_number, 2);
        assert_eq!(entry.addenda17[0].entry_detail_sequence_number, edsn);
        assert_eq!(entry.addenda10.as_ref().unwrap().entry_detail_sequence_number, edsn);
    }
}
