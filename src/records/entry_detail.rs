//! Entry detail record
//!
//! A single debit or credit instruction against a receiver's account,
//! together with the addenda records attached to it. The addenda slots
//! mirror the NACHA cardinalities: one optional Addenda02, any number of
//! Addenda05, and one optional Addenda98 (NOC) or Addenda99 (Return) that
//! fixes the entry's processing category.

use crate::records::addenda::{Addenda02, Addenda05, Addenda98, Addenda99};
use crate::records::field;
use crate::records::{check_line, Record};
use crate::types::codes::{transaction_polarity, Category, Polarity};
use crate::types::error::AchError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Modulus for the seven-digit sequence portion of a trace number
pub const TRACE_SEQUENCE_MODULUS: u64 = 10_000_000;

/// Entry detail record (record type 6)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDetail {
    /// Two-digit code for account type, direction, and prenote status
    pub transaction_code: u32,
    /// First eight digits of the receiving DFI's routing number
    pub rdfi_identification: String,
    /// Ninth digit of the receiving DFI's routing number
    pub check_digit: String,
    /// Receiver's account number at the RDFI, 17 characters
    pub dfi_account_number: String,
    /// Entry amount in cents, ten digits on the wire
    pub amount: u64,
    /// SEC-specific identifier, e.g. the check serial number for ARC
    pub identification_number: String,
    /// Receiver's name, 22 characters
    pub individual_name: String,
    /// SEC-specific two-character slot, e.g. the WEB payment type code
    pub discretionary_data: String,
    /// 1 when addenda records follow this entry, else 0
    pub addenda_record_indicator: u32,
    /// Fifteen digits: ODFI identification plus a seven-digit sequence
    pub trace_number: u64,
    /// Point-of-sale terminal addenda, POS/SHR/MTE only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addenda02: Option<Addenda02>,
    /// Payment-related information addenda, in attachment order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addenda05: Vec<Addenda05>,
    /// Notification-of-change addenda
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addenda98: Option<Addenda98>,
    /// Return addenda
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addenda99: Option<Addenda99>,
}

impl Record for EntryDetail {
    const NAME: &'static str = "EntryDetail";

    fn parse(line: &str) -> Result<Self, AchError> {
        check_line(line, '6')?;
        Ok(EntryDetail {
            transaction_code: field::parse_num(&line[1..3])? as u32,
            rdfi_identification: line[3..11].to_string(),
            check_digit: line[11..12].to_string(),
            dfi_account_number: field::parse_alpha(&line[12..29]),
            amount: field::parse_num(&line[29..39])?,
            identification_number: field::parse_alpha(&line[39..54]),
            individual_name: field::parse_alpha(&line[54..76]),
            discretionary_data: field::parse_alpha(&line[76..78]),
            addenda_record_indicator: field::parse_num(&line[78..79])? as u32,
            trace_number: field::parse_num(&line[79..94])?,
            addenda02: None,
            addenda05: Vec::new(),
            addenda98: None,
            addenda99: None,
        })
    }

    fn validate(&self) -> Result<(), AchError> {
        field::is_transaction_code(self.transaction_code)?;
        if self.rdfi_identification.trim_matches(['0', ' ']).is_empty() {
            return Err(AchError::field(
                "RDFIIdentification",
                &self.rdfi_identification,
                "mandatory field has a default value",
            ));
        }
        field::is_numeric(&self.rdfi_identification).map_err(|_| {
            AchError::field(
                "RDFIIdentification",
                &self.rdfi_identification,
                "must be eight digits",
            )
        })?;
        field::is_check_digit(&self.rdfi_identification, &self.check_digit)?;
        field::is_alphanumeric(&self.dfi_account_number)?;
        if self.amount > 9_999_999_999 {
            return Err(AchError::field(
                "Amount",
                &self.amount.to_string(),
                "does not fit in ten digits",
            ));
        }
        field::is_alphanumeric(&self.identification_number)?;
        if self.individual_name.is_empty() {
            return Err(AchError::field(
                "IndividualName",
                &self.individual_name,
                "mandatory field has a default value",
            ));
        }
        field::is_alphanumeric(&self.individual_name)?;
        field::is_alphanumeric(&self.discretionary_data)?;
        if self.addenda_record_indicator > 1 {
            return Err(AchError::field(
                "AddendaRecordIndicator",
                &self.addenda_record_indicator.to_string(),
                "must be 0 or 1",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for EntryDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "6{tc}{rdfi}{check}{account}{amount}{identification}{name}{discretionary}{indicator}{trace}",
            tc = field::numeric(self.transaction_code as u64, 2),
            rdfi = field::zero_padded(&self.rdfi_identification, 8),
            check = field::alpha(&self.check_digit, 1),
            account = field::alpha(&self.dfi_account_number, 17),
            amount = field::numeric(self.amount, 10),
            identification = field::alpha(&self.identification_number, 15),
            name = field::alpha(&self.individual_name, 22),
            discretionary = field::alpha(&self.discretionary_data, 2),
            indicator = field::numeric(self.addenda_record_indicator as u64, 1),
            trace = field::numeric(self.trace_number, 15),
        )
    }
}

impl EntryDetail {
    /// Split a nine-digit routing number into identification and check digit
    ///
    /// The value is zero-padded (or truncated) to nine characters first;
    /// the split digits are stored as given, not recomputed.
    pub fn set_rdfi(&mut self, routing: &str) {
        let padded = field::zero_padded(routing, 9);
        self.rdfi_identification = padded[0..8].to_string();
        self.check_digit = padded[8..9].to_string();
    }

    /// Build the fifteen-digit trace number from an ODFI prefix and sequence
    pub fn set_trace_number(&mut self, odfi_identification: &str, sequence: u64) {
        let prefix = field::zero_padded(odfi_identification, 8)
            .parse::<u64>()
            .unwrap_or(0);
        self.trace_number = prefix * TRACE_SEQUENCE_MODULUS + sequence % TRACE_SEQUENCE_MODULUS;
    }

    /// The seven-digit sequence portion of the trace number
    pub fn trace_sequence(&self) -> u64 {
        self.trace_number % TRACE_SEQUENCE_MODULUS
    }

    /// The eight-digit ODFI prefix of the trace number
    pub fn trace_odfi(&self) -> u64 {
        self.trace_number / TRACE_SEQUENCE_MODULUS
    }

    /// The entry's processing category, derived from its addenda
    ///
    /// A Return addenda wins over a NOC addenda; attaching the same kind
    /// again replaces the slot, so the category is monotone once fixed.
    pub fn category(&self) -> Category {
        if self.addenda99.is_some() {
            Category::Return
        } else if self.addenda98.is_some() {
            Category::Noc
        } else {
            Category::Forward
        }
    }

    /// The direction this entry moves funds
    pub fn polarity(&self) -> Polarity {
        transaction_polarity(self.transaction_code)
    }

    /// Number of addenda records attached to this entry
    pub fn addenda_count(&self) -> u64 {
        self.addenda02.is_some() as u64
            + self.addenda05.len() as u64
            + self.addenda98.is_some() as u64
            + self.addenda99.is_some() as u64
    }

    /// Whether any addenda record is attached
    pub fn has_addenda(&self) -> bool {
        self.addenda_count() > 0
    }

    /// Attach a payment-related information addenda
    pub fn add_addenda05(&mut self, addenda: Addenda05) {
        self.addenda_record_indicator = 1;
        self.addenda05.push(addenda);
    }

    /// Attach the terminal addenda used by POS, SHR, and MTE entries
    pub fn set_addenda02(&mut self, addenda: Addenda02) {
        self.addenda_record_indicator = 1;
        self.addenda02 = Some(addenda);
    }

    /// Attach a notification-of-change addenda, fixing the category to NOC
    pub fn set_addenda98(&mut self, addenda: Addenda98) {
        self.addenda_record_indicator = 1;
        self.addenda98 = Some(addenda);
    }

    /// Attach a return addenda, fixing the category to Return
    pub fn set_addenda99(&mut self, addenda: Addenda99) {
        self.addenda_record_indicator = 1;
        self.addenda99 = Some(addenda);
    }

    /// Card expiration date slot used by SHR entries, MMYY
    ///
    /// SHR stores the expiration date in the first four characters of the
    /// identification number.
    pub fn card_expiration_date(&self) -> String {
        field::alpha(&self.identification_number, 4)
    }

    /// The addenda-count column CTX entries embed in the individual name
    pub fn catx_addenda_records(&self) -> Result<u64, AchError> {
        field::parse_num(&field::alpha(&self.individual_name, 4))
            .map_err(|_| AchError::field("IndividualName", &self.individual_name, "CTX addenda count must be numeric"))
    }

    /// Populate the CTX individual-name slot: four-digit addenda count plus
    /// the receiving company name
    pub fn set_catx_addenda_records(&mut self, count: u64, receiving_company: &str) {
        self.individual_name = format!(
            "{}{}",
            field::numeric(count, 4),
            field::alpha(receiving_company, 16),
        );
    }
}
