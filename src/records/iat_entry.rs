//! IAT entry detail record

use crate::records::addenda::{Addenda98, Addenda99};
use crate::records::entry_detail::TRACE_SEQUENCE_MODULUS;
use crate::records::field;
use crate::records::iat_addenda::{
    Addenda10, Addenda11, Addenda12, Addenda13, Addenda14, Addenda15, Addenda16, Addenda17,
    Addenda18,
};
use crate::records::{check_line, Record};
use crate::types::codes::{transaction_polarity, Category, Polarity};
use crate::types::error::AchError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// IAT entry detail record (record type 6)
///
/// International entries carry a 35-character account number and an
/// addenda-record count instead of the domestic identification and name
/// columns; the receiver's name and addresses travel in the mandatory
/// addenda 10 through 16.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IatEntryDetail {
    /// Two-digit code for account type, direction, and prenote status
    pub transaction_code: u32,
    /// First eight digits of the receiving DFI's routing number
    pub rdfi_identification: String,
    /// Ninth digit of the receiving DFI's routing number
    pub check_digit: String,
    /// Number of addenda records attached to this entry, four digits
    pub addenda_records: u64,
    /// Entry amount in cents
    pub amount: u64,
    /// Receiver's account number, 35 characters
    pub dfi_account_number: String,
    /// OFAC screening indicator, blank or 0/1
    pub ofac_screening_indicator: String,
    /// Secondary OFAC screening indicator, blank or 0/1
    pub secondary_ofac_screening_indicator: String,
    /// 1 when addenda records follow this entry, else 0
    pub addenda_record_indicator: u32,
    /// Fifteen digits: ODFI identification plus a seven-digit sequence
    pub trace_number: u64,
    /// Transaction type and foreign payment amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addenda10: Option<Addenda10>,
    /// Originator name and street address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addenda11: Option<Addenda11>,
    /// Originator city, state, country, and postal code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addenda12: Option<Addenda12>,
    /// Originating DFI name and identification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addenda13: Option<Addenda13>,
    /// Receiving DFI name and identification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addenda14: Option<Addenda14>,
    /// Receiver identification and street address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addenda15: Option<Addenda15>,
    /// Receiver city, state, country, and postal code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addenda16: Option<Addenda16>,
    /// Optional remittance information, at most two
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addenda17: Vec<Addenda17>,
    /// Optional foreign correspondent bank information, at most five
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addenda18: Vec<Addenda18>,
    /// Notification-of-change addenda
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addenda98: Option<Addenda98>,
    /// Return addenda
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addenda99: Option<Addenda99>,
}

impl Record for IatEntryDetail {
    const NAME: &'static str = "IATEntryDetail";

    fn parse(line: &str) -> Result<Self, AchError> {
        check_line(line, '6')?;
        Ok(IatEntryDetail {
            transaction_code: field::parse_num(&line[1..3])? as u32,
            rdfi_identification: line[3..11].to_string(),
            check_digit: line[11..12].to_string(),
            addenda_records: field::parse_num(&line[12..16])?,
            amount: field::parse_num(&line[29..39])?,
            dfi_account_number: field::parse_alpha(&line[39..74]),
            ofac_screening_indicator: field::parse_alpha(&line[76..77]),
            secondary_ofac_screening_indicator: field::parse_alpha(&line[77..78]),
            addenda_record_indicator: field::parse_num(&line[78..79])? as u32,
            trace_number: field::parse_num(&line[79..94])?,
            ..IatEntryDetail::default()
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
        if self.amount > 9_999_999_999 {
            return Err(AchError::field(
                "Amount",
                &self.amount.to_string(),
                "does not fit in ten digits",
            ));
        }
        if self.dfi_account_number.is_empty() {
            return Err(AchError::field(
                "DFIAccountNumber",
                &self.dfi_account_number,
                "mandatory field has a default value",
            ));
        }
        field::is_alphanumeric(&self.dfi_account_number)?;
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

impl fmt::Display for IatEntryDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "6{tc}{rdfi}{check}{addenda}{reserved13}{amount}{account}{reserved2}{ofac}{ofac2}{indicator}{trace}",
            tc = field::numeric(self.transaction_code as u64, 2),
            rdfi = field::zero_padded(&self.rdfi_identification, 8),
            check = field::alpha(&self.check_digit, 1),
            addenda = field::numeric(self.addenda_records, 4),
            reserved13 = " ".repeat(13),
            amount = field::numeric(self.amount, 10),
            account = field::alpha(&self.dfi_account_number, 35),
            reserved2 = "  ",
            ofac = field::alpha(&self.ofac_screening_indicator, 1),
            ofac2 = field::alpha(&self.secondary_ofac_screening_indicator, 1),
            indicator = field::numeric(self.addenda_record_indicator as u64, 1),
            trace = field::numeric(self.trace_number, 15),
        )
    }
}

impl IatEntryDetail {
    /// Split a nine-digit routing number into identification and check digit
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
        self.addenda10.is_some() as u64
            + self.addenda11.is_some() as u64
            + self.addenda12.is_some() as u64
            + self.addenda13.is_some() as u64
            + self.addenda14.is_some() as u64
            + self.addenda15.is_some() as u64
            + self.addenda16.is_some() as u64
            + self.addenda17.len() as u64
            + self.addenda18.len() as u64
            + self.addenda98.is_some() as u64
            + self.addenda99.is_some() as u64
    }

    /// Whether any addenda record is attached
    pub fn has_addenda(&self) -> bool {
        self.addenda_count() > 0
    }

    /// Attach an optional remittance addenda
    pub fn add_addenda17(&mut self, addenda: Addenda17) {
        self.addenda_record_indicator = 1;
        self.addenda17.push(addenda);
    }

    /// Attach an optional foreign correspondent bank addenda
    pub fn add_addenda18(&mut self, addenda: Addenda18) {
        self.addenda_record_indicator = 1;
        self.addenda18.push(addenda);
    }
}
