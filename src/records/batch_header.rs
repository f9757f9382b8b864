//! Batch header record

use crate::records::field;
use crate::records::{check_line, Record};
use crate::types::codes::SecCode;
use crate::types::error::AchError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Batch header record (record type 5)
///
/// Opens a batch and declares the company originating the entries, the
/// Standard Entry Class the batch is validated under, and the service
/// class code that constrains the polarity of every entry inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchHeader {
    /// 200 mixed, 220 credits only, 225 debits only, 280 advices
    pub service_class_code: u32,
    /// Company known to and authorized by the receiver, 16 characters
    pub company_name: String,
    /// Free-form company use, 20 characters
    pub company_discretionary_data: String,
    /// Company identifier, usually an IRS EIN with a leading digit
    pub company_identification: String,
    /// Standard Entry Class code, three letters
    pub standard_entry_class_code: String,
    /// Description of the entries shown to the receiver, e.g. "PAYROLL"
    pub company_entry_description: String,
    /// Free-form date significant to the company, 6 characters
    pub company_descriptive_date: String,
    /// Date the entries should settle
    pub effective_entry_date: NaiveDate,
    /// Julian settlement date, populated by the receiving point on ingress
    #[serde(skip)]
    pub settlement_date: String,
    /// 1 for most originators, 2 for federal government agencies
    pub originator_status_code: u32,
    /// First eight digits of the originating DFI's routing number
    pub odfi_identification: String,
    /// Position of this batch within the file, assigned by `File::create`
    pub batch_number: u64,
}

impl Default for BatchHeader {
    fn default() -> Self {
        BatchHeader {
            service_class_code: 0,
            company_name: String::new(),
            company_discretionary_data: String::new(),
            company_identification: String::new(),
            standard_entry_class_code: String::new(),
            company_entry_description: String::new(),
            company_descriptive_date: String::new(),
            effective_entry_date: NaiveDate::default(),
            settlement_date: String::new(),
            originator_status_code: 1,
            odfi_identification: String::new(),
            batch_number: 1,
        }
    }
}

impl Record for BatchHeader {
    const NAME: &'static str = "BatchHeader";

    fn parse(line: &str) -> Result<Self, AchError> {
        check_line(line, '5')?;
        Ok(BatchHeader {
            service_class_code: field::parse_num(&line[1..4])? as u32,
            company_name: field::parse_alpha(&line[4..20]),
            company_discretionary_data: field::parse_alpha(&line[20..40]),
            company_identification: field::parse_alpha(&line[40..50]),
            standard_entry_class_code: field::parse_alpha(&line[50..53]),
            company_entry_description: field::parse_alpha(&line[53..63]),
            company_descriptive_date: field::parse_alpha(&line[63..69]),
            effective_entry_date: field::parse_date(&line[69..75])?,
            settlement_date: field::parse_alpha(&line[75..78]),
            originator_status_code: field::parse_num(&line[78..79])? as u32,
            odfi_identification: line[79..87].to_string(),
            batch_number: field::parse_num(&line[87..94])?,
        })
    }

    fn validate(&self) -> Result<(), AchError> {
        field::is_service_class_code(self.service_class_code)?;
        if self.company_name.is_empty() {
            return Err(AchError::field(
                "CompanyName",
                &self.company_name,
                "mandatory field has a default value",
            ));
        }
        field::is_alphanumeric(&self.company_name)?;
        field::is_alphanumeric(&self.company_discretionary_data)?;
        if self.company_identification.is_empty() {
            return Err(AchError::field(
                "CompanyIdentification",
                &self.company_identification,
                "mandatory field has a default value",
            ));
        }
        field::is_alphanumeric(&self.company_identification)?;
        self.sec_code()?;
        if self.company_entry_description.is_empty() {
            return Err(AchError::field(
                "CompanyEntryDescription",
                &self.company_entry_description,
                "mandatory field has a default value",
            ));
        }
        field::is_alphanumeric(&self.company_entry_description)?;
        field::is_alphanumeric(&self.company_descriptive_date)?;
        field::is_originator_status_code(self.originator_status_code)?;
        if self.odfi_identification.trim_matches(['0', ' ']).is_empty() {
            return Err(AchError::field(
                "ODFIIdentification",
                &self.odfi_identification,
                "mandatory field has a default value",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for BatchHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "5{scc}{name}{discretionary}{company}{sec}{description}{descriptive}{effective}{settlement}{osc}{odfi}{number}",
            scc = field::numeric(self.service_class_code as u64, 3),
            name = field::alpha(&self.company_name, 16),
            discretionary = field::alpha(&self.company_discretionary_data, 20),
            company = field::alpha(&self.company_identification, 10),
            sec = field::alpha(&self.standard_entry_class_code, 3),
            description = field::alpha(&self.company_entry_description, 10),
            descriptive = field::alpha(&self.company_descriptive_date, 6),
            effective = self.effective_entry_date.format("%y%m%d"),
            settlement = field::alpha(&self.settlement_date, 3),
            osc = field::numeric(self.originator_status_code as u64, 1),
            odfi = self.odfi_identification_field(),
            number = field::numeric(self.batch_number, 7),
        )
    }
}

impl BatchHeader {
    /// The parsed Standard Entry Class code
    ///
    /// Fails for unknown codes and for "IAT", which must be built through
    /// the IAT batch type.
    pub fn sec_code(&self) -> Result<SecCode, AchError> {
        self.standard_entry_class_code.parse()
    }

    /// The eight-character ODFI identification, zero padded
    pub fn odfi_identification_field(&self) -> String {
        field::zero_padded(&self.odfi_identification, 8)
    }
}
