//! IAT batch header record

use crate::records::field;
use crate::records::{check_line, Record};
use crate::types::error::AchError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// IAT batch header record (record type 5, SEC code "IAT")
///
/// International batches replace the company fields of a domestic batch
/// header with foreign-exchange and ISO country/currency information. The
/// reader selects this record over [`BatchHeader`](crate::records::BatchHeader)
/// by peeking at the Standard Entry Class columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IatBatchHeader {
    /// 200 mixed, 220 credits only, 225 debits only
    pub service_class_code: u32,
    /// Blank for forward items, "IATCOR" for IAT notifications of change
    pub iat_indicator: String,
    /// FV (fixed-to-variable), VF (variable-to-fixed), or FF (fixed-to-fixed)
    pub foreign_exchange_indicator: String,
    /// 1 foreign exchange rate, 2 foreign exchange reference number, 3 space filled
    pub foreign_exchange_reference_indicator: u32,
    /// Content named by the reference indicator, 15 characters
    pub foreign_exchange_reference: String,
    /// ISO 3166 two-letter code of the receiving country
    pub iso_destination_country_code: String,
    /// Originator's identification, 10 characters
    pub originator_identification: String,
    /// "IAT", or "COR" for an IAT notification of change
    pub standard_entry_class_code: String,
    /// Description of the entries shown to the receiver
    pub company_entry_description: String,
    /// ISO 4217 currency code of the originating account
    pub iso_originating_currency_code: String,
    /// ISO 4217 currency code of the destination account
    pub iso_destination_currency_code: String,
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

impl Default for IatBatchHeader {
    fn default() -> Self {
        IatBatchHeader {
            service_class_code: 0,
            iat_indicator: String::new(),
            foreign_exchange_indicator: String::new(),
            foreign_exchange_reference_indicator: 3,
            foreign_exchange_reference: String::new(),
            iso_destination_country_code: String::new(),
            originator_identification: String::new(),
            standard_entry_class_code: "IAT".to_string(),
            company_entry_description: String::new(),
            iso_originating_currency_code: String::new(),
            iso_destination_currency_code: String::new(),
            effective_entry_date: NaiveDate::default(),
            settlement_date: String::new(),
            originator_status_code: 1,
            odfi_identification: String::new(),
            batch_number: 1,
        }
    }
}

impl Record for IatBatchHeader {
    const NAME: &'static str = "IATBatchHeader";

    fn parse(line: &str) -> Result<Self, AchError> {
        check_line(line, '5')?;
        Ok(IatBatchHeader {
            service_class_code: field::parse_num(&line[1..4])? as u32,
            iat_indicator: field::parse_alpha(&line[4..20]),
            foreign_exchange_indicator: field::parse_alpha(&line[20..22]),
            foreign_exchange_reference_indicator: field::parse_num(&line[22..23])? as u32,
            foreign_exchange_reference: field::parse_alpha(&line[23..38]),
            iso_destination_country_code: field::parse_alpha(&line[38..40]),
            originator_identification: field::parse_alpha(&line[40..50]),
            standard_entry_class_code: field::parse_alpha(&line[50..53]),
            company_entry_description: field::parse_alpha(&line[53..63]),
            iso_originating_currency_code: field::parse_alpha(&line[63..66]),
            iso_destination_currency_code: field::parse_alpha(&line[66..69]),
            effective_entry_date: field::parse_date(&line[69..75])?,
            settlement_date: field::parse_alpha(&line[75..78]),
            originator_status_code: field::parse_num(&line[78..79])? as u32,
            odfi_identification: line[79..87].to_string(),
            batch_number: field::parse_num(&line[87..94])?,
        })
    }

    fn validate(&self) -> Result<(), AchError> {
        field::is_service_class_code(self.service_class_code)?;
        match self.foreign_exchange_indicator.as_str() {
            "FV" | "VF" | "FF" => {}
            other => {
                return Err(AchError::field(
                    "ForeignExchangeIndicator",
                    other,
                    "must be FV, VF, or FF",
                ))
            }
        }
        if !(1..=3).contains(&self.foreign_exchange_reference_indicator) {
            return Err(AchError::field(
                "ForeignExchangeReferenceIndicator",
                &self.foreign_exchange_reference_indicator.to_string(),
                "must be 1, 2, or 3",
            ));
        }
        field::is_alphanumeric(&self.foreign_exchange_reference)?;
        if self.iso_destination_country_code.len() != 2 {
            return Err(AchError::field(
                "ISODestinationCountryCode",
                &self.iso_destination_country_code,
                "must be a two-letter ISO country code",
            ));
        }
        if self.originator_identification.is_empty() {
            return Err(AchError::field(
                "OriginatorIdentification",
                &self.originator_identification,
                "mandatory field has a default value",
            ));
        }
        field::is_alphanumeric(&self.originator_identification)?;
        if self.standard_entry_class_code != "IAT" && self.standard_entry_class_code != "COR" {
            return Err(AchError::field(
                "StandardEntryClassCode",
                &self.standard_entry_class_code,
                "must be IAT for international batches",
            ));
        }
        if self.company_entry_description.is_empty() {
            return Err(AchError::field(
                "CompanyEntryDescription",
                &self.company_entry_description,
                "mandatory field has a default value",
            ));
        }
        field::is_alphanumeric(&self.company_entry_description)?;
        for (name, code) in [
            ("ISOOriginatingCurrencyCode", &self.iso_originating_currency_code),
            ("ISODestinationCurrencyCode", &self.iso_destination_currency_code),
        ] {
            if code.len() != 3 {
                return Err(AchError::field(name, code, "must be a three-letter ISO currency code"));
            }
        }
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

impl fmt::Display for IatBatchHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "5{scc}{iat}{fx}{fx_ref_ind}{fx_ref}{country}{originator}{sec}{description}{orig_ccy}{dest_ccy}{effective}{settlement}{osc}{odfi}{number}",
            scc = field::numeric(self.service_class_code as u64, 3),
            iat = field::alpha(&self.iat_indicator, 16),
            fx = field::alpha(&self.foreign_exchange_indicator, 2),
            fx_ref_ind = field::numeric(self.foreign_exchange_reference_indicator as u64, 1),
            fx_ref = field::alpha(&self.foreign_exchange_reference, 15),
            country = field::alpha(&self.iso_destination_country_code, 2),
            originator = field::alpha(&self.originator_identification, 10),
            sec = field::alpha(&self.standard_entry_class_code, 3),
            description = field::alpha(&self.company_entry_description, 10),
            orig_ccy = field::alpha(&self.iso_originating_currency_code, 3),
            dest_ccy = field::alpha(&self.iso_destination_currency_code, 3),
            effective = self.effective_entry_date.format("%y%m%d"),
            settlement = field::alpha(&self.settlement_date, 3),
            osc = field::numeric(self.originator_status_code as u64, 1),
            odfi = self.odfi_identification_field(),
            number = field::numeric(self.batch_number, 7),
        )
    }
}

impl IatBatchHeader {
    /// The eight-character ODFI identification, zero padded
    pub fn odfi_identification_field(&self) -> String {
        field::zero_padded(&self.odfi_identification, 8)
    }
}
