//! IAT addenda records
//!
//! International entries travel with a fixed suite of addenda: types 10
//! through 16 are mandatory and appear exactly once each, type 17
//! (remittance) may appear up to twice, and type 18 (foreign correspondent
//! bank) up to five times. Every record here ends with the seven-digit
//! entry detail sequence number tying it back to its entry's trace number.

use crate::records::addenda::expect_type_code;
use crate::records::field;
use crate::records::{check_line, Record};
use crate::types::error::AchError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction type and foreign payment information (type code 10)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addenda10 {
    /// Three-character transaction type code, e.g. ANN, BUS, WEB
    pub transaction_type_code: String,
    /// Amount in the foreign currency, 18 digits
    pub foreign_payment_amount: u64,
    /// Trace number assigned by the foreign gateway, 22 characters
    pub foreign_trace_number: String,
    /// Receiving company or individual name, 35 characters
    pub receiving_name: String,
    /// Rightmost seven digits of the parent entry's trace number
    pub entry_detail_sequence_number: u64,
}

impl Record for Addenda10 {
    const NAME: &'static str = "Addenda10";

    fn parse(line: &str) -> Result<Self, AchError> {
        check_line(line, '7')?;
        expect_type_code(line, "10")?;
        Ok(Addenda10 {
            transaction_type_code: field::parse_alpha(&line[3..6]),
            foreign_payment_amount: field::parse_num(&line[6..24])?,
            foreign_trace_number: field::parse_alpha(&line[24..46]),
            receiving_name: field::parse_alpha(&line[46..81]),
            entry_detail_sequence_number: field::parse_num(&line[87..94])?,
        })
    }

    fn validate(&self) -> Result<(), AchError> {
        if self.transaction_type_code.len() != 3 {
            return Err(AchError::field(
                "TransactionTypeCode",
                &self.transaction_type_code,
                "must be three characters",
            ));
        }
        field::is_alphanumeric(&self.foreign_trace_number)?;
        if self.receiving_name.is_empty() {
            return Err(AchError::field(
                "ReceivingName",
                &self.receiving_name,
                "mandatory field has a default value",
            ));
        }
        field::is_alphanumeric(&self.receiving_name)
    }
}

impl fmt::Display for Addenda10 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "710{tt}{amount}{trace}{name}{reserved}{edsn}",
            tt = field::alpha(&self.transaction_type_code, 3),
            amount = field::numeric(self.foreign_payment_amount, 18),
            trace = field::alpha(&self.foreign_trace_number, 22),
            name = field::alpha(&self.receiving_name, 35),
            reserved = "      ",
            edsn = field::numeric(self.entry_detail_sequence_number, 7),
        )
    }
}

/// Originator name and street address (type code 11)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addenda11 {
    pub originator_name: String,
    pub originator_street_address: String,
    /// Rightmost seven digits of the parent entry's trace number
    pub entry_detail_sequence_number: u64,
}

impl Record for Addenda11 {
    const NAME: &'static str = "Addenda11";

    fn parse(line: &str) -> Result<Self, AchError> {
        check_line(line, '7')?;
        expect_type_code(line, "11")?;
        Ok(Addenda11 {
            originator_name: field::parse_alpha(&line[3..38]),
            originator_street_address: field::parse_alpha(&line[38..73]),
            entry_detail_sequence_number: field::parse_num(&line[87..94])?,
        })
    }

    fn validate(&self) -> Result<(), AchError> {
        require_35(&self.originator_name, "OriginatorName")?;
        require_35(&self.originator_street_address, "OriginatorStreetAddress")
    }
}

impl fmt::Display for Addenda11 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "711{name}{street}{reserved}{edsn}",
            name = field::alpha(&self.originator_name, 35),
            street = field::alpha(&self.originator_street_address, 35),
            reserved = " ".repeat(14),
            edsn = field::numeric(self.entry_detail_sequence_number, 7),
        )
    }
}

/// Originator city/state and country/postal code (type code 12)
///
/// City and state, and country and postal code, are each separated with an
/// asterisk and terminated with a backslash, e.g. `San Francisco*CA\`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addenda12 {
    pub originator_city_state_province: String,
    pub originator_country_postal_code: String,
    /// Rightmost seven digits of the parent entry's trace number
    pub entry_detail_sequence_number: u64,
}

impl Record for Addenda12 {
    const NAME: &'static str = "Addenda12";

    fn parse(line: &str) -> Result<Self, AchError> {
        check_line(line, '7')?;
        expect_type_code(line, "12")?;
        Ok(Addenda12 {
            originator_city_state_province: field::parse_alpha(&line[3..38]),
            originator_country_postal_code: field::parse_alpha(&line[38..73]),
            entry_detail_sequence_number: field::parse_num(&line[87..94])?,
        })
    }

    fn validate(&self) -> Result<(), AchError> {
        require_35(&self.originator_city_state_province, "OriginatorCityStateProvince")?;
        require_35(&self.originator_country_postal_code, "OriginatorCountryPostalCode")
    }
}

impl fmt::Display for Addenda12 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "712{city}{country}{reserved}{edsn}",
            city = field::alpha(&self.originator_city_state_province, 35),
            country = field::alpha(&self.originator_country_postal_code, 35),
            reserved = " ".repeat(14),
            edsn = field::numeric(self.entry_detail_sequence_number, 7),
        )
    }
}

/// Originating DFI name and identification (type code 13)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addenda13 {
    pub odfi_name: String,
    /// 01 national clearing system, 02 BIC, 03 IBAN
    pub odfi_id_number_qualifier: String,
    pub odfi_identification: String,
    /// Rightmost seven digits of the parent entry's trace number
    pub entry_detail_sequence_number: u64,
}

impl Record for Addenda13 {
    const NAME: &'static str = "Addenda13";

    fn parse(line: &str) -> Result<Self, AchError> {
        check_line(line, '7')?;
        expect_type_code(line, "13")?;
        Ok(Addenda13 {
            odfi_name: field::parse_alpha(&line[3..38]),
            odfi_id_number_qualifier: field::parse_alpha(&line[38..40]),
            odfi_identification: field::parse_alpha(&line[40..74]),
            entry_detail_sequence_number: field::parse_num(&line[87..94])?,
        })
    }

    fn validate(&self) -> Result<(), AchError> {
        require_35(&self.odfi_name, "ODFIName")?;
        is_id_number_qualifier(&self.odfi_id_number_qualifier, "ODFIIDNumberQualifier")?;
        field::is_alphanumeric(&self.odfi_identification)
    }
}

impl fmt::Display for Addenda13 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "713{name}{qualifier}{id}{reserved}{edsn}",
            name = field::alpha(&self.odfi_name, 35),
            qualifier = field::alpha(&self.odfi_id_number_qualifier, 2),
            id = field::alpha(&self.odfi_identification, 34),
            reserved = " ".repeat(13),
            edsn = field::numeric(self.entry_detail_sequence_number, 7),
        )
    }
}

/// Receiving DFI name and identification (type code 14)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addenda14 {
    pub rdfi_name: String,
    /// 01 national clearing system, 02 BIC, 03 IBAN
    pub rdfi_id_number_qualifier: String,
    pub rdfi_identification: String,
    /// Rightmost seven digits of the parent entry's trace number
    pub entry_detail_sequence_number: u64,
}

impl Record for Addenda14 {
    const NAME: &'static str = "Addenda14";

    fn parse(line: &str) -> Result<Self, AchError> {
        check_line(line, '7')?;
        expect_type_code(line, "14")?;
        Ok(Addenda14 {
            rdfi_name: field::parse_alpha(&line[3..38]),
            rdfi_id_number_qualifier: field::parse_alpha(&line[38..40]),
            rdfi_identification: field::parse_alpha(&line[40..74]),
            entry_detail_sequence_number: field::parse_num(&line[87..94])?,
        })
    }

    fn validate(&self) -> Result<(), AchError> {
        require_35(&self.rdfi_name, "RDFIName")?;
        is_id_number_qualifier(&self.rdfi_id_number_qualifier, "RDFIIDNumberQualifier")?;
        field::is_alphanumeric(&self.rdfi_identification)
    }
}

impl fmt::Display for Addenda14 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "714{name}{qualifier}{id}{reserved}{edsn}",
            name = field::alpha(&self.rdfi_name, 35),
            qualifier = field::alpha(&self.rdfi_id_number_qualifier, 2),
            id = field::alpha(&self.rdfi_identification, 34),
            reserved = " ".repeat(13),
            edsn = field::numeric(self.entry_detail_sequence_number, 7),
        )
    }
}

/// Receiver identification and street address (type code 15)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addenda15 {
    pub receiver_id_number: String,
    pub receiver_street_address: String,
    /// Rightmost seven digits of the parent entry's trace number
    pub entry_detail_sequence_number: u64,
}

impl Record for Addenda15 {
    const NAME: &'static str = "Addenda15";

    fn parse(line: &str) -> Result<Self, AchError> {
        check_line(line, '7')?;
        expect_type_code(line, "15")?;
        Ok(Addenda15 {
            receiver_id_number: field::parse_alpha(&line[3..18]),
            receiver_street_address: field::parse_alpha(&line[18..53]),
            entry_detail_sequence_number: field::parse_num(&line[87..94])?,
        })
    }

    fn validate(&self) -> Result<(), AchError> {
        field::is_alphanumeric(&self.receiver_id_number)?;
        require_35(&self.receiver_street_address, "ReceiverStreetAddress")
    }
}

impl fmt::Display for Addenda15 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "715{id}{street}{reserved}{edsn}",
            id = field::alpha(&self.receiver_id_number, 15),
            street = field::alpha(&self.receiver_street_address, 35),
            reserved = " ".repeat(34),
            edsn = field::numeric(self.entry_detail_sequence_number, 7),
        )
    }
}

/// Receiver city/state and country/postal code (type code 16)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addenda16 {
    pub receiver_city_state_province: String,
    pub receiver_country_postal_code: String,
    /// Rightmost seven digits of the parent entry's trace number
    pub entry_detail_sequence_number: u64,
}

impl Record for Addenda16 {
    const NAME: &'static str = "Addenda16";

    fn parse(line: &str) -> Result<Self, AchError> {
        check_line(line, '7')?;
        expect_type_code(line, "16")?;
        Ok(Addenda16 {
            receiver_city_state_province: field::parse_alpha(&line[3..38]),
            receiver_country_postal_code: field::parse_alpha(&line[38..73]),
            entry_detail_sequence_number: field::parse_num(&line[87..94])?,
        })
    }

    fn validate(&self) -> Result<(), AchError> {
        require_35(&self.receiver_city_state_province, "ReceiverCityStateProvince")?;
        require_35(&self.receiver_country_postal_code, "ReceiverCountryPostalCode")
    }
}

impl fmt::Display for Addenda16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "716{city}{country}{reserved}{edsn}",
            city = field::alpha(&self.receiver_city_state_province, 35),
            country = field::alpha(&self.receiver_country_postal_code, 35),
            reserved = " ".repeat(14),
            edsn = field::numeric(self.entry_detail_sequence_number, 7),
        )
    }
}

/// Optional payment-related remittance information (type code 17)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addenda17 {
    pub payment_related_information: String,
    /// Position of this addenda within its entry, assigned by `build`
    pub sequence_number: u64,
    /// Rightmost seven digits of the parent entry's trace number
    pub entry_detail_sequence_number: u64,
}

impl Record for Addenda17 {
    const NAME: &'static str = "Addenda17";

    fn parse(line: &str) -> Result<Self, AchError> {
        check_line(line, '7')?;
        expect_type_code(line, "17")?;
        Ok(Addenda17 {
            payment_related_information: field::parse_alpha(&line[3..83]),
            sequence_number: field::parse_num(&line[83..87])?,
            entry_detail_sequence_number: field::parse_num(&line[87..94])?,
        })
    }

    fn validate(&self) -> Result<(), AchError> {
        field::is_alphanumeric(&self.payment_related_information)
    }
}

impl fmt::Display for Addenda17 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "717{info}{sequence}{edsn}",
            info = field::alpha(&self.payment_related_information, 80),
            sequence = field::numeric(self.sequence_number, 4),
            edsn = field::numeric(self.entry_detail_sequence_number, 7),
        )
    }
}

/// Optional foreign correspondent bank information (type code 18)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addenda18 {
    pub foreign_correspondent_bank_name: String,
    /// 01 national clearing system, 02 BIC, 03 IBAN
    pub foreign_correspondent_bank_id_number_qualifier: String,
    pub foreign_correspondent_bank_id_number: String,
    /// ISO 3166 country code of the correspondent bank's branch
    pub foreign_correspondent_bank_branch_country_code: String,
    /// Position of this addenda within its entry, assigned by `build`
    pub sequence_number: u64,
    /// Rightmost seven digits of the parent entry's trace number
    pub entry_detail_sequence_number: u64,
}

impl Record for Addenda18 {
    const NAME: &'static str = "Addenda18";

    fn parse(line: &str) -> Result<Self, AchError> {
        check_line(line, '7')?;
        expect_type_code(line, "18")?;
        Ok(Addenda18 {
            foreign_correspondent_bank_name: field::parse_alpha(&line[3..38]),
            foreign_correspondent_bank_id_number_qualifier: field::parse_alpha(&line[38..40]),
            foreign_correspondent_bank_id_number: field::parse_alpha(&line[40..74]),
            foreign_correspondent_bank_branch_country_code: field::parse_alpha(&line[74..77]),
            sequence_number: field::parse_num(&line[83..87])?,
            entry_detail_sequence_number: field::parse_num(&line[87..94])?,
        })
    }

    fn validate(&self) -> Result<(), AchError> {
        require_35(&self.foreign_correspondent_bank_name, "ForeignCorrespondentBankName")?;
        is_id_number_qualifier(
            &self.foreign_correspondent_bank_id_number_qualifier,
            "ForeignCorrespondentBankIDNumberQualifier",
        )?;
        field::is_alphanumeric(&self.foreign_correspondent_bank_id_number)?;
        field::is_alphanumeric(&self.foreign_correspondent_bank_branch_country_code)
    }
}

impl fmt::Display for Addenda18 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "718{name}{qualifier}{id}{country}{reserved}{sequence}{edsn}",
            name = field::alpha(&self.foreign_correspondent_bank_name, 35),
            qualifier = field::alpha(&self.foreign_correspondent_bank_id_number_qualifier, 2),
            id = field::alpha(&self.foreign_correspondent_bank_id_number, 34),
            country = field::alpha(&self.foreign_correspondent_bank_branch_country_code, 3),
            reserved = "      ",
            sequence = field::numeric(self.sequence_number, 4),
            edsn = field::numeric(self.entry_detail_sequence_number, 7),
        )
    }
}

fn require_35(value: &str, name: &str) -> Result<(), AchError> {
    if value.is_empty() {
        return Err(AchError::field(name, value, "mandatory field has a default value"));
    }
    field::is_alphanumeric(value)
}

fn is_id_number_qualifier(value: &str, name: &str) -> Result<(), AchError> {
    match value {
        "01" | "02" | "03" => Ok(()),
        _ => Err(AchError::field(name, value, "must be 01, 02, or 03")),
    }
}
