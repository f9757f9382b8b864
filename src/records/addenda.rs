//! Addenda records for domestic entries
//!
//! Four addenda shapes attach to domestic entry details:
//!
//! - `Addenda02` - terminal information for card-present entries (POS, SHR, MTE)
//! - `Addenda05` - free-form payment-related information
//! - `Addenda98` - notification of change, carrying the corrected data
//! - `Addenda99` - return, carrying the return reason

use crate::records::field;
use crate::records::{check_line, Record};
use crate::types::error::AchError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal addenda (type code 02) for POS, SHR, and MTE entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addenda02 {
    /// Ties the addenda to company records, 7 characters
    pub reference_information_one: String,
    /// Second reference slot, 3 characters
    pub reference_information_two: String,
    /// Identifies the terminal where the transaction originated
    pub terminal_identification_code: String,
    /// Serial number assigned by the terminal
    pub transaction_serial_number: String,
    /// MMDD the transaction occurred
    pub transaction_date: String,
    /// Authorization code or card expiration date, 6 characters
    pub authorization_code_or_expire_date: String,
    /// Terminal street address
    pub terminal_location: String,
    /// Terminal city
    pub terminal_city: String,
    /// Terminal state, two-letter abbreviation
    pub terminal_state: String,
    /// Trace number of the parent entry
    pub trace_number: u64,
}

impl Record for Addenda02 {
    const NAME: &'static str = "Addenda02";

    fn parse(line: &str) -> Result<Self, AchError> {
        check_line(line, '7')?;
        expect_type_code(line, "02")?;
        Ok(Addenda02 {
            reference_information_one: field::parse_alpha(&line[3..10]),
            reference_information_two: field::parse_alpha(&line[10..13]),
            terminal_identification_code: field::parse_alpha(&line[13..19]),
            transaction_serial_number: field::parse_alpha(&line[19..25]),
            transaction_date: field::parse_alpha(&line[25..29]),
            authorization_code_or_expire_date: field::parse_alpha(&line[29..35]),
            terminal_location: field::parse_alpha(&line[35..62]),
            terminal_city: field::parse_alpha(&line[62..77]),
            terminal_state: field::parse_alpha(&line[77..79]),
            trace_number: field::parse_num(&line[79..94])?,
        })
    }

    fn validate(&self) -> Result<(), AchError> {
        field::is_alphanumeric(&self.reference_information_one)?;
        field::is_alphanumeric(&self.reference_information_two)?;
        if self.terminal_identification_code.is_empty() {
            return Err(AchError::field(
                "TerminalIdentificationCode",
                &self.terminal_identification_code,
                "mandatory field has a default value",
            ));
        }
        field::is_alphanumeric(&self.terminal_identification_code)?;
        field::is_alphanumeric(&self.transaction_serial_number)?;
        if self.transaction_date.len() != 4 {
            return Err(AchError::field(
                "TransactionDate",
                &self.transaction_date,
                "must be MMDD",
            ));
        }
        field::is_month(&self.transaction_date[0..2]).map_err(|_| {
            AchError::field("TransactionDate", &self.transaction_date, "must be MMDD")
        })?;
        field::is_alphanumeric(&self.authorization_code_or_expire_date)?;
        field::is_alphanumeric(&self.terminal_location)?;
        if self.terminal_city.is_empty() {
            return Err(AchError::field(
                "TerminalCity",
                &self.terminal_city,
                "mandatory field has a default value",
            ));
        }
        field::is_alphanumeric(&self.terminal_city)?;
        if self.terminal_state.len() != 2 {
            return Err(AchError::field(
                "TerminalState",
                &self.terminal_state,
                "must be a two-letter state abbreviation",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Addenda02 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "702{ref1}{ref2}{terminal}{serial}{date}{auth}{location}{city}{state}{trace}",
            ref1 = field::alpha(&self.reference_information_one, 7),
            ref2 = field::alpha(&self.reference_information_two, 3),
            terminal = field::alpha(&self.terminal_identification_code, 6),
            serial = field::alpha(&self.transaction_serial_number, 6),
            date = field::alpha(&self.transaction_date, 4),
            auth = field::alpha(&self.authorization_code_or_expire_date, 6),
            location = field::alpha(&self.terminal_location, 27),
            city = field::alpha(&self.terminal_city, 15),
            state = field::alpha(&self.terminal_state, 2),
            trace = field::numeric(self.trace_number, 15),
        )
    }
}

/// Payment-related information addenda (type code 05)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addenda05 {
    /// Free-form remittance data, 80 characters
    pub payment_related_information: String,
    /// Position of this addenda within its entry, assigned by `build`
    pub sequence_number: u64,
    /// Rightmost seven digits of the parent entry's trace number
    pub entry_detail_sequence_number: u64,
}

impl Record for Addenda05 {
    const NAME: &'static str = "Addenda05";

    fn parse(line: &str) -> Result<Self, AchError> {
        check_line(line, '7')?;
        expect_type_code(line, "05")?;
        Ok(Addenda05 {
            payment_related_information: field::parse_alpha(&line[3..83]),
            sequence_number: field::parse_num(&line[83..87])?,
            entry_detail_sequence_number: field::parse_num(&line[87..94])?,
        })
    }

    fn validate(&self) -> Result<(), AchError> {
        field::is_alphanumeric(&self.payment_related_information)
    }
}

impl fmt::Display for Addenda05 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "705{info}{sequence}{edsn}",
            info = field::alpha(&self.payment_related_information, 80),
            sequence = field::numeric(self.sequence_number, 4),
            edsn = field::numeric(self.entry_detail_sequence_number, 7),
        )
    }
}

/// Notification-of-change addenda (type code 98)
///
/// Instructs the originator to correct account or routing information on
/// future entries. The change code names what was wrong; the corrected
/// data carries the replacement value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addenda98 {
    /// Change code C01-C69
    pub change_code: String,
    /// Trace number of the original entry being corrected
    pub original_trace: u64,
    /// Routing prefix of the DFI that originated the entry
    pub original_dfi: String,
    /// The corrected value, 29 characters
    pub corrected_data: String,
    /// Trace number of this notification entry
    pub trace_number: u64,
}

impl Record for Addenda98 {
    const NAME: &'static str = "Addenda98";

    fn parse(line: &str) -> Result<Self, AchError> {
        check_line(line, '7')?;
        expect_type_code(line, "98")?;
        Ok(Addenda98 {
            change_code: field::parse_alpha(&line[3..6]),
            original_trace: field::parse_num(&line[6..21])?,
            original_dfi: line[27..35].to_string(),
            corrected_data: field::parse_alpha(&line[35..64]),
            trace_number: field::parse_num(&line[79..94])?,
        })
    }

    fn validate(&self) -> Result<(), AchError> {
        is_change_code(&self.change_code)?;
        if self.original_trace == 0 {
            return Err(AchError::field(
                "OriginalTrace",
                "0",
                "mandatory field has a default value",
            ));
        }
        field::is_numeric(&self.original_dfi).map_err(|_| {
            AchError::field("OriginalDFI", &self.original_dfi, "must be eight digits")
        })?;
        if self.corrected_data.is_empty() {
            return Err(AchError::field(
                "CorrectedData",
                &self.corrected_data,
                "mandatory field has a default value",
            ));
        }
        field::is_alphanumeric(&self.corrected_data)?;
        Ok(())
    }
}

impl fmt::Display for Addenda98 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "798{change}{original}{reserved6}{dfi}{corrected}{reserved15}{trace}",
            change = field::alpha(&self.change_code, 3),
            original = field::numeric(self.original_trace, 15),
            reserved6 = "      ",
            dfi = field::zero_padded(&self.original_dfi, 8),
            corrected = field::alpha(&self.corrected_data, 29),
            reserved15 = " ".repeat(15),
            trace = field::numeric(self.trace_number, 15),
        )
    }
}

/// Return addenda (type code 99)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addenda99 {
    /// Return reason code R01-R99
    pub return_code: String,
    /// Trace number of the original entry being returned
    pub original_trace: u64,
    /// YYMMDD date of death, only for R14/R15 returns
    pub date_of_death: String,
    /// Routing prefix of the DFI that originated the entry
    pub original_dfi: String,
    /// Free-form return information, 44 characters
    pub addenda_information: String,
    /// Trace number of this return entry
    pub trace_number: u64,
}

impl Record for Addenda99 {
    const NAME: &'static str = "Addenda99";

    fn parse(line: &str) -> Result<Self, AchError> {
        check_line(line, '7')?;
        expect_type_code(line, "99")?;
        Ok(Addenda99 {
            return_code: field::parse_alpha(&line[3..6]),
            original_trace: field::parse_num(&line[6..21])?,
            date_of_death: field::parse_alpha(&line[21..27]),
            original_dfi: line[27..35].to_string(),
            addenda_information: field::parse_alpha(&line[35..79]),
            trace_number: field::parse_num(&line[79..94])?,
        })
    }

    fn validate(&self) -> Result<(), AchError> {
        is_return_code(&self.return_code)?;
        if self.original_trace == 0 {
            return Err(AchError::field(
                "OriginalTrace",
                "0",
                "mandatory field has a default value",
            ));
        }
        if !self.date_of_death.is_empty() {
            field::is_date(&self.date_of_death).map_err(|_| {
                AchError::field("DateOfDeath", &self.date_of_death, "must be YYMMDD")
            })?;
        }
        field::is_numeric(&self.original_dfi).map_err(|_| {
            AchError::field("OriginalDFI", &self.original_dfi, "must be eight digits")
        })?;
        field::is_alphanumeric(&self.addenda_information)?;
        Ok(())
    }
}

impl fmt::Display for Addenda99 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "799{code}{original}{death}{dfi}{info}{trace}",
            code = field::alpha(&self.return_code, 3),
            original = field::numeric(self.original_trace, 15),
            death = field::alpha(&self.date_of_death, 6),
            dfi = field::zero_padded(&self.original_dfi, 8),
            info = field::alpha(&self.addenda_information, 44),
            trace = field::numeric(self.trace_number, 15),
        )
    }
}

/// Verify the addenda type code in columns 2-3
pub(crate) fn expect_type_code(line: &str, expected: &str) -> Result<(), AchError> {
    field::is_type_code(&line[1..3])?;
    if &line[1..3] != expected {
        return Err(AchError::field(
            "TypeCode",
            &line[1..3],
            &format!("must be {expected}"),
        ));
    }
    Ok(())
}

fn is_change_code(code: &str) -> Result<(), AchError> {
    let ok = code.len() == 3
        && code.starts_with('C')
        && matches!(code[1..3].parse::<u32>(), Ok(n) if (1..=69).contains(&n));
    if ok {
        Ok(())
    } else {
        Err(AchError::field("ChangeCode", code, "must be C01 through C69"))
    }
}

fn is_return_code(code: &str) -> Result<(), AchError> {
    let ok = code.len() == 3
        && code.starts_with('R')
        && code[1..3].bytes().all(|b| b.is_ascii_digit());
    if ok {
        Ok(())
    } else {
        Err(AchError::field("ReturnCode", code, "must be R followed by two digits"))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rstest::rstest;

    pub(crate) fn mock_addenda02() -> Addenda02 {
        Addenda02 {
            reference_information_one: "REF1".to_string(),
            terminal_identification_code: "TERM02".to_string(),
            transaction_serial_number: "100049".to_string(),
            transaction_date: "0612".to_string(),
            terminal_location: "Target Store 0049".to_string(),
            terminal_city: "PHILADELPHIA".to_string(),
            terminal_state: "PA".to_string(),
            trace_number: 121042880000001,
            ..Addenda02::default()
        }
    }

    pub(crate) fn mock_addenda05() -> Addenda05 {
        Addenda05 {
            payment_related_information: "This is an Addenda Record".to_string(),
            sequence_number: 1,
            entry_detail_sequence_number: 1,
        }
    }

    pub(crate) fn mock_addenda98() -> Addenda98 {
        Addenda98 {
            change_code: "C01".to_string(),
            original_trace: 12104288000007,
            original_dfi: "09101298".to_string(),
            corrected_data: "1918171614".to_string(),
            trace_number: 91012980000088,
        }
    }

    pub(crate) fn mock_addenda99() -> Addenda99 {
        Addenda99 {
            return_code: "R07".to_string(),
            original_trace: 99912340000015,
            date_of_death: String::new(),
            original_dfi: "09101298".to_string(),
            addenda_information: "Authorization Revoked".to_string(),
            trace_number: 91012980000066,
        }
    }

    #[test]
    fn test_addenda05_round_trip() {
        let addenda = mock_addenda05();
        let line = addenda.to_string();
        assert_eq!(line.len(), 94);
        assert!(line.starts_with("705This is an Addenda Record"));
        assert_eq!(&line[83..87], "0001");
        assert_eq!(&line[87..94], "0000001");

        let reparsed = Addenda05::parse(&line).unwrap();
        assert!(reparsed.validate().is_ok());
        assert_eq!(reparsed, addenda);
    }

    #[rstest]
    #[case::addenda02(mock_addenda02().to_string(), "02")]
    #[case::addenda98(mock_addenda98().to_string(), "98")]
    #[case::addenda99(mock_addenda99().to_string(), "99")]
    fn test_type_codes_on_the_wire(#[case] line: String, #[case] type_code: &str) {
        assert_eq!(line.len(), 94);
        assert_eq!(&line[0..1], "7");
        assert_eq!(&line[1..3], type_code);
    }

    #[test]
    fn test_addenda02_round_trip() {
        let addenda = mock_addenda02();
        let reparsed = Addenda02::parse(&addenda.to_string()).unwrap();
        assert!(reparsed.validate().is_ok());
        assert_eq!(reparsed, addenda);
    }

    #[test]
    fn test_addenda98_round_trip() {
        let addenda = mock_addenda98();
        let reparsed = Addenda98::parse(&addenda.to_string()).unwrap();
        assert!(reparsed.validate().is_ok());
        assert_eq!(reparsed, addenda);
    }

    #[test]
    fn test_addenda99_round_trip() {
        let addenda = mock_addenda99();
        let reparsed = Addenda99::parse(&addenda.to_string()).unwrap();
        assert!(reparsed.validate().is_ok());
        assert_eq!(reparsed, addenda);
    }

    #[rstest]
    #[case("C01", true)]
    #[case("C69", true)]
    #[case("C70", false)]
    #[case("C00", false)]
    #[case("X01", false)]
    fn test_change_codes(#[case] code: &str, #[case] ok: bool) {
        let mut addenda = mock_addenda98();
        addenda.change_code = code.to_string();
        assert_eq!(addenda.validate().is_ok(), ok, "change code {code}");
    }

    #[rstest]
    #[case("R07", true)]
    #[case("R99", true)]
    #[case("Q07", false)]
    #[case("R7", false)]
    fn test_return_codes(#[case] code: &str, #[case] ok: bool) {
        let mut addenda = mock_addenda99();
        addenda.return_code = code.to_string();
        assert_eq!(addenda.validate().is_ok(), ok, "return code {code}");
    }

    #[test]
    fn test_wrong_type_code_rejected() {
        let line = mock_addenda05().to_string();
        let err = Addenda02::parse(&line).unwrap_err();
        assert_eq!(err.field_name(), Some("TypeCode"));
    }
}
