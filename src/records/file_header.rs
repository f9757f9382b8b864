//! File header record
//!
//! The first record of every ACH file. Identifies the exchange partners
//! (immediate destination and origin routing numbers), carries the file
//! creation timestamp, and fixes the structural constants: record size 094,
//! blocking factor 10, format code 1.

use crate::records::field;
use crate::records::{check_line, Record};
use crate::types::error::AchError;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// File header record (record type 1)
///
/// Exactly one per file, immutable once set. The priority code, record
/// size, blocking factor, and format code are structural constants and are
/// rendered automatically rather than stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileHeader {
    /// Routing number of the receiving point, nine digits
    ///
    /// Rendered as a ten-character field with a leading space.
    pub immediate_destination: String,
    /// Routing number (or assigned identifier) of the sending point, nine digits
    pub immediate_origin: String,
    /// Date the file was created
    pub file_creation_date: NaiveDate,
    /// Time the file was created (minutes resolution on the wire)
    pub file_creation_time: NaiveTime,
    /// Distinguishes multiple files created the same day, A-Z or 0-9
    pub file_id_modifier: String,
    /// Name of the receiving point
    pub immediate_destination_name: String,
    /// Name of the sending point
    pub immediate_origin_name: String,
    /// Free-form reference for the file creator
    pub reference_code: String,
}

impl Default for FileHeader {
    fn default() -> Self {
        FileHeader {
            immediate_destination: String::new(),
            immediate_origin: String::new(),
            file_creation_date: NaiveDate::default(),
            file_creation_time: NaiveTime::default(),
            file_id_modifier: "A".to_string(),
            immediate_destination_name: String::new(),
            immediate_origin_name: String::new(),
            reference_code: String::new(),
        }
    }
}

impl Record for FileHeader {
    const NAME: &'static str = "FileHeader";

    fn parse(line: &str) -> Result<Self, AchError> {
        check_line(line, '1')?;
        if &line[1..3] != "01" {
            return Err(AchError::field("priorityCode", &line[1..3], "must be 01"));
        }
        if &line[34..37] != "094" {
            return Err(AchError::field("recordSize", &line[34..37], "must be 094"));
        }
        if &line[37..39] != "10" {
            return Err(AchError::field("blockingFactor", &line[37..39], "must be 10"));
        }
        if &line[39..40] != "1" {
            return Err(AchError::field("formatCode", &line[39..40], "must be 1"));
        }
        Ok(FileHeader {
            immediate_destination: line[3..13].trim().to_string(),
            immediate_origin: line[13..23].trim().to_string(),
            file_creation_date: field::parse_date(&line[23..29])?,
            file_creation_time: NaiveTime::parse_from_str(&line[29..33], "%H%M")
                .map_err(|_| AchError::field("FileCreationTime", &line[29..33], "must be HHMM"))?,
            file_id_modifier: line[33..34].to_string(),
            immediate_destination_name: field::parse_alpha(&line[40..63]),
            immediate_origin_name: field::parse_alpha(&line[63..86]),
            reference_code: field::parse_alpha(&line[86..94]),
        })
    }

    fn validate(&self) -> Result<(), AchError> {
        if self.immediate_destination.is_empty() {
            return Err(AchError::field(
                "ImmediateDestination",
                &self.immediate_destination,
                "mandatory field has a default value",
            ));
        }
        if self.immediate_origin.is_empty() {
            return Err(AchError::field(
                "ImmediateOrigin",
                &self.immediate_origin,
                "mandatory field has a default value",
            ));
        }
        field::is_numeric(&self.immediate_destination).map_err(|_| {
            AchError::field(
                "ImmediateDestination",
                &self.immediate_destination,
                "must be a nine-digit routing number",
            )
        })?;
        field::is_numeric(&self.immediate_origin).map_err(|_| {
            AchError::field(
                "ImmediateOrigin",
                &self.immediate_origin,
                "must be a nine-digit routing number",
            )
        })?;
        if self.file_id_modifier.len() != 1 {
            return Err(AchError::field(
                "FileIDModifier",
                &self.file_id_modifier,
                "must be exactly one character",
            ));
        }
        field::is_upper_alphanumeric(&self.file_id_modifier).map_err(|_| {
            AchError::field(
                "FileIDModifier",
                &self.file_id_modifier,
                "must be A-Z or 0-9",
            )
        })?;
        field::is_alphanumeric(&self.immediate_destination_name)?;
        field::is_alphanumeric(&self.immediate_origin_name)?;
        field::is_alphanumeric(&self.reference_code)?;
        Ok(())
    }
}

impl fmt::Display for FileHeader {
    /// Render the canonical 94-character file header line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "101{dest}{origin}{date}{time}{modifier}094101{dest_name}{origin_name}{reference}",
            dest = self.immediate_destination_field(),
            origin = self.immediate_origin_field(),
            date = self.file_creation_date.format("%y%m%d"),
            time = self.file_creation_time.format("%H%M"),
            modifier = field::alpha(&self.file_id_modifier, 1),
            dest_name = field::alpha(&self.immediate_destination_name, 23),
            origin_name = field::alpha(&self.immediate_origin_name, 23),
            reference = field::alpha(&self.reference_code, 8),
        )
    }
}

impl FileHeader {
    /// The ten-character immediate destination field: space plus nine digits
    pub fn immediate_destination_field(&self) -> String {
        format!(" {}", field::zero_padded(&self.immediate_destination, 9))
    }

    /// The ten-character immediate origin field: space plus nine digits
    pub fn immediate_origin_field(&self) -> String {
        format!(" {}", field::zero_padded(&self.immediate_origin, 9))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn mock_file_header() -> FileHeader {
        FileHeader {
            immediate_destination: "231380104".to_string(),
            immediate_origin: "121042882".to_string(),
            file_creation_date: NaiveDate::from_ymd_opt(2018, 6, 21).unwrap(),
            file_creation_time: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            immediate_destination_name: "Federal Reserve Bank".to_string(),
            immediate_origin_name: "My Bank Name".to_string(),
            ..FileHeader::default()
        }
    }

    #[test]
    fn test_mock_file_header_validates() {
        assert!(mock_file_header().validate().is_ok());
    }

    #[test]
    fn test_file_header_round_trip() {
        let header = mock_file_header();
        let line = header.to_string();
        assert_eq!(line.len(), 94);
        assert!(line.starts_with("101 231380104 121042882180621"));

        let reparsed = FileHeader::parse(&line).unwrap();
        assert!(reparsed.validate().is_ok());
        assert_eq!(reparsed, header);
    }

    #[test]
    fn test_wire_constants() {
        let line = mock_file_header().to_string();
        assert_eq!(&line[34..37], "094");
        assert_eq!(&line[37..39], "10");
        assert_eq!(&line[39..40], "1");
    }

    #[test]
    fn test_parse_rejects_wrong_record_size() {
        let mut line = mock_file_header().to_string();
        line.replace_range(34..37, "093");
        let err = FileHeader::parse(&line).unwrap_err();
        assert_eq!(err.field_name(), Some("recordSize"));
    }

    #[test]
    fn test_validate_requires_destination() {
        let mut header = mock_file_header();
        header.immediate_destination = String::new();
        assert_eq!(
            header.validate().unwrap_err().field_name(),
            Some("ImmediateDestination")
        );
    }

    #[test]
    fn test_validate_rejects_lowercase_modifier() {
        let mut header = mock_file_header();
        header.file_id_modifier = "a".to_string();
        assert_eq!(
            header.validate().unwrap_err().field_name(),
            Some("FileIDModifier")
        );
    }

    #[test]
    fn test_json_surface_is_camel_case() {
        let json = serde_json::to_value(mock_file_header()).unwrap();
        assert_eq!(json["immediateDestination"], "231380104");
        assert_eq!(json["fileIDModifier"], serde_json::Value::Null); // field is fileIdModifier
        assert_eq!(json["fileIdModifier"], "A");
    }
}
