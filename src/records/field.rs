//! Fixed-width field codec
//!
//! NACHA records are 94-character ASCII lines built from two field shapes:
//! alphanumeric fields are left-justified and space-padded, numeric fields
//! are right-justified and zero-padded. This module owns that padding and
//! parsing along with the field-level validation predicates the record
//! types compose.

use crate::types::error::AchError;
use chrono::NaiveDate;

/// Character count of each line in an ACH file
pub const RECORD_LENGTH: usize = 94;

const MSG_NON_NUMERIC: &str = "must contain only digits";
const MSG_NON_ASCII: &str = "must contain only printable ASCII characters";

/// Left-justify and space-pad `value` to exactly `width` characters
///
/// Values longer than `width` are truncated.
pub fn alpha(value: &str, width: usize) -> String {
    let mut out: String = value.chars().take(width).collect();
    while out.len() < width {
        out.push(' ');
    }
    out
}

/// Right-justify and zero-pad `n` to exactly `width` digits
///
/// When the value has more digits than the field, the rightmost `width`
/// digits are kept. This matches the entry-hash rule, which truncates an
/// oversized sum to its rightmost ten digits.
pub fn numeric(n: u64, width: usize) -> String {
    let s = n.to_string();
    if s.len() > width {
        s[s.len() - width..].to_string()
    } else {
        format!("{:0>width$}", s, width = width)
    }
}

/// Parse a non-negative integer from a fixed-width slice
///
/// Leading spaces and zeros are stripped; an empty or all-space slice
/// yields 0. Any other non-digit character is an error.
pub fn parse_num(slice: &str) -> Result<u64, AchError> {
    let trimmed = slice.trim_start_matches([' ', '0']);
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u64>()
        .map_err(|_| AchError::field("number", slice, MSG_NON_NUMERIC))
}

/// Parse an alphanumeric field, stripping trailing whitespace only
pub fn parse_alpha(slice: &str) -> String {
    slice.trim_end().to_string()
}

/// Zero-pad a digit string on the left to exactly `width` characters
///
/// Used for routing-number shaped fields that are stored as strings to
/// preserve leading zeros. Overlong values keep their leftmost characters.
pub fn zero_padded(value: &str, width: usize) -> String {
    if value.len() > width {
        value[..width].to_string()
    } else {
        format!("{:0>width$}", value, width = width)
    }
}

/// Whether every character is printable ASCII (0x20–0x7E)
pub fn is_alphanumeric(value: &str) -> Result<(), AchError> {
    if value.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
        Ok(())
    } else {
        Err(AchError::field("alphanumeric", value, MSG_NON_ASCII))
    }
}

/// Whether every character is an uppercase letter or digit
pub fn is_upper_alphanumeric(value: &str) -> Result<(), AchError> {
    if value
        .bytes()
        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
    {
        Ok(())
    } else {
        Err(AchError::field(
            "upperAlphanumeric",
            value,
            "must contain only uppercase letters and digits",
        ))
    }
}

/// Whether every character is a decimal digit
pub fn is_numeric(value: &str) -> Result<(), AchError> {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AchError::field("numeric", value, MSG_NON_NUMERIC))
    }
}

/// Whether a two-digit month is in 01–12
pub fn is_month(value: &str) -> Result<(), AchError> {
    match value.parse::<u32>() {
        Ok(m) if (1..=12).contains(&m) && value.len() == 2 => Ok(()),
        _ => Err(AchError::field("month", value, "must be between 01 and 12")),
    }
}

/// Whether a two-digit year is in 00–99
pub fn is_year(value: &str) -> Result<(), AchError> {
    if value.len() == 2 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AchError::field("year", value, "must be between 00 and 99"))
    }
}

/// Whether a four-character time is a valid HHMM
pub fn is_hhmm(value: &str) -> Result<(), AchError> {
    if value.len() != 4 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AchError::field("time", value, "must be HHMM"));
    }
    let hh: u32 = value[0..2].parse().unwrap_or(99);
    let mm: u32 = value[2..4].parse().unwrap_or(99);
    if hh < 24 && mm < 60 {
        Ok(())
    } else {
        Err(AchError::field("time", value, "must be HHMM"))
    }
}

/// Whether a six-character date is shaped like YYMMDD
///
/// Only the month is range-checked; the day is not checked against the
/// calendar here.
pub fn is_date(value: &str) -> Result<(), AchError> {
    if value.len() != 6 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AchError::field("date", value, "must be YYMMDD"));
    }
    is_month(&value[2..4]).map_err(|_| AchError::field("date", value, "must be YYMMDD"))
}

/// Parse a YYMMDD date field
pub fn parse_date(slice: &str) -> Result<NaiveDate, AchError> {
    NaiveDate::parse_from_str(slice, "%y%m%d")
        .map_err(|_| AchError::field("date", slice, "must be YYMMDD"))
}

/// Compute the check digit for the first eight digits of a routing number
///
/// The digits are weighted 3, 7, 1, 3, 7, 1, 3, 7; the check digit is the
/// amount that rounds the weighted sum up to the next multiple of ten.
pub fn check_digit(routing: &str) -> Result<u32, AchError> {
    if routing.len() != 8 {
        return Err(AchError::field(
            "RDFIIdentification",
            routing,
            "must be exactly 8 digits",
        ));
    }
    is_numeric(routing)?;
    const WEIGHTS: [u32; 8] = [3, 7, 1, 3, 7, 1, 3, 7];
    let sum: u32 = routing
        .bytes()
        .zip(WEIGHTS)
        .map(|(b, w)| (b - b'0') as u32 * w)
        .sum();
    Ok((10 - sum % 10) % 10)
}

/// Whether `digit` is the correct check digit for an 8-digit routing prefix
pub fn is_check_digit(routing: &str, digit: &str) -> Result<(), AchError> {
    let expected = check_digit(routing)?;
    if digit == expected.to_string() {
        Ok(())
    } else {
        Err(AchError::field(
            "CheckDigit",
            digit,
            "does not match calculated check digit",
        ))
    }
}

/// Whether a card transaction type code is one of the defined values
pub fn is_card_transaction_type(value: &str) -> Result<(), AchError> {
    match value {
        "01" | "02" | "03" | "04" | "05" | "06" | "07" | "08" | "09" => Ok(()),
        _ => Err(AchError::field(
            "CardTransactionType",
            value,
            "invalid card transaction type",
        )),
    }
}

/// Whether an addenda type code is one of the defined values
pub fn is_type_code(value: &str) -> Result<(), AchError> {
    match value {
        "02" | "05" | "10" | "11" | "12" | "13" | "14" | "15" | "16" | "17" | "18" | "98"
        | "99" => Ok(()),
        _ => Err(AchError::field("TypeCode", value, "invalid addenda type code")),
    }
}

/// Whether a service class code is one of 200, 220, 225, 280
pub fn is_service_class_code(value: u32) -> Result<(), AchError> {
    match value {
        200 | 220 | 225 | 280 => Ok(()),
        _ => Err(AchError::field(
            "ServiceClassCode",
            &value.to_string(),
            "invalid service class code",
        )),
    }
}

/// Whether an originator status code is one of 0, 1, 2
pub fn is_originator_status_code(value: u32) -> Result<(), AchError> {
    match value {
        0 | 1 | 2 => Ok(()),
        _ => Err(AchError::field(
            "OriginatorStatusCode",
            &value.to_string(),
            "invalid originator status code",
        )),
    }
}

/// Whether a transaction code is one of the defined two-digit codes
pub fn is_transaction_code(value: u32) -> Result<(), AchError> {
    match value {
        // checking
        21 | 22 | 23 | 24 | 26 | 27 | 28 | 29 |
        // savings
        31 | 32 | 33 | 34 | 36 | 37 | 38 | 39 |
        // general ledger
        41 | 42 | 43 | 44 | 46 | 47 | 48 | 49 |
        // loan
        51 | 52 | 53 | 54 | 55 | 56 => Ok(()),
        _ => Err(AchError::field(
            "TransactionCode",
            &value.to_string(),
            "invalid transaction code",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("company name", 16, "company name    ")]
    #[case("a name too long for the slot", 10, "a name too")]
    #[case("", 4, "    ")]
    fn test_alpha(#[case] value: &str, #[case] width: usize, #[case] expected: &str) {
        assert_eq!(alpha(value, width), expected);
    }

    #[rstest]
    #[case(10500, 10, "0000010500")]
    #[case(0, 6, "000000")]
    #[case(12345678901, 10, "2345678901")] // rightmost digits kept on overflow
    fn test_numeric(#[case] n: u64, #[case] width: usize, #[case] expected: &str) {
        assert_eq!(numeric(n, width), expected);
    }

    #[rstest]
    #[case("0000010500", 10500)]
    #[case("      ", 0)]
    #[case("", 0)]
    #[case("  00042", 42)]
    fn test_parse_num(#[case] slice: &str, #[case] expected: u64) {
        assert_eq!(parse_num(slice).unwrap(), expected);
    }

    #[test]
    fn test_parse_num_rejects_non_digits() {
        assert!(parse_num("12a4").is_err());
    }

    #[test]
    fn test_parse_alpha_keeps_interior_whitespace() {
        assert_eq!(parse_alpha("Arnold Wade           "), "Arnold Wade");
    }

    #[rstest]
    #[case("05320001", 9)]
    #[case("12104288", 2)]
    #[case("23138010", 4)]
    fn test_check_digit(#[case] routing: &str, #[case] expected: u32) {
        assert_eq!(check_digit(routing).unwrap(), expected);
    }

    #[test]
    fn test_check_digit_requires_eight_digits() {
        assert!(check_digit("0532001").is_err());
        assert!(check_digit("0532000a").is_err());
    }

    #[rstest]
    #[case("00", false)]
    #[case("01", true)]
    #[case("12", true)]
    #[case("13", false)]
    fn test_is_month(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(is_month(value).is_ok(), ok);
    }

    #[rstest]
    #[case("2359", true)]
    #[case("0000", true)]
    #[case("2400", false)]
    #[case("1060", false)]
    fn test_is_hhmm(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(is_hhmm(value).is_ok(), ok);
    }

    #[test]
    fn test_is_alphanumeric_rejects_non_ascii() {
        assert!(is_alphanumeric("façade").is_err());
        assert!(is_alphanumeric("ACME Corp #1").is_ok());
    }

    #[rstest]
    #[case(200, true)]
    #[case(220, true)]
    #[case(225, true)]
    #[case(280, true)]
    #[case(222, false)]
    fn test_is_service_class_code(#[case] value: u32, #[case] ok: bool) {
        assert_eq!(is_service_class_code(value).is_ok(), ok);
    }

    #[rstest]
    #[case(22, true)]
    #[case(27, true)]
    #[case(55, true)]
    #[case(20, false)]
    #[case(99, false)]
    fn test_is_transaction_code(#[case] value: u32, #[case] ok: bool) {
        assert_eq!(is_transaction_code(value).is_ok(), ok);
    }
}
