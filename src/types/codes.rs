//! Shared code tables
//!
//! Standard Entry Class codes, entry categories, and the helpers that
//! interpret NACHA transaction and service class codes.

use crate::types::error::AchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Service class code for a batch of mixed debits and credits
pub const SERVICE_CLASS_MIXED: u32 = 200;
/// Service class code for a credits-only batch
pub const SERVICE_CLASS_CREDITS: u32 = 220;
/// Service class code for a debits-only batch
pub const SERVICE_CLASS_DEBITS: u32 = 225;
/// Service class code for automated accounting advices
pub const SERVICE_CLASS_ADVICES: u32 = 280;

/// Standard Entry Class code
///
/// Selects the business meaning and rule set applied to a batch. IAT is
/// intentionally absent: international batches are modeled by
/// [`IatBatch`](crate::core::IatBatch), never by [`Batch`](crate::core::Batch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SecCode {
    /// Accounts Receivable Entry, a mailed-in check converted to a debit
    Arc,
    /// Back Office Conversion of a check received at the point of purchase
    Boc,
    /// Corporate Credit or Debit
    Ccd,
    /// Customer Initiated Entry
    Cie,
    /// Notification of Change batches
    Cor,
    /// Corporate Trade Exchange
    Ctx,
    /// Death Notification Entry
    Dne,
    /// Machine Transfer Entry (ATM)
    Mte,
    /// Point of Purchase check conversion
    Pop,
    /// Point of Sale
    Pos,
    /// Prearranged Payment and Deposit
    Ppd,
    /// Re-presented Check Entry
    Rck,
    /// Shared Network Entry
    Shr,
    /// Telephone-Initiated Entry
    Tel,
    /// Internet-Initiated Entry
    Web,
}

impl SecCode {
    /// The three-letter wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SecCode::Arc => "ARC",
            SecCode::Boc => "BOC",
            SecCode::Ccd => "CCD",
            SecCode::Cie => "CIE",
            SecCode::Cor => "COR",
            SecCode::Ctx => "CTX",
            SecCode::Dne => "DNE",
            SecCode::Mte => "MTE",
            SecCode::Pop => "POP",
            SecCode::Pos => "POS",
            SecCode::Ppd => "PPD",
            SecCode::Rck => "RCK",
            SecCode::Shr => "SHR",
            SecCode::Tel => "TEL",
            SecCode::Web => "WEB",
        }
    }
}

impl fmt::Display for SecCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecCode {
    type Err = AchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ARC" => Ok(SecCode::Arc),
            "BOC" => Ok(SecCode::Boc),
            "CCD" => Ok(SecCode::Ccd),
            "CIE" => Ok(SecCode::Cie),
            "COR" => Ok(SecCode::Cor),
            "CTX" => Ok(SecCode::Ctx),
            "DNE" => Ok(SecCode::Dne),
            "MTE" => Ok(SecCode::Mte),
            "POP" => Ok(SecCode::Pop),
            "POS" => Ok(SecCode::Pos),
            "PPD" => Ok(SecCode::Ppd),
            "RCK" => Ok(SecCode::Rck),
            "SHR" => Ok(SecCode::Shr),
            "TEL" => Ok(SecCode::Tel),
            "WEB" => Ok(SecCode::Web),
            _ => Err(AchError::file(
                "StandardEntryClassCode",
                s,
                "Standard Entry Class Code is not implemented",
            )),
        }
    }
}

/// Processing category of an entry or batch
///
/// Derived from the addenda attached to an entry: a Return addenda (99)
/// wins over a Notification of Change addenda (98); an entry with neither
/// is a Forward item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Ordinary forward presentment
    Forward,
    /// Notification of Change (Addenda98 attached)
    Noc,
    /// Returned entry (Addenda99 attached)
    Return,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Forward => f.write_str("Forward"),
            Category::Noc => f.write_str("NOC"),
            Category::Return => f.write_str("Return"),
        }
    }
}

/// Whether a transaction code moves money out of or into the receiver's account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Funds credited to the receiver
    Credit,
    /// Funds debited from the receiver
    Debit,
}

/// The polarity encoded in a two-digit transaction code
///
/// The second digit carries the direction: 0–4 are credit-side codes,
/// 5–9 are debit-side codes.
pub fn transaction_polarity(code: u32) -> Polarity {
    if code % 10 < 5 {
        Polarity::Credit
    } else {
        Polarity::Debit
    }
}

/// Whether a transaction code is one of the prenotification codes
///
/// Prenotes are zero-dollar test entries; several SEC types forbid
/// addenda on them.
pub fn is_prenote(code: u32) -> bool {
    matches!(code, 23 | 28 | 33 | 38 | 43 | 48 | 53)
}

/// Whether a service class code admits the given entry polarity
pub fn service_class_admits(service_class_code: u32, polarity: Polarity) -> bool {
    match service_class_code {
        SERVICE_CLASS_CREDITS => polarity == Polarity::Credit,
        SERVICE_CLASS_DEBITS => polarity == Polarity::Debit,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("PPD", SecCode::Ppd)]
    #[case("ARC", SecCode::Arc)]
    #[case("CTX", SecCode::Ctx)]
    #[case("WEB", SecCode::Web)]
    fn test_sec_code_round_trip(#[case] text: &str, #[case] code: SecCode) {
        assert_eq!(text.parse::<SecCode>().unwrap(), code);
        assert_eq!(code.to_string(), text);
    }

    #[test]
    fn test_unknown_sec_code() {
        let err = "NIL".parse::<SecCode>().unwrap_err();
        assert_eq!(err.field_name(), Some("StandardEntryClassCode"));
    }

    #[test]
    fn test_iat_is_not_a_batch_sec_code() {
        assert!("IAT".parse::<SecCode>().is_err());
    }

    #[rstest]
    #[case(22, Polarity::Credit)]
    #[case(23, Polarity::Credit)]
    #[case(27, Polarity::Debit)]
    #[case(32, Polarity::Credit)]
    #[case(37, Polarity::Debit)]
    #[case(55, Polarity::Debit)]
    fn test_transaction_polarity(#[case] code: u32, #[case] expected: Polarity) {
        assert_eq!(transaction_polarity(code), expected);
    }

    #[rstest]
    #[case(SERVICE_CLASS_CREDITS, Polarity::Debit, false)]
    #[case(SERVICE_CLASS_CREDITS, Polarity::Credit, true)]
    #[case(SERVICE_CLASS_DEBITS, Polarity::Credit, false)]
    #[case(SERVICE_CLASS_MIXED, Polarity::Debit, true)]
    fn test_service_class_admits(
        #[case] scc: u32,
        #[case] polarity: Polarity,
        #[case] expected: bool,
    ) {
        assert_eq!(service_class_admits(scc, polarity), expected);
    }
}
