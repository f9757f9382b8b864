//! SEC-specific batch rules
//!
//! Each Standard Entry Class layers its own policy on top of the
//! structural checks in [`Batch::verify`]. Most codes compose a handful of
//! shared policies: a debit-only service class, a per-entry amount cap, a
//! required check serial number, and a forward-addenda cardinality. The
//! few genuinely bespoke rules (CTX addenda counts, SHR card expiration,
//! WEB payment type) live in the per-code validators at the bottom.

use crate::core::batch::Batch;
use crate::records::{field, EntryDetail};
use crate::types::codes::{
    is_prenote, Category, Polarity, SecCode, SERVICE_CLASS_ADVICES, SERVICE_CLASS_CREDITS,
    SERVICE_CLASS_DEBITS,
};
use crate::types::error::AchError;

/// How many addenda a forward entry may carry, and of what type
#[derive(Debug, Clone, Copy)]
enum ForwardAddenda {
    /// No addenda of any type (check conversion codes)
    None,
    /// Up to `max` Addenda05 records, no Addenda02
    Addenda05 { max: u64 },
    /// Exactly one Addenda02, no Addenda05 (card-present codes)
    OneAddenda02,
}

/// Dispatch to the rule set for the batch's SEC code
pub(crate) fn validate(batch: &Batch) -> Result<(), AchError> {
    match batch.sec_code()? {
        SecCode::Arc => validate_check_conversion(batch, "ARC", 2_500_000),
        SecCode::Boc => validate_check_conversion(batch, "BOC", 2_500_000),
        SecCode::Ccd => forward_addenda(batch, ForwardAddenda::Addenda05 { max: 1 }),
        SecCode::Cie => validate_cie(batch),
        SecCode::Cor => validate_cor(batch),
        SecCode::Ctx => validate_ctx(batch),
        SecCode::Dne => validate_dne(batch),
        SecCode::Mte => validate_mte(batch),
        SecCode::Pop => validate_check_conversion(batch, "POP", 2_500_000),
        SecCode::Pos => validate_card_present(batch),
        SecCode::Ppd => forward_addenda(batch, ForwardAddenda::Addenda05 { max: 1 }),
        SecCode::Rck => validate_rck(batch),
        SecCode::Shr => validate_shr(batch),
        SecCode::Tel => validate_tel(batch),
        SecCode::Web => validate_web(batch),
    }
}

/// Shared policy: the service class must admit debits and every entry must
/// be a debit
fn debit_only(batch: &Batch, sec: &str) -> Result<(), AchError> {
    if matches!(
        batch.header.service_class_code,
        SERVICE_CLASS_CREDITS | SERVICE_CLASS_ADVICES
    ) {
        return Err(batch.error(
            "ServiceClassCode",
            &format!(
                "service class code {} is not valid for {sec}",
                batch.header.service_class_code
            ),
        ));
    }
    for entry in &batch.entries {
        if entry.polarity() != Polarity::Debit {
            return Err(batch.error(
                "TransactionCode",
                &format!("{} is a credit transaction code and {sec} entries must be debits", entry.transaction_code),
            ));
        }
    }
    Ok(())
}

/// Shared policy: no entry amount above `cap` cents
fn amount_cap(batch: &Batch, sec: &str, cap: u64) -> Result<(), AchError> {
    for entry in &batch.entries {
        if entry.amount > cap {
            return Err(batch.error(
                "Amount",
                &format!("{} entry amount exceeded for {sec}", cap / 100),
            ));
        }
    }
    Ok(())
}

/// Shared policy: the identification number carries a check serial number
/// and must be present
fn require_check_serial(batch: &Batch, sec: &str) -> Result<(), AchError> {
    for entry in &batch.entries {
        if entry.identification_number.is_empty() {
            return Err(batch.error(
                "CheckSerialNumber",
                &format!("check serial number is required for {sec}"),
            ));
        }
    }
    Ok(())
}

/// Shared policy: forward-category addenda cardinality
///
/// NOC and Return entries are exempt; their Addenda98/99 were already
/// wired up by `verify`, but they may not carry forward addenda either.
fn forward_addenda(batch: &Batch, policy: ForwardAddenda) -> Result<(), AchError> {
    for entry in &batch.entries {
        if entry.category() != Category::Forward {
            if entry.addenda02.is_some() || !entry.addenda05.is_empty() {
                return Err(batch.error(
                    "AddendaCount",
                    "NOC and return entries may not carry forward addenda",
                ));
            }
            continue;
        }
        match policy {
            ForwardAddenda::None => {
                if entry.has_addenda() {
                    return Err(batch.error(
                        "AddendaCount",
                        &format!(
                            "found {} addenda records where 0 are allowed for {}",
                            entry.addenda_count(),
                            batch.header.standard_entry_class_code
                        ),
                    ));
                }
            }
            ForwardAddenda::Addenda05 { max } => {
                if entry.addenda02.is_some() {
                    return Err(batch.error(
                        "Addenda02",
                        &format!(
                            "addenda type code 02 is not allowed for {}",
                            batch.header.standard_entry_class_code
                        ),
                    ));
                }
                if entry.addenda05.len() as u64 > max {
                    return Err(batch.error(
                        "AddendaCount",
                        &format!(
                            "found {} addenda records where {max} are allowed for {}",
                            entry.addenda05.len(),
                            batch.header.standard_entry_class_code
                        ),
                    ));
                }
            }
            ForwardAddenda::OneAddenda02 => {
                if !entry.addenda05.is_empty() {
                    return Err(batch.error(
                        "Addenda05",
                        &format!(
                            "addenda type code 05 is not allowed for {}",
                            batch.header.standard_entry_class_code
                        ),
                    ));
                }
                if entry.addenda02.is_none() {
                    return Err(batch.error(
                        "AddendaCount",
                        &format!(
                            "found 0 addenda records where 1 is required for {}",
                            batch.header.standard_entry_class_code
                        ),
                    ));
                }
            }
        }
    }
    Ok(())
}

/// Card transaction type carried in the discretionary data slot
fn require_card_transaction_type(batch: &Batch) -> Result<(), AchError> {
    for entry in &batch.entries {
        field::is_card_transaction_type(&entry.discretionary_data).map_err(|_| {
            batch.error(
                "CardTransactionType",
                &format!("{} is not a valid card transaction type", entry.discretionary_data),
            )
        })?;
    }
    Ok(())
}

/// ARC, BOC, and POP: debit-only check conversions with a $25,000 cap and
/// a required check serial number
fn validate_check_conversion(batch: &Batch, sec: &str, cap: u64) -> Result<(), AchError> {
    debit_only(batch, sec)?;
    amount_cap(batch, sec, cap)?;
    require_check_serial(batch, sec)?;
    forward_addenda(batch, ForwardAddenda::None)
}

/// RCK is a check conversion with a lower cap and a fixed entry description
fn validate_rck(batch: &Batch) -> Result<(), AchError> {
    if batch.header.company_entry_description != "REDEPCHECK" {
        return Err(batch.error(
            "CompanyEntryDescription",
            "must be REDEPCHECK for RCK",
        ));
    }
    validate_check_conversion(batch, "RCK", 250_000)
}

fn validate_tel(batch: &Batch) -> Result<(), AchError> {
    debit_only(batch, "TEL")?;
    forward_addenda(batch, ForwardAddenda::None)
}

/// CIE entries are consumer-initiated credits
fn validate_cie(batch: &Batch) -> Result<(), AchError> {
    if batch.header.service_class_code != SERVICE_CLASS_CREDITS {
        return Err(batch.error(
            "ServiceClassCode",
            &format!(
                "service class code {} is not valid for CIE",
                batch.header.service_class_code
            ),
        ));
    }
    for entry in &batch.entries {
        if entry.polarity() != Polarity::Credit {
            return Err(batch.error(
                "TransactionCode",
                &format!("{} is a debit transaction code and CIE entries must be credits", entry.transaction_code),
            ));
        }
    }
    forward_addenda(batch, ForwardAddenda::Addenda05 { max: 1 })
}

/// COR batches carry notifications of change: every entry must have its
/// Addenda98 and a zero amount
fn validate_cor(batch: &Batch) -> Result<(), AchError> {
    if batch.header.company_entry_description != "AUTOENROLL" {
        return Err(batch.error(
            "CompanyEntryDescription",
            "must be AUTOENROLL for COR",
        ));
    }
    for entry in &batch.entries {
        if entry.addenda98.is_none() {
            return Err(batch.error(
                "AddendaCount",
                "COR entries must carry exactly one Addenda98",
            ));
        }
        if entry.addenda02.is_some() || !entry.addenda05.is_empty() {
            return Err(batch.error(
                "AddendaCount",
                "COR entries may only carry an Addenda98",
            ));
        }
        if entry.amount != 0 {
            return Err(batch.error("Amount", "COR entry amounts must be zero"));
        }
    }
    Ok(())
}

/// CTX entries embed a four-digit addenda count in the individual name
fn validate_ctx(batch: &Batch) -> Result<(), AchError> {
    for entry in &batch.entries {
        if entry.addenda05.len() > 9999 {
            return Err(batch.error(
                "AddendaCount",
                &format!(
                    "found {} addenda records where 9999 are allowed for CTX",
                    entry.addenda05.len()
                ),
            ));
        }
        let declared = entry.catx_addenda_records()?;
        if declared != entry.addenda05.len() as u64 {
            return Err(batch.error(
                "Addenda05",
                &format!(
                    "{declared} entry detail addenda records not equal to addendum {}",
                    entry.addenda05.len()
                ),
            ));
        }
        if entry.has_addenda() && is_prenote(entry.transaction_code) {
            return Err(batch.error(
                "Addenda05",
                &format!(
                    "prenote transaction code {} may not carry addenda for CTX",
                    entry.transaction_code
                ),
            ));
        }
    }
    forward_addenda(batch, ForwardAddenda::Addenda05 { max: 9999 })
}

/// DNE batches are federal-government death notifications
fn validate_dne(batch: &Batch) -> Result<(), AchError> {
    if batch.header.originator_status_code != 2 {
        return Err(batch.error(
            "OriginatorStatusCode",
            "originator status code must be 2 for DNE",
        ));
    }
    for entry in &batch.entries {
        if !matches!(entry.transaction_code, 23 | 33) {
            return Err(batch.error(
                "TransactionCode",
                &format!("{} is not a prenotification code valid for DNE", entry.transaction_code),
            ));
        }
        if entry.amount != 0 {
            return Err(batch.error("Amount", "DNE entry amounts must be zero"));
        }
    }
    forward_addenda(batch, ForwardAddenda::Addenda05 { max: 1 })
}

/// MTE entries record ATM cash withdrawals
fn validate_mte(batch: &Batch) -> Result<(), AchError> {
    for entry in &batch.entries {
        if entry.amount == 0 {
            return Err(batch.error("Amount", "MTE entry amounts may not be zero"));
        }
        if entry.identification_number.trim_matches(['0', ' ']).is_empty() {
            return Err(batch.error(
                "IdentificationNumber",
                "MTE entries may not have an identification number of all spaces or zeros",
            ));
        }
    }
    forward_addenda(batch, ForwardAddenda::OneAddenda02)
}

fn validate_card_present(batch: &Batch) -> Result<(), AchError> {
    require_card_transaction_type(batch)?;
    forward_addenda(batch, ForwardAddenda::OneAddenda02)
}

/// SHR entries ride a shared network as debits against consumer accounts:
/// only the debits-only service class is accepted, and a card expiration
/// check rides on top of the POS rules
fn validate_shr(batch: &Batch) -> Result<(), AchError> {
    if batch.header.service_class_code != SERVICE_CLASS_DEBITS {
        return Err(batch.error(
            "ServiceClassCode",
            &format!(
                "service class code {} is not valid for SHR",
                batch.header.service_class_code
            ),
        ));
    }
    for entry in &batch.entries {
        if entry.polarity() != Polarity::Debit {
            return Err(batch.error(
                "TransactionCode",
                &format!(
                    "{} is a credit transaction code and SHR entries must be debits",
                    entry.transaction_code
                ),
            ));
        }
        validate_card_expiration(batch, entry)?;
    }
    validate_card_present(batch)
}

/// The SHR card expiration date rides in the first four characters of the
/// identification number as MMYY
fn validate_card_expiration(batch: &Batch, entry: &EntryDetail) -> Result<(), AchError> {
    let expiration = entry.card_expiration_date();
    if field::is_month(&expiration[0..2]).is_err() {
        return Err(batch.error(
            "CardExpirationDate",
            &format!("{expiration} month must be between 01 and 12"),
        ));
    }
    if field::is_year(&expiration[2..4]).is_err() {
        return Err(batch.error(
            "CardExpirationDate",
            &format!("{expiration} year must be between 00 and 99"),
        ));
    }
    Ok(())
}

/// WEB entries carry a payment type code of R (recurring) or S (single)
fn validate_web(batch: &Batch) -> Result<(), AchError> {
    for entry in &batch.entries {
        let payment_type = entry.discretionary_data.trim();
        if payment_type != "R" && payment_type != "S" {
            return Err(batch.error(
                "PaymentTypeCode",
                &format!("{payment_type} must be R for recurring or S for single entry"),
            ));
        }
    }
    forward_addenda(batch, ForwardAddenda::Addenda05 { max: 1 })
}
