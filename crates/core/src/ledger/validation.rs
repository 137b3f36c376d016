//! Write-time validation rules for new transactions.
//!
//! The store enforces these invariants before anything is persisted; the
//! aggregator assumes they hold for every record it receives and never
//! re-validates.

use rust_decimal::Decimal;

use super::error::LedgerError;

/// Maximum length of a transaction concept.
pub const MAX_CONCEPT_LEN: usize = 255;

/// Maximum number of fractional digits in a monetary amount.
pub const MAX_AMOUNT_SCALE: u32 = 2;

/// Upper bound on amounts: numeric(12, 2) leaves ten integral digits.
const MAX_AMOUNT: Decimal = Decimal::from_parts(0x540B_E400, 2, 0, false, 0); // 10^10

/// Validates the fields of a transaction before it is written.
///
/// Rules:
/// - `amount` is strictly positive, below `10^10`, with at most two
///   fractional digits
/// - `concept` is non-blank and at most 255 characters
///
/// The kind is a closed enum, so no rule is needed for it.
///
/// # Errors
///
/// Returns `LedgerError::InvalidTransaction` describing the first violated
/// rule.
pub fn validate_new_transaction(concept: &str, amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidTransaction(
            "amount must be a positive number".to_string(),
        ));
    }
    if amount.normalize().scale() > MAX_AMOUNT_SCALE {
        return Err(LedgerError::InvalidTransaction(
            "amount must have at most 2 decimal places".to_string(),
        ));
    }
    if amount >= MAX_AMOUNT {
        return Err(LedgerError::InvalidTransaction(
            "amount exceeds the maximum supported value".to_string(),
        ));
    }
    if concept.trim().is_empty() {
        return Err(LedgerError::InvalidTransaction(
            "concept must not be empty".to_string(),
        ));
    }
    if concept.chars().count() > MAX_CONCEPT_LEN {
        return Err(LedgerError::InvalidTransaction(format!(
            "concept must be at most {MAX_CONCEPT_LEN} characters"
        )));
    }
    Ok(())
}
