//! Error types for ledger operations.

use thiserror::Error;

/// Errors produced by ledger validation and aggregation.
///
/// All variants are client-input errors, detected synchronously before any
/// aggregation work begins. Nothing inside the balance walk itself can fail
/// once inputs are validated.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The requested date range is missing, unparsable, or inverted.
    #[error("invalid date range: {0}")]
    InvalidRange(String),

    /// The supplied starting balance is not a valid decimal number.
    #[error("invalid starting balance: {0}")]
    InvalidStartingBalance(String),

    /// A transaction violates the store's write-time invariants.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
}
