//! Ledger domain logic.
//!
//! This module implements the core ledger functionality:
//! - Transaction domain types (kind, dated amounts)
//! - Write-time validation rules for new transactions
//! - The daily balance aggregation engine
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod transaction;
pub mod validation;
pub mod window;

pub use balance::daily_balances;
pub use error::LedgerError;
pub use transaction::{DatedAmount, TransactionKind};
pub use validation::validate_new_transaction;
pub use window::{BalanceQuery, BalanceWindow};
