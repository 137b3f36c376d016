//! Database-side enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction kind as stored in the `transaction_kind` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_kind")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money flowing into the account.
    #[sea_orm(string_value = "income")]
    Income,
    /// Money flowing out of the account.
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<saldo_core::ledger::TransactionKind> for TransactionKind {
    fn from(kind: saldo_core::ledger::TransactionKind) -> Self {
        match kind {
            saldo_core::ledger::TransactionKind::Income => Self::Income,
            saldo_core::ledger::TransactionKind::Expense => Self::Expense,
        }
    }
}

impl From<TransactionKind> for saldo_core::ledger::TransactionKind {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Income => Self::Income,
            TransactionKind::Expense => Self::Expense,
        }
    }
}
