//! Transaction domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Transaction kind: either income or expense.
///
/// This is a closed set. The sign of a transaction's monetary effect is
/// implied by its kind, never by the stored amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money flowing into the account.
    Income,
    /// Money flowing out of the account.
    Expense,
}

impl TransactionKind {
    /// Applies this kind's sign convention to a positive amount.
    ///
    /// Income contributes `+amount` to a day's delta, expense `-amount`.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

/// A dated monetary event as the store hands it to the aggregator.
///
/// Invariant (enforced at write time by the store, assumed here):
/// `amount > 0` with at most two fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatedAmount {
    /// Accrual day of the event (no time component).
    pub date: NaiveDate,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Strictly positive magnitude.
    pub amount: Decimal,
}

impl DatedAmount {
    /// Creates a new dated amount.
    #[must_use]
    pub const fn new(date: NaiveDate, kind: TransactionKind, amount: Decimal) -> Self {
        Self { date, kind, amount }
    }

    /// Returns the signed delta this event contributes to its day.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.kind.signed(self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sign_convention() {
        assert_eq!(TransactionKind::Income.signed(dec!(50.00)), dec!(50.00));
        assert_eq!(TransactionKind::Expense.signed(dec!(50.00)), dec!(-50.00));
    }

    #[test]
    fn test_signed_amount() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let income = DatedAmount::new(date, TransactionKind::Income, dec!(200.00));
        let expense = DatedAmount::new(date, TransactionKind::Expense, dec!(75.50));

        assert_eq!(income.signed_amount(), dec!(200.00));
        assert_eq!(expense.signed_amount(), dec!(-75.50));
    }

    #[test]
    fn test_kind_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&TransactionKind::Income).unwrap(),
            "\"income\""
        );
        let parsed: TransactionKind = serde_json::from_str("\"expense\"").unwrap();
        assert_eq!(parsed, TransactionKind::Expense);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(TransactionKind::Income.to_string(), "income");
        assert_eq!(TransactionKind::Expense.to_string(), "expense");
    }
}
