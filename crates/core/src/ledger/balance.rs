//! Daily balance aggregation.
//!
//! Converts discrete dated monetary events into a complete, gap-filled,
//! day-by-day running balance over a query window. The walk emits every
//! calendar day in the window, even zero-delta ones, because callers plot
//! continuous balance lines; sparse output would force every consumer to
//! re-implement gap-filling.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::transaction::DatedAmount;
use super::window::BalanceWindow;

/// Fractional digits carried by every emitted balance.
const BALANCE_SCALE: u32 = 2;

/// Computes the running balance for every calendar day in the window.
///
/// Transactions are first reduced into a sparse per-date net-delta map
/// (income positive, expense negative, same-day events summed). The window
/// is then walked one day at a time, carrying the balance forward; a day
/// absent from the delta map contributes zero. Each emitted balance is the
/// running total rounded to two fractional digits, half to even; the
/// accumulator itself is never rounded.
///
/// The result has exactly `window.num_days()` entries, ordered ascending.
/// An empty transaction set yields a flat series at `starting_balance`.
#[must_use]
pub fn daily_balances(
    transactions: &[DatedAmount],
    window: &BalanceWindow,
    starting_balance: Decimal,
) -> BTreeMap<NaiveDate, Decimal> {
    let deltas = reduce_deltas(transactions);

    let mut running = starting_balance;
    let mut series = BTreeMap::new();
    for day in window.days() {
        running += deltas.get(&day).copied().unwrap_or(Decimal::ZERO);
        series.insert(day, round_balance(running));
    }
    series
}

/// Reduces a transaction set into a sparse date -> net signed delta map.
///
/// Dates with no transactions are simply absent; absence means zero.
fn reduce_deltas(transactions: &[DatedAmount]) -> BTreeMap<NaiveDate, Decimal> {
    let mut deltas = BTreeMap::new();
    for tx in transactions {
        *deltas.entry(tx.date).or_insert(Decimal::ZERO) += tx.signed_amount();
    }
    deltas
}

/// Rounds a balance to two fractional digits, padding to a fixed scale so
/// serialized values always read like money (`100.00`, not `100`).
fn round_balance(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp(BALANCE_SCALE);
    rounded.rescale(BALANCE_SCALE);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::transaction::TransactionKind;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window(start: NaiveDate, end: NaiveDate) -> BalanceWindow {
        BalanceWindow::new(start, end).unwrap()
    }

    fn income(date: NaiveDate, amount: Decimal) -> DatedAmount {
        DatedAmount::new(date, TransactionKind::Income, amount)
    }

    fn expense(date: NaiveDate, amount: Decimal) -> DatedAmount {
        DatedAmount::new(date, TransactionKind::Expense, amount)
    }

    // ------------------------------------------------------------------
    // Worked examples
    // ------------------------------------------------------------------

    #[test]
    fn test_no_transactions_flat_series() {
        let w = window(date(2024, 1, 1), date(2024, 1, 3));
        let series = daily_balances(&[], &w, dec!(100));

        assert_eq!(series.len(), 3);
        assert_eq!(series[&date(2024, 1, 1)], dec!(100.00));
        assert_eq!(series[&date(2024, 1, 2)], dec!(100.00));
        assert_eq!(series[&date(2024, 1, 3)], dec!(100.00));
    }

    #[test]
    fn test_single_income_carries_forward() {
        let w = window(date(2024, 1, 1), date(2024, 1, 3));
        let txs = [income(date(2024, 1, 2), dec!(50.00))];
        let series = daily_balances(&txs, &w, Decimal::ZERO);

        assert_eq!(series[&date(2024, 1, 1)], dec!(0.00));
        assert_eq!(series[&date(2024, 1, 2)], dec!(50.00));
        assert_eq!(series[&date(2024, 1, 3)], dec!(50.00));
    }

    #[test]
    fn test_same_day_income_and_expense_net() {
        let day = date(2024, 1, 1);
        let w = window(day, day);
        let txs = [income(day, dec!(200.00)), expense(day, dec!(75.50))];
        let series = daily_balances(&txs, &w, Decimal::ZERO);

        assert_eq!(series.len(), 1);
        assert_eq!(series[&day], dec!(124.50));
    }

    #[test]
    fn test_transactions_outside_window_before_start_ignored() {
        // The store only returns in-range records; if a caller hands extra
        // dates anyway, the walk never visits them.
        let w = window(date(2024, 1, 2), date(2024, 1, 3));
        let txs = [
            income(date(2024, 1, 1), dec!(999.00)),
            income(date(2024, 1, 2), dec!(10.00)),
        ];
        let series = daily_balances(&txs, &w, Decimal::ZERO);

        assert_eq!(series.len(), 2);
        assert_eq!(series[&date(2024, 1, 2)], dec!(10.00));
        assert_eq!(series[&date(2024, 1, 3)], dec!(10.00));
    }

    #[test]
    fn test_balances_emitted_with_two_decimals() {
        let w = window(date(2024, 1, 1), date(2024, 1, 1));
        let series = daily_balances(&[], &w, dec!(100));

        // Rounded and rescaled: "100.00", not "100".
        assert_eq!(series[&date(2024, 1, 1)].to_string(), "100.00");
    }

    #[test]
    fn test_rounding_is_half_to_even_per_day() {
        let day1 = date(2024, 1, 1);
        let day2 = date(2024, 1, 2);
        let w = window(day1, day2);
        // Sub-cent starting balance exercises the per-day rounding: the
        // emitted value is rounded while the accumulator keeps full
        // precision.
        let txs = [income(day2, dec!(0.01))];
        let series = daily_balances(&txs, &w, dec!(0.005));

        assert_eq!(series[&day1], dec!(0.00)); // 0.005 rounds half to even
        assert_eq!(series[&day2], dec!(0.02)); // 0.015 rounds half to even, from unrounded accumulator
    }

    #[test]
    fn test_negative_running_balance() {
        let w = window(date(2024, 1, 1), date(2024, 1, 2));
        let txs = [expense(date(2024, 1, 1), dec!(30.00))];
        let series = daily_balances(&txs, &w, dec!(10.00));

        assert_eq!(series[&date(2024, 1, 1)], dec!(-20.00));
        assert_eq!(series[&date(2024, 1, 2)], dec!(-20.00));
    }

    #[test]
    fn test_window_spanning_month_boundary() {
        let w = window(date(2024, 1, 30), date(2024, 2, 2));
        let txs = [
            income(date(2024, 1, 31), dec!(5.00)),
            expense(date(2024, 2, 1), dec!(2.50)),
        ];
        let series = daily_balances(&txs, &w, Decimal::ZERO);

        assert_eq!(series.len(), 4);
        assert_eq!(series[&date(2024, 1, 30)], dec!(0.00));
        assert_eq!(series[&date(2024, 1, 31)], dec!(5.00));
        assert_eq!(series[&date(2024, 2, 1)], dec!(2.50));
        assert_eq!(series[&date(2024, 2, 2)], dec!(2.50));
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    prop_compose! {
        fn amount_strategy()(cents in 1i64..10_000_000) -> Decimal {
            Decimal::new(cents, 2)
        }
    }

    prop_compose! {
        fn kind_strategy()(is_income in any::<bool>()) -> TransactionKind {
            if is_income { TransactionKind::Income } else { TransactionKind::Expense }
        }
    }

    /// Window of up to ~2 months plus transactions falling inside it.
    fn window_with_transactions()
    -> impl Strategy<Value = (BalanceWindow, Vec<DatedAmount>, Decimal)> {
        (0u32..60, -1_000_000i64..1_000_000i64)
            .prop_flat_map(|(span, start_cents)| {
                let start = date(2024, 1, 1);
                let end = start + chrono::Days::new(u64::from(span));
                let w = window(start, end);
                let tx = (0u64..=u64::from(span), kind_strategy(), amount_strategy()).prop_map(
                    move |(offset, kind, amount)| {
                        DatedAmount::new(start + chrono::Days::new(offset), kind, amount)
                    },
                );
                (
                    Just(w),
                    prop::collection::vec(tx, 0..40),
                    Just(Decimal::new(start_cents, 2)),
                )
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Every calendar day in the window appears exactly once, ascending.
        #[test]
        fn prop_completeness((w, txs, start_balance) in window_with_transactions()) {
            let series = daily_balances(&txs, &w, start_balance);

            prop_assert_eq!(series.len() as i64, w.num_days());
            let days: Vec<_> = series.keys().copied().collect();
            let expected: Vec<_> = w.days().collect();
            prop_assert_eq!(days, expected);
        }

        /// balance[d] == balance[d-1] + net signed delta of day d.
        #[test]
        fn prop_additivity((w, txs, start_balance) in window_with_transactions()) {
            let series = daily_balances(&txs, &w, start_balance);

            let mut previous = start_balance;
            for day in w.days() {
                let delta: Decimal = txs
                    .iter()
                    .filter(|tx| tx.date == day)
                    .map(DatedAmount::signed_amount)
                    .sum();
                previous += delta;
                prop_assert_eq!(series[&day], previous.round_dp(2));
            }
        }

        /// A day with no transactions carries the previous balance forward.
        #[test]
        fn prop_carry_forward((w, txs, start_balance) in window_with_transactions()) {
            let series = daily_balances(&txs, &w, start_balance);

            let mut previous = series[&w.start()];
            for day in w.days().skip(1) {
                if !txs.iter().any(|tx| tx.date == day) {
                    prop_assert_eq!(series[&day], previous);
                }
                previous = series[&day];
            }
        }

        /// Identical inputs produce identical output.
        #[test]
        fn prop_idempotent((w, txs, start_balance) in window_with_transactions()) {
            let first = daily_balances(&txs, &w, start_balance);
            let second = daily_balances(&txs, &w, start_balance);
            prop_assert_eq!(first, second);
        }

        /// With only income the series is non-decreasing; with only expenses
        /// it is non-increasing.
        #[test]
        fn prop_monotone_under_single_kind(
            (w, txs, start_balance) in window_with_transactions()
        ) {
            let incomes: Vec<_> = txs
                .iter()
                .map(|tx| DatedAmount::new(tx.date, TransactionKind::Income, tx.amount))
                .collect();
            let series = daily_balances(&incomes, &w, start_balance);

            let balances: Vec<_> = series.values().copied().collect();
            for pair in balances.windows(2) {
                prop_assert!(pair[0] <= pair[1]);
            }
        }
    }
}
