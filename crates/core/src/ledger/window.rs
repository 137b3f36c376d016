//! Query window parsing and validation.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::LedgerError;

/// Date format accepted for window boundaries.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A validated closed date interval `[start, end]`.
///
/// Construction through [`BalanceWindow::new`] is the only way to obtain one,
/// so holders can rely on `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl BalanceWindow {
    /// Creates a window, rejecting inverted ranges.
    ///
    /// A single-day window (`start == end`) is valid.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidRange` if `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, LedgerError> {
        if start > end {
            return Err(LedgerError::InvalidRange(format!(
                "start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// First day of the window.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the window (inclusive).
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days in the window, endpoints included.
    #[must_use]
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Iterates every calendar day from start to end inclusive, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

/// A fully parsed balance request: window plus starting balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceQuery {
    /// The validated query window.
    pub window: BalanceWindow,
    /// Balance immediately before the window start. Defaults to zero.
    pub starting_balance: Decimal,
}

impl BalanceQuery {
    /// Parses raw request inputs into a validated query.
    ///
    /// `start` and `end` are required `yyyy-MM-dd` dates; `starting_balance`
    /// is an optional decimal string defaulting to `0`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidRange` for missing, unparsable, or
    /// inverted dates, and `LedgerError::InvalidStartingBalance` when the
    /// starting balance is not a number.
    pub fn parse(
        start: Option<&str>,
        end: Option<&str>,
        starting_balance: Option<&str>,
    ) -> Result<Self, LedgerError> {
        let start = parse_window_date(start, "start")?;
        let end = parse_window_date(end, "end")?;
        let window = BalanceWindow::new(start, end)?;

        let starting_balance = match starting_balance {
            None => Decimal::ZERO,
            Some(raw) => raw.trim().parse::<Decimal>().map_err(|_| {
                LedgerError::InvalidStartingBalance(format!("{raw:?} is not a number"))
            })?,
        };

        Ok(Self {
            window,
            starting_balance,
        })
    }
}

fn parse_window_date(value: Option<&str>, field: &str) -> Result<NaiveDate, LedgerError> {
    let raw = value
        .ok_or_else(|| LedgerError::InvalidRange(format!("{field} is required as yyyy-MM-dd")))?;
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        LedgerError::InvalidRange(format!("{field} must be a yyyy-MM-dd date, got {raw:?}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_rejects_inverted_range() {
        let result = BalanceWindow::new(date(2024, 3, 5), date(2024, 3, 1));
        assert!(matches!(result, Err(LedgerError::InvalidRange(_))));
    }

    #[test]
    fn test_single_day_window() {
        let window = BalanceWindow::new(date(2024, 1, 1), date(2024, 1, 1)).unwrap();
        assert_eq!(window.num_days(), 1);
        assert_eq!(window.days().collect::<Vec<_>>(), vec![date(2024, 1, 1)]);
    }

    #[test]
    fn test_days_are_dense_and_ascending() {
        let window = BalanceWindow::new(date(2024, 2, 27), date(2024, 3, 2)).unwrap();
        // 2024 is a leap year, so Feb 29 must appear.
        let days: Vec<_> = window.days().collect();
        assert_eq!(
            days,
            vec![
                date(2024, 2, 27),
                date(2024, 2, 28),
                date(2024, 2, 29),
                date(2024, 3, 1),
                date(2024, 3, 2),
            ]
        );
        assert_eq!(window.num_days(), 5);
    }

    #[test]
    fn test_parse_full_query() {
        let query =
            BalanceQuery::parse(Some("2024-01-01"), Some("2024-01-03"), Some("100.50")).unwrap();
        assert_eq!(query.window.start(), date(2024, 1, 1));
        assert_eq!(query.window.end(), date(2024, 1, 3));
        assert_eq!(query.starting_balance, dec!(100.50));
    }

    #[test]
    fn test_parse_defaults_starting_balance_to_zero() {
        let query = BalanceQuery::parse(Some("2024-01-01"), Some("2024-01-01"), None).unwrap();
        assert_eq!(query.starting_balance, Decimal::ZERO);
    }

    #[rstest]
    #[case(None, Some("2024-01-03"))]
    #[case(Some("2024-01-01"), None)]
    #[case(Some("not-a-date"), Some("2024-01-03"))]
    #[case(Some("2024-01-01"), Some("01/03/2024"))]
    #[case(Some("2024-03-05"), Some("2024-03-01"))] // inverted
    fn test_parse_invalid_range(#[case] start: Option<&str>, #[case] end: Option<&str>) {
        let result = BalanceQuery::parse(start, end, None);
        assert!(matches!(result, Err(LedgerError::InvalidRange(_))));
    }

    #[rstest]
    #[case("abc")]
    #[case("12,50")]
    #[case("")]
    fn test_parse_invalid_starting_balance(#[case] raw: &str) {
        let result = BalanceQuery::parse(Some("2024-01-01"), Some("2024-01-03"), Some(raw));
        assert!(matches!(result, Err(LedgerError::InvalidStartingBalance(_))));
    }

    #[test]
    fn test_parse_negative_starting_balance_is_valid() {
        let query =
            BalanceQuery::parse(Some("2024-01-01"), Some("2024-01-03"), Some("-25.00")).unwrap();
        assert_eq!(query.starting_balance, dec!(-25.00));
    }
}
