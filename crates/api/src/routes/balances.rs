//! Daily balance routes.
//!
//! Exposes the daily balance aggregation engine over HTTP: a read-only
//! endpoint mapping each calendar day of the query window to the account's
//! rounded running balance.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::AppState;
use saldo_core::ledger::{BalanceQuery, LedgerError, daily_balances};
use saldo_db::repositories::transaction::TransactionRepository;

/// Creates the balance routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/balances/daily", get(get_daily_balances))
}

/// Query parameters for the daily balances endpoint.
///
/// All parameters arrive as raw strings; parsing and validation are the
/// aggregation engine's responsibility so the error taxonomy lives in one
/// place.
#[derive(Debug, Deserialize)]
pub struct DailyBalancesParams {
    /// Window start, `yyyy-MM-dd`.
    pub start: Option<String>,
    /// Window end, `yyyy-MM-dd`.
    pub end: Option<String>,
    /// Balance immediately before `start`. Defaults to `0`.
    #[serde(rename = "startingBalance")]
    pub starting_balance: Option<String>,
}

/// GET /balances/daily?start&end&startingBalance
///
/// Responds with a JSON object keyed by `yyyy-MM-dd` for every day in the
/// closed window, each value being the running balance rounded to two
/// decimal places. Balances are serialized as strings (`"100.00"`, not
/// `100.0`) so clients always see exactly two fractional digits.
async fn get_daily_balances(
    State(state): State<AppState>,
    Query(params): Query<DailyBalancesParams>,
) -> impl IntoResponse {
    let query = match BalanceQuery::parse(
        params.start.as_deref(),
        params.end.as_deref(),
        params.starting_balance.as_deref(),
    ) {
        Ok(q) => q,
        Err(e) => return ledger_error_response(&e),
    };

    let repo = TransactionRepository::new((*state.db).clone());
    let deltas = match repo
        .deltas_in_range(query.window.start(), query.window.end())
        .await
    {
        Ok(d) => d,
        Err(e) => {
            error!(error = %e, "Failed to query transaction deltas");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "detail": "Failed to read transactions"
                })),
            )
                .into_response();
        }
    };

    let series = daily_balances(&deltas, &query.window, query.starting_balance);
    (StatusCode::OK, Json(to_response_map(series))).into_response()
}

/// Formats the series for the wire: `yyyy-MM-dd` keys, two-decimal values.
fn to_response_map(series: BTreeMap<NaiveDate, Decimal>) -> BTreeMap<String, Decimal> {
    series
        .into_iter()
        .map(|(date, balance)| (date.format("%Y-%m-%d").to_string(), balance))
        .collect()
}

/// Maps a ledger error onto a 400 response with a `detail` message.
fn ledger_error_response(error: &LedgerError) -> axum::response::Response {
    let code = match error {
        LedgerError::InvalidRange(_) => "invalid_range",
        LedgerError::InvalidStartingBalance(_) => "invalid_starting_balance",
        LedgerError::InvalidTransaction(_) => "invalid_transaction",
    };
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": code, "detail": error.to_string() })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use saldo_core::ledger::BalanceWindow;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_response_map_keys_and_values() {
        let window = BalanceWindow::new(date(2024, 1, 1), date(2024, 1, 3)).unwrap();
        let series = daily_balances(&[], &window, dec!(100));
        let map = to_response_map(series);

        let body = serde_json::to_string(&map).unwrap();
        assert_eq!(
            body,
            r#"{"2024-01-01":"100.00","2024-01-02":"100.00","2024-01-03":"100.00"}"#
        );
    }

    #[rstest]
    #[case(
        LedgerError::InvalidRange("start is required as yyyy-MM-dd".to_string()),
        "invalid_range"
    )]
    #[case(
        LedgerError::InvalidStartingBalance("\"abc\" is not a number".to_string()),
        "invalid_starting_balance"
    )]
    #[tokio::test]
    async fn test_ledger_error_response_body(
        #[case] error: LedgerError,
        #[case] expected_code: &str,
    ) {
        let response = ledger_error_response(&error);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], expected_code);
        assert_eq!(body["detail"], error.to_string());
    }

    #[test]
    fn test_params_deserialize_starting_balance_alias() {
        let params: DailyBalancesParams = serde_json::from_str(
            r#"{"start":"2024-01-01","end":"2024-01-03","startingBalance":"50"}"#,
        )
        .unwrap();
        assert_eq!(params.starting_balance.as_deref(), Some("50"));
    }
}
