//! Transaction management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use crate::middleware::AuthUser;
use saldo_core::ledger::TransactionKind;
use saldo_db::entities::transactions;
use saldo_db::repositories::transaction::{
    CreateTransactionInput, TransactionError, TransactionFilter, TransactionRepository,
    UpdateTransactionInput,
};
use saldo_shared::types::{PageRequest, PageResponse};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions))
        .route("/transactions", post(create_transaction))
        .route("/transactions/{id}", get(get_transaction))
        .route("/transactions/{id}", put(replace_transaction))
        .route("/transactions/{id}", patch(update_transaction))
        .route("/transactions/{id}", delete(delete_transaction))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Filter by date range start (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Filter by date range end (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for creating (POST) or replacing (PUT) a transaction.
/// Every field is required.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Accrual date (YYYY-MM-DD).
    pub date: NaiveDate,
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Free-text description.
    pub concept: String,
    /// Strictly positive amount.
    pub amount: Decimal,
}

/// Request body for partially updating (PATCH) a transaction. Omitted
/// fields are unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    /// New accrual date.
    pub date: Option<NaiveDate>,
    /// New kind.
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    /// New concept.
    pub concept: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
}

/// Response for a transaction.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Accrual date (YYYY-MM-DD).
    pub date: String,
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Free-text description.
    pub concept: String,
    /// Amount with two decimal places.
    pub amount: String,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<transactions::Model> for TransactionResponse {
    fn from(model: transactions::Model) -> Self {
        Self {
            id: model.id,
            date: model.date.format("%Y-%m-%d").to_string(),
            kind: model.kind.into(),
            concept: model.concept,
            amount: model.amount.to_string(),
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /transactions - List transactions with optional date filters.
async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());
    let filter = TransactionFilter {
        date_from: query.from,
        date_to: query.to,
    };
    let page = PageRequest {
        page: query.page.unwrap_or(1).max(1),
        per_page: query.per_page.unwrap_or(20).clamp(1, 100),
    };

    match repo.list(filter, &page).await {
        Ok((items, total)) => {
            let data: Vec<TransactionResponse> =
                items.into_iter().map(TransactionResponse::from).collect();
            let response = PageResponse::new(data, page.page, page.per_page, total);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list transactions");
            store_error_response(&e)
        }
    }
}

/// POST /transactions - Create a transaction.
async fn create_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());
    let input = CreateTransactionInput {
        date: payload.date,
        kind: payload.kind,
        concept: payload.concept,
        amount: payload.amount,
    };

    match repo.create(input).await {
        Ok(model) => {
            info!(
                transaction_id = %model.id,
                date = %model.date,
                user_id = %user.user_id(),
                "Transaction created"
            );
            (StatusCode::CREATED, Json(TransactionResponse::from(model))).into_response()
        }
        Err(e) => store_error_response(&e),
    }
}

/// GET /transactions/{id} - Fetch a single transaction.
async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());

    match repo.find_by_id(id).await {
        Ok(model) => (StatusCode::OK, Json(TransactionResponse::from(model))).into_response(),
        Err(e) => store_error_response(&e),
    }
}

/// PUT /transactions/{id} - Replace a transaction. All fields are required;
/// the stored record takes exactly the submitted values.
async fn replace_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());
    let input = UpdateTransactionInput {
        date: Some(payload.date),
        kind: Some(payload.kind),
        concept: Some(payload.concept),
        amount: Some(payload.amount),
    };

    match repo.update(id, input).await {
        Ok(model) => {
            info!(
                transaction_id = %model.id,
                user_id = %user.user_id(),
                "Transaction replaced"
            );
            (StatusCode::OK, Json(TransactionResponse::from(model))).into_response()
        }
        Err(e) => store_error_response(&e),
    }
}

/// PATCH /transactions/{id} - Update the submitted fields of a transaction,
/// leaving the rest unchanged.
async fn update_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());
    let input = UpdateTransactionInput {
        date: payload.date,
        kind: payload.kind,
        concept: payload.concept,
        amount: payload.amount,
    };

    match repo.update(id, input).await {
        Ok(model) => {
            info!(
                transaction_id = %model.id,
                user_id = %user.user_id(),
                "Transaction updated"
            );
            (StatusCode::OK, Json(TransactionResponse::from(model))).into_response()
        }
        Err(e) => store_error_response(&e),
    }
}

/// DELETE /transactions/{id} - Delete a transaction.
async fn delete_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(transaction_id = %id, user_id = %user.user_id(), "Transaction deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => store_error_response(&e),
    }
}

/// Maps a store error onto an HTTP response.
fn store_error_response(error: &TransactionError) -> axum::response::Response {
    match error {
        TransactionError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "detail": format!("No transaction with id {id}")
            })),
        )
            .into_response(),
        TransactionError::Invalid(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_transaction",
                "detail": e.to_string()
            })),
        )
            .into_response(),
        TransactionError::Database(e) => {
            error!(error = %e, "Database error in transaction store");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "detail": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}
