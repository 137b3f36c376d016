//! Transaction repository: the transaction store behind the aggregator.
//!
//! Owns creation, validation, and retrieval of transaction records. Every
//! record it persists satisfies the write-time invariants (positive amount
//! with two decimal places, bounded concept), so readers such as the daily
//! balance aggregator never re-validate.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use saldo_core::ledger::{self, DatedAmount, LedgerError, validate_new_transaction};
use saldo_shared::types::PageRequest;

use crate::entities::{sea_orm_active_enums::TransactionKind, transactions};

/// Error types for transaction store operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found.
    #[error("transaction not found: {0}")]
    NotFound(Uuid),

    /// A write-time invariant was violated.
    #[error(transparent)]
    Invalid(#[from] LedgerError),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Accrual day of the event.
    pub date: NaiveDate,
    /// Income or expense.
    pub kind: ledger::TransactionKind,
    /// Free-text description.
    pub concept: String,
    /// Strictly positive magnitude.
    pub amount: Decimal,
}

/// Input for updating a transaction. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    /// New accrual day.
    pub date: Option<NaiveDate>,
    /// New kind.
    pub kind: Option<ledger::TransactionKind>,
    /// New concept.
    pub concept: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFilter {
    /// Earliest date to include (inclusive).
    pub date_from: Option<NaiveDate>,
    /// Latest date to include (inclusive).
    pub date_to: Option<NaiveDate>,
}

/// Transaction repository for CRUD and range queries.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new transaction after validating the write-time rules.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::Invalid` if the input violates a store
    /// invariant, or `TransactionError::Database` if the insert fails.
    pub async fn create(
        &self,
        input: CreateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        validate_new_transaction(&input.concept, input.amount)?;

        let now = Utc::now().into();
        let transaction = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            date: Set(input.date),
            kind: Set(input.kind.into()),
            concept: Set(input.concept),
            amount: Set(input.amount),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(transaction.insert(&self.db).await?)
    }

    /// Finds a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if no such record exists.
    pub async fn find_by_id(&self, id: Uuid) -> Result<transactions::Model, TransactionError> {
        transactions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(id))
    }

    /// Lists transactions ordered by date then ID, with optional date-range
    /// filtering and pagination. Returns the page plus the total count.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn list(
        &self,
        filter: TransactionFilter,
        page: &PageRequest,
    ) -> Result<(Vec<transactions::Model>, u64), TransactionError> {
        let mut query = transactions::Entity::find();
        if let Some(from) = filter.date_from {
            query = query.filter(transactions::Column::Date.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(transactions::Column::Date.lte(to));
        }

        let total = query.clone().count(&self.db).await?;
        let items = query
            .order_by_asc(transactions::Column::Date)
            .order_by_asc(transactions::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((items, total))
    }

    /// Updates a transaction, re-validating the resulting record.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if no such record exists,
    /// `TransactionError::Invalid` if the merged record violates a store
    /// invariant.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let existing = self.find_by_id(id).await?;

        let concept = input.concept.unwrap_or_else(|| existing.concept.clone());
        let amount = input.amount.unwrap_or(existing.amount);
        validate_new_transaction(&concept, amount)?;

        let mut active: transactions::ActiveModel = existing.into();
        if let Some(date) = input.date {
            active.date = Set(date);
        }
        if let Some(kind) = input.kind {
            active.kind = Set(kind.into());
        }
        active.concept = Set(concept);
        active.amount = Set(amount);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if no such record exists.
    pub async fn delete(&self, id: Uuid) -> Result<(), TransactionError> {
        let result = transactions::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(TransactionError::NotFound(id));
        }
        Ok(())
    }

    /// Returns all `(date, kind, amount)` projections whose date falls in
    /// `[start, end]` — the query capability consumed by the daily balance
    /// aggregator.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn deltas_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DatedAmount>, TransactionError> {
        let rows: Vec<(NaiveDate, TransactionKind, Decimal)> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::Date)
            .column(transactions::Column::Kind)
            .column(transactions::Column::Amount)
            .filter(transactions::Column::Date.gte(start))
            .filter(transactions::Column::Date.lte(end))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(date, kind, amount)| DatedAmount::new(date, kind.into(), amount))
            .collect())
    }
}
