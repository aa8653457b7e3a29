//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{Error, TransactionType, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// A stored transaction's category always belongs to its type's categories,
/// see [crate::Taxonomy].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened, in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The category the transaction belongs to, e.g. "食費".
    pub category: String,
    /// The amount of money spent or earned. Always greater than zero.
    pub amount: i64,
    /// An optional note about the transaction, empty if not set.
    pub memo: String,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// When the transaction was deleted. Deleted transactions are never
    /// returned by the queries in this module.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
}

/// A validated transaction that has not been stored yet.
///
/// Create one with [crate::transaction::validate_new_transaction].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// When the transaction happened.
    pub date: OffsetDateTime,
    /// Whether the transaction is income or an expense.
    pub transaction_type: TransactionType,
    /// The category, valid for `transaction_type`.
    pub category: String,
    /// The amount of money, greater than zero.
    pub amount: i64,
    /// A note about the transaction.
    pub memo: String,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const TRANSACTION_COLUMNS: &str =
    "id, date, type, category, amount, memo, created_at, updated_at, deleted_at";

/// Store a new transaction in the database.
///
/// The date is converted to UTC before it is stored.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let now = OffsetDateTime::now_utc();

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (date, type, category, amount, memo, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                transaction.date.to_offset(UtcOffset::UTC),
                transaction.transaction_type,
                transaction.category,
                transaction.amount,
                transaction.memo,
                now,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction, or it has been deleted,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE id = :id AND deleted_at IS NULL"
        ))?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve every transaction that has not been deleted, ordered by ID.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE deleted_at IS NULL
             ORDER BY id ASC"
        ))?
        .query_map([], map_transaction_row)?
        .collect::<Result<Vec<Transaction>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

/// Overwrite the stored fields of `transaction` and refresh its `updated_at`.
///
/// The caller is responsible for validating `transaction` first.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the transaction does not exist or has been deleted,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    transaction: &Transaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let updated = connection
        .prepare(&format!(
            "UPDATE \"transaction\"
             SET date = ?1, type = ?2, category = ?3, amount = ?4, memo = ?5, updated_at = ?6
             WHERE id = ?7 AND deleted_at IS NULL
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                transaction.date.to_offset(UtcOffset::UTC),
                transaction.transaction_type,
                &transaction.category,
                transaction.amount,
                &transaction.memo,
                OffsetDateTime::now_utc(),
                transaction.id,
            ),
            map_transaction_row,
        )?;

    Ok(updated)
}

/// Mark a transaction as deleted.
///
/// The row is kept in the database but is no longer returned by the queries
/// in this module.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the transaction does not exist or was already deleted,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\" SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
        (OffsetDateTime::now_utc(), id),
    )?;

    match rows_affected {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}

/// Get the total number of rows in the transaction table, deleted or not.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                type TEXT NOT NULL CHECK(type IN ('income', 'expense')),
                category TEXT NOT NULL,
                amount INTEGER NOT NULL CHECK(amount > 0),
                memo TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                deleted_at TEXT
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_deleted_at ON \"transaction\"(deleted_at);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        date: row.get(1)?,
        transaction_type: row.get(2)?,
        category: row.get(3)?,
        amount: row.get(4)?,
        memo: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
        deleted_at: row.get(8)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
