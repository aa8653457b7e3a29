//! Checks that transaction data follows the rules for stored transactions
//! before it reaches the database.

use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    Taxonomy, TransactionType,
    transaction::core::{NewTransaction, Transaction},
};

/// The reason a proposed transaction was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The type tag was something other than "income" or "expense".
    #[error("unknown transaction type '{0}', expected 'income' or 'expense'")]
    UnknownType(String),

    /// The category was an empty string.
    #[error("category must not be empty")]
    EmptyCategory,

    /// The amount was zero or negative.
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(i64),

    /// The category is not one of the categories for the transaction type.
    #[error("invalid category '{category}' for type '{transaction_type}'")]
    InvalidCategory {
        /// The rejected category.
        category: String,
        /// The type that the category was checked against.
        transaction_type: TransactionType,
    },
}

/// The request body for creating a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionInput {
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// The type tag, "income" or "expense".
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// The category, must belong to the type.
    pub category: String,
    /// The amount of money, must be greater than zero.
    pub amount: i64,
    /// An optional note, `null` is the same as leaving it out.
    #[serde(default)]
    pub memo: Option<String>,
}

/// The request body for updating a transaction.
///
/// Fields that are `None` keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionPatch {
    /// The new date.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    /// The new type tag.
    #[serde(default, rename = "type")]
    pub transaction_type: Option<String>,
    /// The new category.
    #[serde(default)]
    pub category: Option<String>,
    /// The new amount.
    #[serde(default)]
    pub amount: Option<i64>,
    /// The new memo.
    #[serde(default)]
    pub memo: Option<String>,
}

/// Check a proposed transaction and turn it into a [NewTransaction].
///
/// # Errors
/// Returns the first rule that `input` breaks, checked in the order: type tag,
/// amount, empty category, category membership.
pub fn validate_new_transaction(
    input: TransactionInput,
    taxonomy: &Taxonomy,
) -> Result<NewTransaction, ValidationError> {
    let transaction_type = parse_type(&input.transaction_type)?;
    validate_amount(input.amount)?;
    validate_category(transaction_type, &input.category, taxonomy)?;

    Ok(NewTransaction {
        date: input.date,
        transaction_type,
        category: input.category,
        amount: input.amount,
        memo: input.memo.unwrap_or_default(),
    })
}

/// Apply the fields present in `patch` onto `existing` and check the result.
///
/// The type/category pairing is checked on the merged transaction, so a patch
/// that only changes the memo is valid as long as the stored pairing is.
///
/// # Errors
/// Returns the first rule that the merged transaction breaks.
pub fn apply_patch(
    existing: Transaction,
    patch: TransactionPatch,
    taxonomy: &Taxonomy,
) -> Result<Transaction, ValidationError> {
    let transaction_type = match patch.transaction_type {
        Some(type_tag) => parse_type(&type_tag)?,
        None => existing.transaction_type,
    };
    let amount = patch.amount.unwrap_or(existing.amount);
    let category = patch.category.unwrap_or(existing.category);

    validate_amount(amount)?;
    validate_category(transaction_type, &category, taxonomy)?;

    Ok(Transaction {
        date: patch.date.unwrap_or(existing.date),
        transaction_type,
        category,
        amount,
        memo: patch.memo.unwrap_or(existing.memo),
        ..existing
    })
}

fn parse_type(type_tag: &str) -> Result<TransactionType, ValidationError> {
    type_tag
        .parse()
        .map_err(|_| ValidationError::UnknownType(type_tag.to_owned()))
}

fn validate_amount(amount: i64) -> Result<(), ValidationError> {
    if amount > 0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveAmount(amount))
    }
}

/// Check that `category` is listed for `transaction_type`.
///
/// # Errors
/// Returns [ValidationError::EmptyCategory] for an empty string and
/// [ValidationError::InvalidCategory] for any other unlisted category.
pub fn validate_category(
    transaction_type: TransactionType,
    category: &str,
    taxonomy: &Taxonomy,
) -> Result<(), ValidationError> {
    if category.is_empty() {
        return Err(ValidationError::EmptyCategory);
    }

    if taxonomy.contains(transaction_type, category) {
        Ok(())
    } else {
        Err(ValidationError::InvalidCategory {
            category: category.to_owned(),
            transaction_type,
        })
    }
}
