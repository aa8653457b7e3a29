//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the database functions for storing it
//! - Validation of proposed transactions against the category taxonomy
//! - The JSON API handlers and the transaction list page

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;
mod transactions_page;
mod validation;

pub use self::core::{Transaction, create_transaction_table, get_all_transactions};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use get_endpoint::{get_transaction_endpoint, get_transactions_endpoint};
pub use transactions_page::get_transactions_page;
pub use validation::{ValidationError, apply_patch, validate_new_transaction};

#[cfg(test)]
pub use self::core::{
    NewTransaction, count_transactions, create_transaction, delete_transaction, get_transaction,
    update_transaction,
};
