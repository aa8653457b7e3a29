//! The endpoint URIs for pages and the JSON API.

/// The page summarising the last month of transactions per category.
pub const SUMMARY_VIEW: &str = "/";
/// The page listing every transaction with the monthly expenses chart.
pub const TRANSACTIONS_VIEW: &str = "/list";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to list and create transactions.
pub const TRANSACTIONS_API: &str = "/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/transactions/{transaction_id}";
