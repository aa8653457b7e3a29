//! Dashboard module
//!
//! Provides the summary page showing last month's totals per category, and
//! the aggregation and chart code shared with the transactions page.

pub(crate) mod aggregation;
pub(crate) mod charts;
mod handlers;
mod tables;

pub use handlers::get_summary_page;
