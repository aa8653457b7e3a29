//! Summary page HTTP handler and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the summary page
//! - HTML view functions for rendering the summary UI
//! - The state type used by the handler

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error, Taxonomy,
    dashboard::{
        aggregation::{CategorySummary, summarize_last_month},
        charts::{DashboardChart, category_pie_chart, charts_script, charts_view},
        tables::category_totals_table,
    },
    endpoints,
    html::{ECHARTS_SCRIPT, HeadElement, base, link},
    navigation::NavBar,
    transaction::get_all_transactions,
};

/// The state needed for displaying the summary page.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The categories that totals are grouped by.
    pub taxonomy: Arc<Taxonomy>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            taxonomy: state.taxonomy.clone(),
        }
    }
}

/// Display a page with last month's totals per category for income and expenses.
pub async fn get_summary_page(State(state): State<SummaryState>) -> Result<Response, Error> {
    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_transactions(&connection)
            .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?
    };

    let summary = summarize_last_month(&transactions, OffsetDateTime::now_utc(), &state.taxonomy);
    let nav_bar = NavBar::new(endpoints::SUMMARY_VIEW);

    if summary.is_empty() {
        return Ok(summary_no_data_view(nav_bar).into_response());
    }

    Ok(summary_view(nav_bar, &summary).into_response())
}

/// Creates a pie chart for each transaction type that has totals.
fn build_summary_charts(summary: &CategorySummary) -> Vec<DashboardChart> {
    let mut charts = Vec::with_capacity(2);

    if !summary.expense.is_empty() {
        charts.push(DashboardChart {
            id: "expense-summary-chart",
            options: category_pie_chart("Expenses", &summary.expense).to_string(),
        });
    }

    if !summary.income.is_empty() {
        charts.push(DashboardChart {
            id: "income-summary-chart",
            options: category_pie_chart("Income", &summary.income).to_string(),
        });
    }

    charts
}

/// Renders the summary page when there are no transactions in the last month.
fn summary_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let transactions_link = link(endpoints::TRANSACTIONS_VIEW, "transactions page");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Charts will show up here once you record transactions for the last month.
                Older transactions are listed on the " (transactions_link) "."
            }
        }
    );

    base("Summary", &[], &content)
}

fn summary_view(nav_bar: NavBar, summary: &CategorySummary) -> Markup {
    let nav_bar = nav_bar.into_html();
    let charts = build_summary_charts(summary);

    let content = html!(
        (nav_bar)

        div
            id="summary-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (charts_view(&charts))

            div class="grid grid-cols-1 xl:grid-cols-2 gap-4 w-full"
            {
                (category_totals_table("expense-totals", "Expenses", &summary.expense))
                (category_totals_table("income-totals", "Income", &summary.income))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        charts_script(&charts),
    ];

    base("Summary", &scripts, &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use scraper::Selector;
    use time::{Duration, OffsetDateTime};

    use crate::{
        Taxonomy, TransactionType,
        dashboard::handlers::{SummaryState, get_summary_page},
        db::initialize,
        test_utils::{assert_status_ok, assert_valid_html, html::table_rows, parse_html_document},
        transaction::{NewTransaction, create_transaction, delete_transaction},
    };

    fn get_test_state() -> SummaryState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SummaryState {
            db_connection: Arc::new(Mutex::new(connection)),
            taxonomy: Arc::new(Taxonomy::default()),
        }
    }

    fn insert(
        state: &SummaryState,
        days_ago: i64,
        transaction_type: TransactionType,
        category: &str,
        amount: i64,
    ) -> i64 {
        create_transaction(
            NewTransaction {
                date: OffsetDateTime::now_utc() - Duration::days(days_ago),
                transaction_type,
                category: category.to_owned(),
                amount,
                memo: String::new(),
            },
            &state.db_connection.lock().unwrap(),
        )
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn shows_totals_for_last_month() {
        let state = get_test_state();
        insert(&state, 1, TransactionType::Expense, "食費", 1200);
        insert(&state, 3, TransactionType::Expense, "食費", 800);
        insert(&state, 5, TransactionType::Expense, "家賃", 90_000);
        insert(&state, 60, TransactionType::Expense, "娯楽", 5000);
        insert(&state, 2, TransactionType::Income, "給与", 280_000);

        let response = get_summary_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        assert_eq!(
            table_rows(&html, "#expense-totals tbody tr"),
            vec![vec!["家賃", "¥90,000"], vec!["食費", "¥2,000"]]
        );
        assert_eq!(
            table_rows(&html, "#income-totals tbody tr"),
            vec![vec!["給与", "¥280,000"]]
        );

        for chart_id in ["#expense-summary-chart", "#income-summary-chart"] {
            let selector = Selector::parse(chart_id).unwrap();
            assert!(
                html.select(&selector).next().is_some(),
                "could not find {chart_id}"
            );
        }
    }

    #[tokio::test]
    async fn omits_chart_for_type_without_totals() {
        let state = get_test_state();
        insert(&state, 1, TransactionType::Expense, "交通費", 350);

        let response = get_summary_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        let income_chart = Selector::parse("#income-summary-chart").unwrap();
        assert!(html.select(&income_chart).next().is_none());
        assert!(table_rows(&html, "#income-totals tbody tr").is_empty());
    }

    #[tokio::test]
    async fn shows_no_data_view_without_recent_transactions() {
        let state = get_test_state();
        insert(&state, 90, TransactionType::Expense, "食費", 1200);
        let deleted = insert(&state, 1, TransactionType::Expense, "食費", 500);
        delete_transaction(deleted, &state.db_connection.lock().unwrap()).unwrap();

        let response = get_summary_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let heading = Selector::parse("h2").unwrap();
        let heading: String = html.select(&heading).flat_map(|h| h.text()).collect();
        assert_eq!(heading.trim(), "Nothing here yet...");
        let charts = Selector::parse("#charts").unwrap();
        assert!(html.select(&charts).next().is_none());
    }
}
