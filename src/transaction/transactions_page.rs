//! The page listing every transaction alongside the monthly expenses chart.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error, Taxonomy, Transaction, TransactionType,
    dashboard::{
        aggregation::monthly_expenses_by_category,
        charts::{DashboardChart, charts_script, charts_view, monthly_expenses_chart},
    },
    endpoints,
    html::{
        ECHARTS_SCRIPT, EXPENSE_BADGE_STYLE, HeadElement, INCOME_BADGE_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE,
        base, escape_json_for_script, format_amount,
    },
    navigation::NavBar,
    transaction::core::get_all_transactions,
};

/// The ID of the element holding the monthly expense matrix as JSON.
const BAR_CHART_DATA_ID: &str = "bar-chart-data";

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The categories that decide which expenses are charted.
    pub taxonomy: Arc<Taxonomy>,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            taxonomy: state.taxonomy.clone(),
        }
    }
}

/// Render the transaction table, newest first, and the twelve month bar chart.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
) -> Result<Response, Error> {
    let mut transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_transactions(&connection)
            .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?
    };

    transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

    let bar_chart_data =
        monthly_expenses_by_category(&transactions, OffsetDateTime::now_utc(), &state.taxonomy);
    let charts = [DashboardChart {
        id: "monthly-expenses-chart",
        options: monthly_expenses_chart(&bar_chart_data).to_string(),
    }];

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        charts_script(&charts),
        HeadElement::JsonData {
            id: BAR_CHART_DATA_ID,
            json: escape_json_for_script(&bar_chart_data.to_json()),
        },
    ];

    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            (charts_view(&charts))
            (transactions_table(&transactions))
        }
    );

    Ok(base("Transactions", &scripts, &content).into_response())
}

fn transactions_table(transactions: &[Transaction]) -> Markup {
    html!(
        section class="w-full relative overflow-x-auto shadow-md rounded-lg"
        {
            table id="transactions-table" class=(TABLE_STYLE)
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Memo" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
                        {
                            td class=(TABLE_CELL_STYLE) { (transaction.date.date()) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                @match transaction.transaction_type {
                                    TransactionType::Income => {
                                        span class=(INCOME_BADGE_STYLE) { "income" }
                                    }
                                    TransactionType::Expense => {
                                        span class=(EXPENSE_BADGE_STYLE) { "expense" }
                                    }
                                }
                            }
                            td class=(TABLE_CELL_STYLE) { (transaction.category) }
                            td class={(TABLE_CELL_STYLE) " text-right"} { (format_amount(transaction.amount)) }
                            td class=(TABLE_CELL_STYLE) { (transaction.memo) }
                        }
                    }

                    @if transactions.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="5" class={(TABLE_CELL_STYLE) " text-center"}
                            {
                                "No transactions yet."
                            }
                        }
                    }
                }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use scraper::Selector;
    use time::{OffsetDateTime, macros::datetime};

    use crate::{
        Taxonomy, TransactionType,
        db::initialize,
        test_utils::{
            assert_content_type, assert_status_ok, assert_valid_html, html::table_rows,
            parse_html_document,
        },
        transaction::{
            NewTransaction, create_transaction,
            transactions_page::{TransactionsPageState, get_transactions_page},
        },
    };

    fn get_test_state() -> TransactionsPageState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        TransactionsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
            taxonomy: Arc::new(Taxonomy::default()),
        }
    }

    fn insert(
        state: &TransactionsPageState,
        date: OffsetDateTime,
        transaction_type: TransactionType,
        category: &str,
        amount: i64,
        memo: &str,
    ) {
        create_transaction(
            NewTransaction {
                date,
                transaction_type,
                category: category.to_owned(),
                amount,
                memo: memo.to_owned(),
            },
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn lists_transactions_newest_first() {
        let state = get_test_state();
        let expense = TransactionType::Expense;
        let income = TransactionType::Income;
        insert(&state, datetime!(2025-04-01 0:00 UTC), expense, "家賃", 80_000, "April rent");
        insert(&state, datetime!(2025-04-25 0:00 UTC), income, "給与", 300_000, "");
        insert(&state, datetime!(2025-04-10 0:00 UTC), expense, "食費", 1_234, "groceries");

        let response = get_transactions_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let rows = table_rows(&html, "#transactions-table tbody tr");
        assert_eq!(
            rows,
            vec![
                vec!["2025-04-25", "income", "給与", "¥300,000", ""],
                vec!["2025-04-10", "expense", "食費", "¥1,234", "groceries"],
                vec!["2025-04-01", "expense", "家賃", "¥80,000", "April rent"],
            ]
        );
    }

    #[tokio::test]
    async fn embeds_monthly_expense_data() {
        let state = get_test_state();
        let now = OffsetDateTime::now_utc();
        insert(&state, now, TransactionType::Expense, "交通費", 220, "");
        insert(&state, now, TransactionType::Income, "賞与", 50_000, "");

        let response = get_transactions_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        let selector =
            Selector::parse(r#"script[type="application/json"]#bar-chart-data"#).unwrap();
        let script = html
            .select(&selector)
            .next()
            .expect("could not find bar chart data");
        let json: serde_json::Value =
            serde_json::from_str(&script.text().collect::<String>()).unwrap();

        let labels = json["labels"].as_array().unwrap();
        assert_eq!(labels.len(), 12);
        let datasets = json["datasets"].as_array().unwrap();
        assert_eq!(datasets.len(), 1);
        assert_eq!(datasets[0]["label"], "交通費");
        assert_eq!(datasets[0]["backgroundColor"], "#FF6384");
        assert_eq!(datasets[0]["data"][11], 220);

        let chart = Selector::parse("#monthly-expenses-chart").unwrap();
        assert!(html.select(&chart).next().is_some());
    }

    #[tokio::test]
    async fn shows_empty_table_without_transactions() {
        let response = get_transactions_page(State(get_test_state())).await.unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let rows = table_rows(&html, "#transactions-table tbody tr");
        assert_eq!(rows, vec![vec!["No transactions yet."]]);
    }
}
