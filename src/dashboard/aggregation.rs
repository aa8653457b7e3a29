//! Transaction data aggregation and transformation for charts.
//!
//! Provides the trailing month summary of totals per category and the twelve
//! month matrix of expenses per category.

use serde::Serialize;
use time::{Date, Duration, Month, OffsetDateTime, UtcOffset};

use crate::{Taxonomy, Transaction, TransactionType};

/// The number of months shown in the monthly expenses chart.
pub(crate) const MONTHS_IN_WINDOW: usize = 12;

/// The colours assigned to the monthly expense datasets, in order.
pub(crate) const CHART_COLORS: [&str; 12] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#E7E9ED", "#8DDF3C",
    "#F178B4", "#6A2E35", "#C4D7F2", "#A2D4AB",
];

/// The summed amount of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategoryTotal {
    pub category: String,
    pub total: i64,
}

/// Totals per category for each transaction type.
///
/// Categories without any transactions are left out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct CategorySummary {
    pub expense: Vec<CategoryTotal>,
    pub income: Vec<CategoryTotal>,
}

impl CategorySummary {
    pub(crate) fn is_empty(&self) -> bool {
        self.expense.is_empty() && self.income.is_empty()
    }
}

/// One bar series in the monthly expenses chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct BarChartDataset {
    pub label: String,
    /// One total per month label, zero for months without expenses.
    pub data: Vec<i64>,
    #[serde(rename = "backgroundColor")]
    pub background_color: String,
}

/// Monthly expense totals per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct BarChartData {
    /// The months in "YYYY-MM" form, oldest first.
    pub labels: Vec<String>,
    pub datasets: Vec<BarChartDataset>,
}

impl BarChartData {
    /// Serialize as `{"labels": [...], "datasets": [...]}`.
    ///
    /// Falls back to `{}` if the data cannot be serialized.
    pub(crate) fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|error| {
            tracing::error!("could not serialize bar chart data: {error}");
            "{}".to_owned()
        })
    }
}

/// The same instant one calendar month earlier, in UTC.
///
/// If the earlier month is too short for the day of the month, the last day
/// of the earlier month is used instead, e.g. 31 March becomes 28 February.
pub(crate) fn one_month_before(now: OffsetDateTime) -> OffsetDateTime {
    let now = now.to_offset(UtcOffset::UTC);
    let (year, month) = previous_month(now.year(), now.month());
    let days_in_previous_month = month.length(year);

    // Going from day d of this month to day d of the previous month steps
    // back by the length of the previous month. Past its end, we step back to
    // its last day, which is d days.
    let days_back = now.day().max(days_in_previous_month);

    now - Duration::days(i64::from(days_back))
}

/// Sum the amounts per category of the transactions from the last month.
///
/// Only transactions dated on or after [one_month_before] `now` are counted.
/// Totals are listed in the taxonomy's order and categories with no
/// transactions are left out. Totals saturate at [i64::MAX].
pub(crate) fn summarize_last_month(
    transactions: &[Transaction],
    now: OffsetDateTime,
    taxonomy: &Taxonomy,
) -> CategorySummary {
    let start = one_month_before(now);
    let recent: Vec<&Transaction> = transactions
        .iter()
        .filter(|transaction| transaction.date >= start)
        .collect();

    CategorySummary {
        expense: total_by_category(&recent, TransactionType::Expense, taxonomy),
        income: total_by_category(&recent, TransactionType::Income, taxonomy),
    }
}

fn total_by_category(
    transactions: &[&Transaction],
    transaction_type: TransactionType,
    taxonomy: &Taxonomy,
) -> Vec<CategoryTotal> {
    taxonomy
        .categories_for(transaction_type)
        .iter()
        .filter_map(|category| {
            let mut matching = transactions.iter().filter(|transaction| {
                transaction.transaction_type == transaction_type
                    && &transaction.category == category
            });

            let first = matching.next()?;
            let total = matching.fold(first.amount, |total, transaction| {
                total.saturating_add(transaction.amount)
            });

            Some(CategoryTotal {
                category: category.clone(),
                total,
            })
        })
        .collect()
}

/// The first day of the month `months_back` months before the month of `date`.
fn month_start(date: Date, months_back: u32) -> Date {
    let mut start = date - Duration::days(i64::from(date.day() - 1));

    for _ in 0..months_back {
        let (year, month) = previous_month(start.year(), start.month());
        start -= Duration::days(i64::from(month.length(year)));
    }

    start
}

fn previous_month(year: i32, month: Month) -> (i32, Month) {
    match month {
        Month::January => (year - 1, Month::December),
        month => (year, month.previous()),
    }
}

fn month_label(date: Date) -> String {
    format!("{:04}-{:02}", date.year(), u8::from(date.month()))
}

/// The first instant of the window and its twelve "YYYY-MM" month labels,
/// ending with the month of `now` in UTC.
pub(crate) fn month_window(now: OffsetDateTime) -> (OffsetDateTime, Vec<String>) {
    let today = now.to_offset(UtcOffset::UTC).date();
    let first_month = month_start(today, (MONTHS_IN_WINDOW - 1) as u32);

    let mut labels = Vec::with_capacity(MONTHS_IN_WINDOW);
    let mut month = first_month;
    for _ in 0..MONTHS_IN_WINDOW {
        labels.push(month_label(month));
        month += Duration::days(i64::from(month.month().length(month.year())));
    }

    (first_month.midnight().assume_utc(), labels)
}

/// Build the twelve month matrix of expense totals per category.
///
/// Expenses dated on or after the first day of the window are grouped by
/// month and category in date order. Each category gets one dataset, in the
/// order the categories are first seen, with a colour from [CHART_COLORS].
/// Months without expenses for a category are zero. Totals saturate at
/// [i64::MAX].
pub(crate) fn monthly_expenses_by_category(
    transactions: &[Transaction],
    now: OffsetDateTime,
    taxonomy: &Taxonomy,
) -> BarChartData {
    let (window_start, labels) = month_window(now);

    let mut expenses: Vec<&Transaction> = transactions
        .iter()
        .filter(|transaction| {
            transaction.transaction_type == TransactionType::Expense
                && transaction.date >= window_start
                && taxonomy.contains(TransactionType::Expense, &transaction.category)
        })
        .collect();
    expenses.sort_by_key(|transaction| (transaction.date, transaction.id));

    // (month label, category) -> total, in the order each pair is first seen.
    let mut groups: Vec<((String, &str), i64)> = Vec::new();
    for transaction in expenses {
        let key = (
            month_label(transaction.date.to_offset(UtcOffset::UTC).date()),
            transaction.category.as_str(),
        );

        match groups.iter_mut().find(|(group_key, _)| *group_key == key) {
            Some((_, total)) => *total = total.saturating_add(transaction.amount),
            None => groups.push((key, transaction.amount)),
        }
    }

    let mut datasets: Vec<BarChartDataset> = Vec::new();
    for ((month, category), total) in groups {
        let index = match datasets.iter().position(|dataset| dataset.label == category) {
            Some(index) => index,
            None => {
                datasets.push(BarChartDataset {
                    label: category.to_owned(),
                    data: vec![0; MONTHS_IN_WINDOW],
                    background_color: CHART_COLORS[datasets.len() % CHART_COLORS.len()]
                        .to_owned(),
                });
                datasets.len() - 1
            }
        };

        // Expenses dated after the current month have no label.
        if let Some(month_index) = labels.iter().position(|label| *label == month) {
            datasets[index].data[month_index] = total;
        }
    }

    BarChartData { labels, datasets }
}
