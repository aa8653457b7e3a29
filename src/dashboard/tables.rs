//! Table views for the category totals on the summary page.

use maud::{Markup, html};

use crate::{
    dashboard::aggregation::CategoryTotal,
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, format_amount},
};

/// Renders a table of the totals per category with a grand total row.
///
/// # Arguments
/// * `id` - The HTML element ID for the table
/// * `title` - The heading shown above the table
/// * `totals` - The category totals in display order
pub(super) fn category_totals_table(id: &str, title: &str, totals: &[CategoryTotal]) -> Markup {
    let grand_total = totals
        .iter()
        .fold(0_i64, |sum, total| sum.saturating_add(total.total));

    html! {
        div class="w-full" {
            h3 class="text-xl font-semibold mb-4" { (title) }

            div class="overflow-x-auto rounded-lg shadow" {
                table id=(id) class=(TABLE_STYLE) {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Total" }
                        }
                    }
                    tbody {
                        @for total in totals {
                            tr class=(TABLE_ROW_STYLE) {
                                td class=(TABLE_CELL_STYLE) { (total.category) }
                                td class={(TABLE_CELL_STYLE) " text-right"} { (format_amount(total.total)) }
                            }
                        }
                    }
                    tfoot {
                        tr class="font-semibold text-gray-900 dark:text-white" {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Total" }
                            td class={(TABLE_CELL_STYLE) " text-right"} { (format_amount(grand_total)) }
                        }
                    }
                }
            }
        }
    }
}
