//! Chart generation and rendering for the summary and transaction pages.
//!
//! This module creates interactive ECharts visualizations:
//! - **Category Pie Charts**: Last month's totals per category, one per transaction type
//! - **Monthly Expenses Chart**: Stacked bar chart of expenses per category over twelve months
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Emphasis, EmphasisFocus, ItemStyle,
        JsFunction, Orient, Tooltip, Trigger,
    },
    series::{Pie, bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    dashboard::aggregation::{BarChartData, CategoryTotal},
    html::HeadElement,
};

/// A chart with its HTML container ID and ECharts configuration.
pub(crate) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for charts.
pub(crate) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(crate) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// A pie chart of the totals per category.
pub(crate) fn category_pie_chart(title: &str, totals: &[CategoryTotal]) -> Chart {
    let data: Vec<(f64, &str)> = totals
        .iter()
        .map(|total| (total.total as f64, total.category.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text(title).subtext("Last month").left("center"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(amount_formatter()),
        )
        .legend(Legend::new().orient(Orient::Vertical).left("left"))
        .series(
            Pie::new()
                .name(title)
                .radius(vec!["40%", "70%"])
                .item_style(ItemStyle::new().border_radius(8))
                .data(data),
        )
}

/// A stacked bar chart with one series per category in `data`.
pub(crate) fn monthly_expenses_chart(data: &BarChartData) -> Chart {
    let mut chart = Chart::new()
        .title(
            Title::new()
                .text("Monthly Expenses")
                .subtext("Last twelve months, grouped by category")
                .left(20)
                .top("1%"),
        )
        .tooltip(amount_tooltip())
        .legend(Legend::new().left(250).top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(90)
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(data.labels.clone()),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(amount_formatter())),
        );

    for dataset in &data.datasets {
        let values: Vec<f64> = dataset.data.iter().map(|&amount| amount as f64).collect();

        chart = chart.series(
            bar::Bar::new()
                .name(dataset.label.as_str())
                .stack("Expenses")
                .item_style(ItemStyle::new().color(dataset.background_color.as_str()))
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(values),
        );
    }

    chart
}

#[inline]
fn amount_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const amountFormatter = new Intl.NumberFormat('ja-JP', {
              style: 'currency',
              currency: 'JPY'
            });
            return (number) ? amountFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for amounts
fn amount_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(amount_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
