//! Chart generation and rendering for the analytics page.
//!
//! This module creates interactive ECharts visualizations of spending:
//! - **Spending by Category**: share of expenses per category as a doughnut chart
//! - **Top Merchants**: the merchants with the largest totals as a bar chart
//! - **Income vs Expenses**: daily income and expense totals as a line chart
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, JsFunction, Tooltip, Trigger,
    },
    series::{Bar, Line, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    html::HeadElement,
    transaction::{Category, DailyTotal, MerchantTotal},
};

/// The colours used for chart series, in order.
const PALETTE: [&str; 8] = [
    "#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6", "#ec4899", "#06b6d4", "#6366f1",
];

const CHART_CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg shadow-md overflow-hidden";

const INCOME_COLOR: &str = "#10b981";
const EXPENSES_COLOR: &str = "#ef4444";

/// A chart with its HTML container ID and ECharts configuration.
pub(super) struct AnalyticsChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
    /// Whether the chart spans both grid columns on large screens.
    pub wide: bool,
}

/// Renders a card with an empty container for each chart.
pub(super) fn charts_view(charts: &[AnalyticsChart]) -> Markup {
    html!(
        section
            id="charts"
            class="grid grid-cols-1 lg:grid-cols-2 gap-6"
        {
            @for chart in charts {
                div
                    class={ (CHART_CARD_STYLE) (if chart.wide { " lg:col-span-2" } else { "" }) }
                {
                    div class="p-4 border-b border-gray-200 dark:border-gray-700"
                    {
                        h2 class="text-lg font-semibold" { (chart.title) }
                        p class="text-sm text-gray-600 dark:text-gray-400" { (chart.description) }
                    }

                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for the charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[AnalyticsChart]) -> HeadElement {
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

pub(super) fn spending_by_category_chart(category_totals: &[(Category, f64)]) -> Chart {
    let data: Vec<(f64, &str)> = category_totals
        .iter()
        .map(|(category, total)| (*total, category.as_str()))
        .collect();

    Chart::new()
        .color(palette())
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().left("center").top("bottom"))
        .series(
            Pie::new()
                .name("Spending")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

pub(super) fn top_merchants_chart(merchants: &[MerchantTotal]) -> Chart {
    // Largest at the top of the horizontal bar chart.
    let names: Vec<String> = merchants.iter().rev().map(|m| m.name.clone()).collect();
    let totals: Vec<f64> = merchants.iter().rev().map(|m| m.total).collect();

    Chart::new()
        .color(palette())
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .y_axis(Axis::new().type_(AxisType::Category).data(names))
        .series(Bar::new().name("Total").data(totals))
}

pub(super) fn income_vs_expenses_chart(daily_totals: &[DailyTotal]) -> Chart {
    let labels: Vec<String> = daily_totals.iter().map(|day| day.label.clone()).collect();
    let income: Vec<f64> = daily_totals.iter().map(|day| day.income).collect();
    let expenses: Vec<f64> = daily_totals.iter().map(|day| day.expenses).collect();

    Chart::new()
        .title(Title::new().subtext("Last 30 days with activity"))
        .color(vec![Color::from(INCOME_COLOR), Color::from(EXPENSES_COLOR)])
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(60)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Income").data(income))
        .series(Line::new().name("Expenses").data(expenses))
}

fn palette() -> Vec<Color> {
    PALETTE.iter().map(|colour| Color::from(*colour)).collect()
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
