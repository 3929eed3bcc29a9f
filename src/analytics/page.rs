//! The analytics page: totals, charts and the category breakdown.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error, endpoints,
    format::{DEFAULT_CURRENCY, format_currency},
    html::{CARD_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base, page_header, progress_bar, stat_card},
    navigation::NavBar,
    timezone::local_offset_or_error,
    transaction::{
        CashFlowSummary, Category, TOP_MERCHANT_COUNT, Transaction, daily_totals,
        sorted_category_totals, top_merchants,
    },
};

use super::charts::{
    AnalyticsChart, charts_script, charts_view, income_vs_expenses_chart,
    spending_by_category_chart, top_merchants_chart,
};

const ECHARTS_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// The state needed for the analytics page.
#[derive(Debug, Clone)]
pub struct AnalyticsState {
    pub transactions: Arc<Vec<Transaction>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for AnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transactions: state.transactions.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A category's spending and its share of all expenses.
#[derive(Debug, Clone, PartialEq)]
struct CategoryShare {
    category: Category,
    total: f64,
    /// Percentage of total expenses, zero when there are no expenses.
    percent: f64,
}

fn category_shares(category_totals: &[(Category, f64)], expenses: f64) -> Vec<CategoryShare> {
    category_totals
        .iter()
        .map(|&(category, total)| CategoryShare {
            category,
            total,
            percent: if expenses > 0.0 {
                total / expenses * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

/// Display charts and totals summarising all transactions.
pub async fn get_analytics_page(State(state): State<AnalyticsState>) -> Result<Response, Error> {
    let local_offset = local_offset_or_error(&state.local_timezone)?;
    let transactions = state.transactions.as_slice();

    let summary = CashFlowSummary::from_transactions(transactions);
    let category_totals = sorted_category_totals(transactions);
    let charts = [
        AnalyticsChart {
            id: "category-chart",
            title: "Spending by Category",
            description: "Distribution of your expenses",
            options: spending_by_category_chart(&category_totals).to_string(),
            wide: false,
        },
        AnalyticsChart {
            id: "merchants-chart",
            title: "Top Merchants",
            description: "Your most frequent spending destinations",
            options: top_merchants_chart(&top_merchants(transactions, TOP_MERCHANT_COUNT))
                .to_string(),
            wide: false,
        },
        AnalyticsChart {
            id: "trend-chart",
            title: "Income vs Expenses Trend",
            description: "Daily comparison of your income and expenses",
            options: income_vs_expenses_chart(&daily_totals(transactions, local_offset))
                .to_string(),
            wide: true,
        },
    ];
    let shares = category_shares(&category_totals, summary.expenses);

    Ok(analytics_view(&summary, &charts, &shares).into_response())
}

fn analytics_view(
    summary: &CashFlowSummary,
    charts: &[AnalyticsChart],
    shares: &[CategoryShare],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::ANALYTICS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            (page_header("Analytics", "Visualize your spending patterns and financial trends"))

            section class="grid grid-cols-1 md:grid-cols-4 gap-4"
            {
                (stat_card(
                    "Total Income",
                    &format!("+{}", format_currency(summary.income, DEFAULT_CURRENCY)),
                    None,
                    "text-green-600 dark:text-green-400"
                ))
                (stat_card(
                    "Total Expenses",
                    &format!("-{}", format_currency(summary.expenses, DEFAULT_CURRENCY)),
                    None,
                    "text-red-600 dark:text-red-400"
                ))
                (stat_card(
                    "Net Savings",
                    &format_currency(summary.net, DEFAULT_CURRENCY),
                    None,
                    "text-blue-600 dark:text-blue-400"
                ))
                (stat_card(
                    "Savings Rate",
                    &format!("{:.1}%", summary.savings_rate),
                    None,
                    "text-purple-600 dark:text-purple-400"
                ))
            }

            (charts_view(charts))

            section id="category-breakdown" class={ (CARD_STYLE) " space-y-3" }
            {
                h2 class="text-lg font-semibold" { "Category Breakdown" }
                p class="text-sm text-gray-600 dark:text-gray-400" { "Detailed spending by category" }

                @if shares.is_empty() {
                    p { "No expenses yet." }
                }

                @for share in shares {
                    div data-category=(share.category.as_str())
                    {
                        div class="flex items-center justify-between mb-1"
                        {
                            span class="text-sm font-medium" { (share.category) }
                            span class="text-sm font-bold"
                            {
                                (format_currency(share.total, DEFAULT_CURRENCY))
                                " (" (format!("{:.1}", share.percent)) "%)"
                            }
                        }
                        (progress_bar(share.percent))
                    }
                }
            }
        }
    };

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        charts_script(charts),
    ];

    base("Analytics", &scripts, &content)
}
