//! Defines the route handler for the page that lists and searches transactions.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::UtcOffset;

use crate::{
    AppState, Error, endpoints,
    format::{DEFAULT_CURRENCY, format_currency},
    html::{
        BUTTON_SECONDARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, base, page_header, stat_card,
    },
    navigation::NavBar,
    pagination::{Page, PaginationConfig, PaginationIndicator, paginate},
    timezone::local_offset_or_error,
};

use super::{
    aggregation::CashFlowSummary,
    core::{Category, Transaction, TransactionStatus},
    filter::{TransactionFilter, filter_transactions},
    view::transaction_table_row,
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    pub transactions: Arc<Vec<Transaction>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transactions: state.transactions.clone(),
            local_timezone: state.local_timezone.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The raw query string of the transactions page.
///
/// Every field is kept as text so that the empty values sent by the filter
/// form, e.g. `category=`, mean "no filter" instead of failing to parse.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
}

impl TransactionsQuery {
    /// The filter described by the query. Unrecognised values are ignored.
    pub fn filter(&self) -> TransactionFilter {
        let category = non_empty(&self.category).and_then(|text| {
            let category = parse_category(text);
            if category.is_none() {
                tracing::warn!("ignoring unknown category filter {text:?}");
            }
            category
        });
        let status = non_empty(&self.status).and_then(|text| {
            let status = parse_status(text);
            if status.is_none() {
                tracing::warn!("ignoring unknown status filter {text:?}");
            }
            status
        });

        TransactionFilter {
            query: self.q.clone().filter(|q| !q.is_empty()),
            category,
            status,
        }
    }

    fn page(&self, default_page: u64) -> u64 {
        non_empty(&self.page)
            .and_then(|page| page.parse().ok())
            .filter(|page| *page > 0)
            .unwrap_or(default_page)
    }

    /// The query string for `page` with the same filters, without the leading "?".
    fn with_page(&self, page: u64) -> String {
        let query = TransactionsQuery {
            page: Some(page.to_string()),
            ..self.clone()
        };

        serde_urlencoded::to_string(&query).unwrap_or_else(|error| {
            tracing::error!("could not encode transactions query: {error}");
            format!("page={page}")
        })
    }

    /// The query string without the page, without the leading "?".
    pub(crate) fn filter_query_string(&self) -> String {
        let query = TransactionsQuery {
            page: None,
            ..self.clone()
        };

        serde_urlencoded::to_string(&query).unwrap_or_default()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

fn parse_category(text: &str) -> Option<Category> {
    Category::ALL
        .into_iter()
        .find(|category| category.as_str().eq_ignore_ascii_case(text))
}

fn parse_status(text: &str) -> Option<TransactionStatus> {
    TransactionStatus::ALL
        .into_iter()
        .find(|status| status.as_str().eq_ignore_ascii_case(text))
}

/// Render the searchable, paginated transaction history.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let local_offset = local_offset_or_error(&state.local_timezone)?;
    let config = &state.pagination_config;

    let filter = query.filter();
    let filtered = filter_transactions(&state.transactions, &filter);
    let summary = CashFlowSummary::from_transactions(filtered.iter().copied());
    let page = paginate(&filtered, query.page(config.default_page), config.default_page_size);

    tracing::debug!(
        "showing page {} of {} for {} matching transactions",
        page.page,
        page.page_count,
        page.total_items
    );

    Ok(transactions_view(&query, &filter, &summary, &page, config.max_pages, local_offset)
        .into_response())
}

fn transactions_view(
    query: &TransactionsQuery,
    filter: &TransactionFilter,
    summary: &CashFlowSummary,
    page: &Page<'_, &Transaction>,
    max_pages: u64,
    local_offset: UtcOffset,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let export_url = match query.filter_query_string() {
        params if params.is_empty() => endpoints::TRANSACTIONS_EXPORT.to_owned(),
        params => format!("{}?{params}", endpoints::TRANSACTIONS_EXPORT),
    };

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex justify-between items-end flex-wrap gap-4"
            {
                (page_header("Transactions", "View and manage all your transactions"))

                a href=(export_url) class={ (BUTTON_SECONDARY_STYLE) " w-auto" } download
                {
                    "Download CSV"
                }
            }

            (filter_form(filter))

            section class="grid grid-cols-1 md:grid-cols-3 gap-4"
            {
                (stat_card("Transactions", &page.total_items.to_string(), None, ""))
                (stat_card(
                    "Total Income",
                    &format_currency(summary.income, DEFAULT_CURRENCY),
                    None,
                    "text-green-600 dark:text-green-400"
                ))
                (stat_card(
                    "Total Expenses",
                    &format_currency(summary.expenses, DEFAULT_CURRENCY),
                    None,
                    "text-red-600 dark:text-red-400"
                ))
            }

            section class=(CARD_STYLE)
            {
                div class="overflow-x-auto"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Amount" }
                            }
                        }

                        tbody
                        {
                            @for transaction in page.items {
                                (transaction_table_row(transaction, local_offset))
                            }

                            @if page.items.is_empty() {
                                tr
                                {
                                    td colspan="5" data-empty-state="true" class="px-6 py-4 text-center"
                                    {
                                        "No transactions found."
                                    }
                                }
                            }
                        }
                    }
                }

                div class="flex flex-wrap items-center justify-between gap-4 mt-4"
                {
                    p id="showing-range" class="text-sm text-gray-600 dark:text-gray-400"
                    {
                        (showing_range_text(page))
                    }

                    (pagination_view(query, page, max_pages))
                }
            }
        }
    };

    base("Transactions", &[], &content)
}

/// E.g. "Showing 11-20 of 95 transactions".
fn showing_range_text<T>(page: &Page<'_, T>) -> String {
    if page.items.is_empty() {
        return format!("Showing 0 of {} transactions", page.total_items);
    }

    format!(
        "Showing {}-{} of {} transactions",
        page.offset + 1,
        page.offset + page.items.len(),
        page.total_items
    )
}

fn filter_form(filter: &TransactionFilter) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class={ (CARD_STYLE) " grid grid-cols-1 md:grid-cols-4 gap-4 items-end" }
        {
            div class="md:col-span-2"
            {
                label for="q" class=(FORM_LABEL_STYLE) { "Search" }
                input
                    type="search"
                    id="q"
                    name="q"
                    placeholder="Search by description or reference"
                    value=[filter.query.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                select id="category" name="category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[filter.category.is_none()] { "All Categories" }
                    @for category in Category::ALL {
                        option value=(category.as_str()) selected[filter.category == Some(category)]
                        {
                            (category.as_str())
                        }
                    }
                }
            }

            div
            {
                label for="status" class=(FORM_LABEL_STYLE) { "Status" }
                select id="status" name="status" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[filter.status.is_none()] { "All Statuses" }
                    @for status in TransactionStatus::ALL {
                        option value=(status.as_str()) selected[filter.status == Some(status)]
                        {
                            (status.label())
                        }
                    }
                }
            }

            button type="submit" class={ (BUTTON_SECONDARY_STYLE) " md:col-start-4" } { "Apply Filters" }
        }
    }
}

fn pagination_view<T>(query: &TransactionsQuery, page: &Page<'_, T>, max_pages: u64) -> Markup {
    let indicators = page.indicators(max_pages);
    let page_url = |number: u64| format!("{}?{}", endpoints::TRANSACTIONS_VIEW, query.with_page(number));
    let link_style = "block px-3 py-2 rounded border border-gray-300 dark:border-gray-600 \
        hover:bg-gray-100 dark:hover:bg-gray-700";

    html! {
        nav class="pagination" aria-label="Pagination"
        {
            ul class="flex items-center gap-1"
            {
                @for indicator in indicators {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::CurrPage(number) => {
                                p
                                    aria-current="page"
                                    class="block px-3 py-2 rounded bg-blue-600 text-white"
                                {
                                    (number)
                                }
                            }
                            PaginationIndicator::Page(number) => {
                                a href=(page_url(number)) class=(link_style) { (number) }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class="px-2" { "..." }
                            }
                            PaginationIndicator::BackButton(number) => {
                                a href=(page_url(number)) class=(link_style) role="button" { "Previous" }
                            }
                            PaginationIndicator::NextButton(number) => {
                                a href=(page_url(number)) class=(link_style) role="button" { "Next" }
                            }
                        }
                    }
                }
            }
        }
    }
}
