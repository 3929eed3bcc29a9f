//! Dashboard HTTP handlers and view rendering.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use time::UtcOffset;

use crate::{
    AppState, Error,
    account::{Account, default_account, find_account},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE, PAGE_CONTAINER_STYLE, base, page_header},
    navigation::NavBar,
    timezone::local_offset_or_error,
    transaction::{CashFlowSummary, Category, Transaction, transaction_list_item},
};

use super::cards::{accounts_view, balance_card, summary_cards};

/// The number of transactions in the "Recent Transactions" list.
const RECENT_TRANSACTION_COUNT: usize = 7;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub transactions: Arc<Vec<Transaction>>,
    pub accounts: Arc<Vec<Account>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transactions: state.transactions.clone(),
            accounts: state.accounts.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query string of the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The ID of the account to show, the default account if unset.
    pub account: Option<String>,
    #[serde(default)]
    pub hide_balance: bool,
}

/// Display a page with an overview of the user's accounts and recent activity.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let local_offset = local_offset_or_error(&state.local_timezone)?;

    let selected = match query.account.as_deref() {
        Some(id) => find_account(&state.accounts, id).ok_or_else(|| {
            tracing::warn!("dashboard requested for unknown account {id}");
            Error::NotFound
        })?,
        None => default_account(&state.accounts).ok_or_else(|| {
            tracing::error!("there are no accounts to show on the dashboard");
            Error::NotFound
        })?,
    };

    let summary = dashboard_summary(&state.transactions);

    Ok(dashboard_view(
        &state.accounts,
        selected,
        query.hide_balance,
        &summary,
        &state.transactions,
        local_offset,
    )
    .into_response())
}

/// Income is only what was filed under [Category::Income], so refunds and
/// other credits do not inflate it.
fn dashboard_summary(transactions: &[Transaction]) -> CashFlowSummary {
    let income = transactions
        .iter()
        .filter(|transaction| transaction.is_credit() && transaction.category == Category::Income)
        .map(|transaction| transaction.amount)
        .sum();
    let expenses = transactions
        .iter()
        .filter(|transaction| transaction.is_debit())
        .map(|transaction| transaction.amount)
        .sum();

    CashFlowSummary::new(income, expenses)
}

fn dashboard_view(
    accounts: &[Account],
    selected: &Account,
    hide_balance: bool,
    summary: &CashFlowSummary,
    transactions: &[Transaction],
    local_offset: UtcOffset,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let recent = transactions.iter().take(RECENT_TRANSACTION_COUNT);

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            (page_header("Welcome back!", "Here's your complete financial overview"))

            (balance_card(selected, hide_balance))

            (accounts_view(accounts, &selected.id, hide_balance))

            (summary_cards(summary, transactions.len()))

            section class=(CARD_STYLE)
            {
                h2 class="text-xl font-semibold mb-4" { "Quick Actions" }

                div class="grid grid-cols-1 md:grid-cols-2 gap-4"
                {
                    a href=(endpoints::TRANSFER_VIEW) class={ (BUTTON_PRIMARY_STYLE) " text-center" }
                    {
                        "Send Money"
                    }
                    a href=(endpoints::TRANSACTIONS_VIEW) class={ (BUTTON_SECONDARY_STYLE) " text-center" }
                    {
                        "View All Transactions"
                    }
                }
            }

            section id="recent-transactions" class=(CARD_STYLE)
            {
                h2 class="text-xl font-semibold" { "Recent Transactions" }
                p class="text-sm text-gray-600 dark:text-gray-400 mb-4"
                {
                    "Your latest " (RECENT_TRANSACTION_COUNT) " transactions"
                }

                ul
                {
                    @for transaction in recent {
                        (transaction_list_item(transaction, local_offset))
                    }
                }
            }
        }
    };

    base("Dashboard", &[], &content)
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Query, State},
        http::StatusCode,
    };
    use scraper::Selector;

    use crate::{
        AppState,
        app_state::test_state::get_test_app_state,
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
    };

    use super::{DashboardQuery, DashboardState, get_dashboard_page};

    fn dashboard_state() -> DashboardState {
        let state: AppState = get_test_app_state();
        axum::extract::FromRef::from_ref(&state)
    }

    #[tokio::test]
    async fn shows_default_account_and_recent_transactions() {
        let state = dashboard_state();

        let response = get_dashboard_page(State(state.clone()), Query(DashboardQuery::default()))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let balance = html
            .select(&Selector::parse("[data-balance]").unwrap())
            .next()
            .expect("no balance");
        assert_eq!(balance.text().collect::<String>(), "$12,543.75");

        let recent_ids: Vec<_> = html
            .select(&Selector::parse("#recent-transactions [data-transaction-id]").unwrap())
            .filter_map(|element| element.value().attr("data-transaction-id"))
            .collect();
        let want_ids: Vec<_> = state
            .transactions
            .iter()
            .take(7)
            .map(|transaction| transaction.id.as_str())
            .collect();
        assert_eq!(recent_ids, want_ids);
    }

    #[tokio::test]
    async fn selects_account_from_query() {
        let response = get_dashboard_page(
            State(dashboard_state()),
            Query(DashboardQuery {
                account: Some("acc_2".to_owned()),
                hide_balance: false,
            }),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        let balance = html
            .select(&Selector::parse("[data-balance]").unwrap())
            .next()
            .expect("no balance");
        assert_eq!(balance.text().collect::<String>(), "$45,230.50");
    }

    #[tokio::test]
    async fn unknown_account_is_not_found() {
        let result = get_dashboard_page(
            State(dashboard_state()),
            Query(DashboardQuery {
                account: Some("acc_404".to_owned()),
                hide_balance: false,
            }),
        )
        .await;

        let response = axum::response::IntoResponse::into_response(result.unwrap_err());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn hides_balance() {
        let response = get_dashboard_page(
            State(dashboard_state()),
            Query(DashboardQuery {
                account: None,
                hide_balance: true,
            }),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(!text.contains("$12,543.75"));
        assert!(!text.contains("$45,230.50"));
    }
}
