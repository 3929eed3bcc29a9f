//! The page with every detail of a single transaction.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::UtcOffset;

use crate::{
    AppState, Error, endpoints,
    format::{format_date, format_time},
    html::{CARD_STYLE, PAGE_CONTAINER_STYLE, base, category_badge, link, transaction_status_badge},
    navigation::NavBar,
    timezone::local_offset_or_error,
};

use super::{
    core::Transaction,
    view::{amount_style, signed_amount_text},
};

#[derive(Debug, Clone)]
pub struct TransactionDetailState {
    pub transactions: Arc<Vec<Transaction>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionDetailState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transactions: state.transactions.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Show a single transaction, or the 404 page if there is no transaction with the ID.
pub async fn get_transaction_page(
    State(state): State<TransactionDetailState>,
    Path(transaction_id): Path<String>,
) -> Result<Response, Error> {
    let local_offset = local_offset_or_error(&state.local_timezone)?;
    let transaction = state
        .transactions
        .iter()
        .find(|transaction| transaction.id == transaction_id)
        .ok_or_else(|| {
            tracing::debug!("no transaction with the ID {transaction_id}");
            Error::NotFound
        })?;

    Ok(transaction_view(transaction, local_offset).into_response())
}

fn transaction_view(transaction: &Transaction, local_offset: UtcOffset) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let timestamp = transaction.timestamp.to_offset(local_offset);

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            (link(endpoints::TRANSACTIONS_VIEW, "Back to transactions"))

            section class={ (CARD_STYLE) " space-y-6" }
            {
                header class="flex justify-between items-start gap-4"
                {
                    div
                    {
                        h1 class="text-2xl font-bold" { (transaction.description) }
                        p class="text-sm text-gray-600 dark:text-gray-400"
                        {
                            (format_date(timestamp)) " at " (format_time(timestamp))
                        }
                    }

                    p class={ "text-3xl font-bold " (amount_style(transaction)) } data-amount
                    {
                        (signed_amount_text(transaction))
                    }
                }

                dl class="grid grid-cols-1 md:grid-cols-2 gap-4"
                {
                    (detail("Transaction ID", html! { (transaction.id) }))
                    (detail("Reference", html! { (transaction.reference.as_deref().unwrap_or("-")) }))
                    (detail("Category", category_badge(transaction.category)))
                    (detail("Status", transaction_status_badge(transaction.status)))
                    (detail("Merchant", html! { (transaction.merchant.as_deref().unwrap_or("-")) }))
                    (detail("Type", html! { (transaction.direction.as_str()) }))
                }
            }
        }
    };

    base("Transaction Details", &[], &content)
}

fn detail(term: &str, value: Markup) -> Markup {
    html! {
        div
        {
            dt class="text-sm text-gray-600 dark:text-gray-400" { (term) }
            dd class="font-medium capitalize" { (value) }
        }
    }
}
