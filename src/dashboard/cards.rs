//! Card components for the dashboard.

use maud::{Markup, html};

use crate::{
    account::Account,
    endpoints,
    format::{DEFAULT_CURRENCY, format_currency},
    html::{CARD_STYLE, badge, stat_card},
    transaction::CashFlowSummary,
};

const HIDDEN_BALANCE: &str = "••••••";

/// The large card with the balance of the selected account.
///
/// The eye button toggles `hide_balance` in the query string while keeping the
/// selected account.
pub(super) fn balance_card(account: &Account, hide_balance: bool) -> Markup {
    let balance = if hide_balance {
        HIDDEN_BALANCE.to_owned()
    } else {
        format_currency(account.balance, &account.currency)
    };
    let toggle_url = format!(
        "{}?account={}&hide_balance={}",
        endpoints::DASHBOARD_VIEW,
        account.id,
        !hide_balance
    );

    html! {
        section
            id="balance-card"
            class="rounded-lg p-6 shadow-xl text-white
                bg-gradient-to-br from-blue-500 via-indigo-500 to-purple-600"
        {
            div class="flex items-start justify-between"
            {
                div
                {
                    p class="text-white/80" { "Total Balance" }

                    div class="flex items-center gap-2 mt-4"
                    {
                        p class="text-5xl font-bold" data-balance { (balance) }

                        a
                            href=(toggle_url)
                            class="px-2 py-1 rounded hover:bg-white/20"
                            aria-label=(if hide_balance { "Show balance" } else { "Hide balance" })
                        {
                            (if hide_balance { "Show" } else { "Hide" })
                        }
                    }

                    p class="text-sm text-white/70 mt-3" { "Account: " (account.masked_number) }
                }

                span class="px-4 py-2 rounded-full bg-white/20 border border-white/30"
                {
                    (account.account_type)
                }
            }
        }
    }
}

/// A card per account that selects it when clicked.
pub(super) fn accounts_view(accounts: &[Account], selected_id: &str, hide_balance: bool) -> Markup {
    html! {
        section class=(CARD_STYLE)
        {
            h2 class="text-xl font-semibold mb-4" { "Your Accounts" }

            div class="grid grid-cols-1 md:grid-cols-3 gap-4"
            {
                @for account in accounts {
                    @let is_selected = account.id == selected_id;
                    @let url = format!(
                        "{}?account={}&hide_balance={hide_balance}",
                        endpoints::DASHBOARD_VIEW,
                        account.id
                    );

                    a
                        href=(url)
                        aria-current=[is_selected.then_some("true")]
                        class={ "p-6 rounded-xl border-2 text-left " (account_card_style(is_selected)) }
                    {
                        span class="text-sm font-medium text-gray-600 dark:text-gray-400"
                        {
                            (account.name)
                        }
                        @if account.is_default {
                            " " (badge("Default", "bg-blue-100 text-blue-800"))
                        }
                        span class="text-2xl font-bold mt-3 block"
                        {
                            @if hide_balance {
                                (HIDDEN_BALANCE)
                            } @else {
                                (format_currency(account.balance, &account.currency))
                            }
                        }
                        span class="text-xs text-gray-500 mt-3 block" { (account.masked_number) }
                    }
                }
            }
        }
    }
}

fn account_card_style(is_selected: bool) -> &'static str {
    if is_selected {
        "border-blue-500 bg-blue-50 dark:bg-blue-950/30 shadow-lg"
    } else {
        "border-gray-200 dark:border-gray-700 hover:border-blue-300"
    }
}

/// Income, expenses, savings rate and the number of transactions.
pub(super) fn summary_cards(summary: &CashFlowSummary, transaction_count: usize) -> Markup {
    let income = format!("+{}", format_currency(summary.income, DEFAULT_CURRENCY));
    let expenses = format!("-{}", format_currency(summary.expenses, DEFAULT_CURRENCY));
    let savings_rate = format!("{:.1}%", summary.savings_rate);

    html! {
        section class="grid grid-cols-1 md:grid-cols-4 gap-4"
        {
            (stat_card("Monthly Income", &income, None, "text-green-600 dark:text-green-400"))
            (stat_card("Monthly Expenses", &expenses, None, "text-red-600 dark:text-red-400"))
            (stat_card("Savings Rate", &savings_rate, None, "text-blue-600 dark:text-blue-400"))
            (stat_card(
                "Transactions",
                &transaction_count.to_string(),
                None,
                "text-purple-600 dark:text-purple-400"
            ))
        }
    }
}
