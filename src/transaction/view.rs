//! HTML fragments for showing transactions, shared by the overview and history pages.

use maud::{Markup, html};
use time::UtcOffset;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    endpoints::{self, format_endpoint},
    format::{DEFAULT_CURRENCY, format_currency, format_date, format_time},
    html::{TABLE_CELL_STYLE, TABLE_ROW_STYLE, category_badge, transaction_status_badge},
};

use super::core::Transaction;

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

pub(crate) fn amount_style(transaction: &Transaction) -> &'static str {
    if transaction.is_credit() {
        "text-green-600 dark:text-green-400"
    } else {
        "text-gray-900 dark:text-white"
    }
}

/// The amount with a "+" for credits and "-" for debits, e.g. "-$12.50".
pub(crate) fn signed_amount_text(transaction: &Transaction) -> String {
    let sign = if transaction.is_credit() { "+" } else { "-" };

    format!("{sign}{}", format_currency(transaction.amount, DEFAULT_CURRENCY))
}

fn truncated_description(description: &str) -> String {
    let graphemes: Vec<&str> = description.graphemes(true).collect();

    if graphemes.len() <= MAX_DESCRIPTION_GRAPHEMES {
        description.to_owned()
    } else {
        format!("{}...", graphemes[..MAX_DESCRIPTION_GRAPHEMES - 3].concat())
    }
}

/// A compact row with the description, date, amount and status.
pub(crate) fn transaction_list_item(transaction: &Transaction, local_offset: UtcOffset) -> Markup {
    let url = format_endpoint(endpoints::TRANSACTION_VIEW, &transaction.id);
    let timestamp = transaction.timestamp.to_offset(local_offset);

    html! {
        li
        {
            a
                href=(url)
                class="flex items-center justify-between gap-4 py-4 px-4 rounded-lg
                    border-b border-gray-200 dark:border-gray-700
                    hover:bg-gray-100 dark:hover:bg-gray-700"
                data-transaction-id=(transaction.id)
            {
                div class="flex-1 min-w-0"
                {
                    p class="font-semibold truncate" title=(transaction.description)
                    {
                        (transaction.description)
                    }
                    p class="text-sm text-gray-600 dark:text-gray-400" { (format_date(timestamp)) }
                }

                div class="text-right"
                {
                    p class={ "font-bold text-lg " (amount_style(transaction)) }
                    {
                        (signed_amount_text(transaction))
                    }
                    (transaction_status_badge(transaction.status))
                }
            }
        }
    }
}

/// A row in the transaction history table.
pub(crate) fn transaction_table_row(transaction: &Transaction, local_offset: UtcOffset) -> Markup {
    let url = format_endpoint(endpoints::TRANSACTION_VIEW, &transaction.id);
    let timestamp = transaction.timestamp.to_offset(local_offset);

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE)
            {
                p { (format_date(timestamp)) }
                p class="text-xs text-gray-500" { (format_time(timestamp)) }
            }
            td class=(TABLE_CELL_STYLE)
            {
                a href=(url) class="font-medium hover:underline" title=(transaction.description)
                {
                    (truncated_description(&transaction.description))
                }
                @if let Some(reference) = &transaction.reference {
                    p class="text-xs text-gray-500" { (reference) }
                }
            }
            td class=(TABLE_CELL_STYLE) { (category_badge(transaction.category)) }
            td class=(TABLE_CELL_STYLE) { (transaction_status_badge(transaction.status)) }
            td class={ (TABLE_CELL_STYLE) " text-right font-semibold " (amount_style(transaction)) }
            {
                (signed_amount_text(transaction))
            }
        }
    }
}
