//! Transaction history for the user's accounts.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Filtering and the summaries used by the overview and analytics pages
//! - View handlers for the history, detail and export endpoints

mod aggregation;
mod core;
mod detail_page;
mod export;
mod filter;
mod transactions_page;
mod view;

pub use aggregation::{
    CashFlowSummary, DailyTotal, MerchantTotal, TOP_MERCHANT_COUNT, daily_totals,
    sorted_category_totals, top_merchants,
};
pub use core::{Category, Direction, Transaction, TransactionBuilder, TransactionStatus};
pub use detail_page::get_transaction_page;
pub use export::export_transactions;
pub use transactions_page::get_transactions_page;
pub(crate) use view::transaction_list_item;
