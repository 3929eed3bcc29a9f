//! Dashboard module
//!
//! Provides an overview page with the balance of the selected account, a
//! summary of income and spending and the most recent transactions.

mod cards;
mod handlers;

pub use handlers::get_dashboard_page;
