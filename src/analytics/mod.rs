//! Charts and totals describing where the money goes.

mod charts;
mod page;

pub use page::get_analytics_page;
