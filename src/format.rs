//! Locale-style formatting for amounts, dates and times shown in the UI.
//!
//! All output mimics the `en-US` locale so the same input always renders the
//! same text.

use numfmt::{Formatter, Precision};
use time::{Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

const DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month repr:short] [day padding:none], [year]");
const SHORT_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month repr:short] [day padding:none]");
const TIME_FORMAT: &[BorrowedFormatItem] =
    format_description!("[hour repr:12]:[minute] [period case:upper]");

/// The currency that transactions and transfers are shown in.
pub const DEFAULT_CURRENCY: &str = "USD";

/// The symbol to prefix amounts with for an ISO 4217 currency code.
///
/// Unknown codes fall back to the code followed by a space, e.g. "CHF ".
pub fn currency_symbol(currency_code: &str) -> String {
    match currency_code {
        "USD" => "$".to_owned(),
        "EUR" => "€".to_owned(),
        "GBP" => "£".to_owned(),
        "JPY" => "¥".to_owned(),
        "NZD" => "NZ$".to_owned(),
        "AUD" => "A$".to_owned(),
        code => format!("{code} "),
    }
}

/// Format `amount` with two decimal places and thousands separators, e.g.
/// `format_currency(-1234.5, "USD")` gives "-$1,234.50".
pub fn format_currency(amount: f64, currency_code: &str) -> String {
    let symbol = currency_symbol(currency_code);
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };

    format!("{sign}{}.{fraction:02}", format_whole(whole, &symbol))
}

fn format_whole(whole: u64, symbol: &str) -> String {
    // Zero is hardcoded as "0" by numfmt, so it never gets the prefix.
    if whole == 0 {
        return format!("{symbol}0");
    }

    match Formatter::currency(symbol) {
        Ok(formatter) => formatter
            .precision(Precision::Decimals(0))
            .fmt_string(whole as f64),
        Err(error) => {
            tracing::warn!("could not create currency formatter for {symbol:?}: {error:?}");
            format!("{symbol}{whole}")
        }
    }
}

/// Format a date time as a medium date, e.g. "Dec 15, 2024".
pub fn format_date(date_time: OffsetDateTime) -> String {
    format_calendar_date(date_time.date())
}

/// Format a calendar date as a medium date, e.g. "Dec 15, 2024".
pub fn format_calendar_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

/// Format a calendar date as a month and day, e.g. "Dec 5".
pub fn format_short_date(date: Date) -> String {
    date.format(SHORT_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Format the time of day with two-digit hours and minutes, e.g. "02:30 PM".
pub fn format_time(date_time: OffsetDateTime) -> String {
    date_time
        .time()
        .format(TIME_FORMAT)
        .unwrap_or_else(|_| date_time.time().to_string())
}
