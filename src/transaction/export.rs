//! Download the transaction history as a CSV file.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::response::Attachment;
use serde::Serialize;
use time::{UtcOffset, format_description::well_known::Rfc3339};

use crate::{Error, internal_server_error::InternalServerError, timezone::local_offset_or_error};

use super::{
    core::Transaction,
    filter::filter_transactions,
    transactions_page::{TransactionsQuery, TransactionsViewState},
};

const EXPORT_FILE_NAME: &str = "transactions.csv";

/// Written separately so an empty export still has a header.
const CSV_HEADER: [&str; 9] = [
    "id",
    "date",
    "description",
    "category",
    "type",
    "amount",
    "status",
    "merchant",
    "reference",
];

/// One line of the exported CSV file.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    date: String,
    description: &'a str,
    category: &'a str,
    #[serde(rename = "type")]
    direction: &'a str,
    amount: String,
    status: &'a str,
    merchant: &'a str,
    reference: &'a str,
}

impl<'a> CsvRow<'a> {
    fn new(transaction: &'a Transaction, local_offset: UtcOffset) -> Self {
        let timestamp = transaction.timestamp.to_offset(local_offset);

        Self {
            id: &transaction.id,
            date: timestamp
                .format(&Rfc3339)
                .unwrap_or_else(|_| timestamp.to_string()),
            description: &transaction.description,
            category: transaction.category.as_str(),
            direction: transaction.direction.as_str(),
            amount: format!("{:.2}", transaction.signed_amount()),
            status: transaction.status.as_str(),
            merchant: transaction.merchant.as_deref().unwrap_or_default(),
            reference: transaction.reference.as_deref().unwrap_or_default(),
        }
    }
}

/// Write `transactions` as CSV with a header row.
///
/// Amounts are signed, so debits are negative.
fn write_csv<'a, I>(transactions: I, local_offset: UtcOffset) -> Result<Vec<u8>, csv::Error>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for transaction in transactions {
        writer.serialize(CsvRow::new(transaction, local_offset))?;
    }

    writer
        .into_inner()
        .map_err(|error| csv::Error::from(error.into_error()))
}

/// Download the transactions that match the same filters as the transactions page.
pub async fn export_transactions(
    State(state): State<TransactionsViewState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let local_offset = local_offset_or_error(&state.local_timezone)?;
    let filtered = filter_transactions(&state.transactions, &query.filter());

    match write_csv(filtered.iter().copied(), local_offset) {
        Ok(bytes) => {
            tracing::info!("exporting {} transactions", filtered.len());

            Ok(Attachment::new(bytes)
                .filename(EXPORT_FILE_NAME)
                .content_type("text/csv")
                .into_response())
        }
        Err(error) => {
            tracing::error!("could not write transactions CSV: {error}");
            Ok(InternalServerError::new(
                "Export Failed",
                "The transactions could not be written to a CSV file. Try again later.",
            )
            .into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::{FromRef, Query, State};

    use crate::{
        app_state::test_state::get_test_app_state,
        test_utils::{assert_content_type, assert_status_ok, header_value},
        transaction::{Category, transactions_page::{TransactionsQuery, TransactionsViewState}},
    };

    use super::export_transactions;

    async fn export(query: TransactionsQuery) -> (axum::response::Response, String) {
        let state = TransactionsViewState::from_ref(&get_test_app_state());
        let response = export_transactions(State(state), Query(query)).await.unwrap();
        let (parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

        (
            axum::response::Response::from_parts(parts, axum::body::Body::empty()),
            String::from_utf8(bytes.to_vec()).unwrap(),
        )
    }

    #[tokio::test]
    async fn exports_every_transaction_as_attachment() {
        let (response, body) = export(TransactionsQuery::default()).await;

        assert_status_ok(&response);
        assert_content_type(&response, "text/csv");
        assert!(header_value(&response, "content-disposition").contains("transactions.csv"));
        let mut lines = body.lines();
        assert_eq!(
            lines.next(),
            Some("id,date,description,category,type,amount,status,merchant,reference")
        );
        assert_eq!(lines.count(), 100);
    }

    #[tokio::test]
    async fn export_uses_page_filters() {
        let state = TransactionsViewState::from_ref(&get_test_app_state());
        let food_count = state
            .transactions
            .iter()
            .filter(|transaction| transaction.category == Category::Food)
            .count();

        let (_, body) = export(TransactionsQuery {
            category: Some("Food".to_owned()),
            ..Default::default()
        })
        .await;

        let rows: Vec<&str> = body.lines().skip(1).collect();
        assert_eq!(rows.len(), food_count);
        assert!(rows.iter().all(|row| row.contains(",Food,debit,-")));
    }

    #[tokio::test]
    async fn empty_export_still_has_header() {
        let (_, body) = export(TransactionsQuery {
            q: Some("no such transaction".to_owned()),
            ..Default::default()
        })
        .await;

        assert_eq!(
            body,
            "id,date,description,category,type,amount,status,merchant,reference\n"
        );
    }
}
