//! Narrowing a list of transactions down to the ones matching the user's search.

use super::core::{Category, Transaction, TransactionStatus};

/// The criteria a transaction must satisfy to be shown.
///
/// Unset criteria match everything, so `TransactionFilter::default()` keeps
/// every transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Case-insensitive text to look for in the description or reference.
    ///
    /// The text is matched as typed, surrounding whitespace included.
    pub query: Option<String>,
    /// Only keep transactions in this category.
    pub category: Option<Category>,
    /// Only keep transactions with this status.
    pub status: Option<TransactionStatus>,
}

impl TransactionFilter {
    /// The lowercase search text, or `None` if it is missing or empty.
    fn search_text(&self) -> Option<String> {
        self.query
            .as_deref()
            .filter(|query| !query.is_empty())
            .map(str::to_lowercase)
    }

    /// Whether `transaction` satisfies every active criterion.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        let needle = self.search_text();
        matches_text(transaction, needle.as_deref())
            && self
                .category
                .is_none_or(|category| transaction.category == category)
            && self.status.is_none_or(|status| transaction.status == status)
    }
}

fn matches_text(transaction: &Transaction, needle: Option<&str>) -> bool {
    let Some(needle) = needle else {
        return true;
    };

    transaction.description.to_lowercase().contains(needle)
        || transaction
            .reference
            .as_deref()
            .is_some_and(|reference| reference.to_lowercase().contains(needle))
}

/// Return the transactions matching `filter`, keeping their original order.
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    filter: &TransactionFilter,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|transaction| filter.matches(transaction))
        .collect()
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::transaction::core::{Category, Direction, Transaction, TransactionStatus};

    use super::{TransactionFilter, filter_transactions};

    fn transactions() -> Vec<Transaction> {
        let timestamp = datetime!(2025-03-01 12:00 UTC);

        vec![
            Transaction::build(12.0, Direction::Debit, timestamp)
                .id("txn_1")
                .description("Starbucks")
                .category(Category::Food)
                .reference(Some("REF-000001"))
                .finalize(),
            Transaction::build(4000.0, Direction::Credit, timestamp)
                .id("txn_2")
                .description("Salary Deposit")
                .category(Category::Income)
                .reference(Some("REF-000002"))
                .finalize(),
            Transaction::build(30.0, Direction::Debit, timestamp)
                .id("txn_3")
                .description("Uber")
                .category(Category::Transport)
                .status(TransactionStatus::Pending)
                .reference(Some("REF-000003"))
                .finalize(),
            Transaction::build(8.5, Direction::Debit, timestamp)
                .id("txn_4")
                .description("Chipotle")
                .category(Category::Food)
                .status(TransactionStatus::Failed)
                .finalize(),
        ]
    }

    fn ids(transactions: &[&Transaction]) -> Vec<String> {
        transactions.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn empty_filter_is_identity() {
        let transactions = transactions();
        let filter = TransactionFilter::default();

        let got = filter_transactions(&transactions, &filter);

        assert_eq!(ids(&got), ["txn_1", "txn_2", "txn_3", "txn_4"]);
    }

    #[test]
    fn empty_query_is_ignored() {
        let transactions = transactions();
        let filter = TransactionFilter {
            query: Some(String::new()),
            ..Default::default()
        };

        assert_eq!(filter_transactions(&transactions, &filter).len(), 4);
    }

    #[test]
    fn query_whitespace_is_part_of_the_match() {
        let transactions = transactions();
        let trailing = TransactionFilter {
            query: Some("deposit ".to_owned()),
            ..Default::default()
        };
        let inner = TransactionFilter {
            query: Some("salary d".to_owned()),
            ..Default::default()
        };

        assert!(filter_transactions(&transactions, &trailing).is_empty());
        assert_eq!(ids(&filter_transactions(&transactions, &inner)), ["txn_2"]);
    }

    #[test]
    fn query_matches_description_case_insensitively() {
        let transactions = transactions();
        let filter = TransactionFilter {
            query: Some("sALaRy".to_owned()),
            ..Default::default()
        };

        assert_eq!(ids(&filter_transactions(&transactions, &filter)), ["txn_2"]);
    }

    #[test]
    fn query_matches_reference() {
        let transactions = transactions();
        let filter = TransactionFilter {
            query: Some("ref-000003".to_owned()),
            ..Default::default()
        };

        assert_eq!(ids(&filter_transactions(&transactions, &filter)), ["txn_3"]);
    }

    #[test]
    fn query_without_reference_only_checks_description() {
        let transactions = transactions();
        let filter = TransactionFilter {
            query: Some("ref".to_owned()),
            ..Default::default()
        };

        assert_eq!(
            ids(&filter_transactions(&transactions, &filter)),
            ["txn_1", "txn_2", "txn_3"]
        );
    }

    #[test]
    fn all_criteria_must_match() {
        let transactions = transactions();
        let filter = TransactionFilter {
            query: None,
            category: Some(Category::Food),
            status: Some(TransactionStatus::Failed),
        };

        let got = filter_transactions(&transactions, &filter);

        assert_eq!(ids(&got), ["txn_4"]);
        assert!(got.iter().all(|transaction| filter.matches(transaction)));
    }
}
