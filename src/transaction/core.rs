//! Defines the core data models for transactions.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// ============================================================================
// MODELS
// ============================================================================

/// The spending category a transaction is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Groceries, restaurants and coffee.
    Food,
    /// Rideshares, fuel and public transport.
    Transport,
    /// Retail purchases.
    Shopping,
    /// Utilities, phone and subscriptions.
    Bills,
    /// Salary and other money coming in.
    Income,
    /// Streaming, cinema and events.
    Entertainment,
    /// Pharmacy, doctors and the gym.
    Health,
    /// Anything that fits nowhere else.
    Other,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Bills,
        Category::Income,
        Category::Entertainment,
        Category::Health,
        Category::Other,
    ];

    /// The capitalised name, e.g. "Food".
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Income => "Income",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Other => "Other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether money came into (credit) or left (debit) the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Money coming in.
    Credit,
    /// Money going out.
    Debit,
}

impl Direction {
    /// The lowercase name, "credit" or "debit".
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Credit => "credit",
            Direction::Debit => "debit",
        }
    }
}

/// The settlement state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// The money has moved.
    Completed,
    /// The bank has not settled it yet.
    Pending,
    /// The bank refused it.
    Failed,
}

impl TransactionStatus {
    /// Every status in display order.
    pub const ALL: [TransactionStatus; 3] = [
        TransactionStatus::Completed,
        TransactionStatus::Pending,
        TransactionStatus::Failed,
    ];

    /// The lowercase name used in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionStatus::Completed => "completed",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Failed => "failed",
        }
    }

    /// The capitalised name shown in badges.
    pub fn label(self) -> &'static str {
        match self {
            TransactionStatus::Completed => "Completed",
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Failed => "Failed",
        }
    }
}

/// A single movement of money on the user's account.
///
/// Transactions are generated in bulk at start-up and never modified afterwards.
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier, e.g. "txn_12".
    pub id: String,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The spending category.
    pub category: Category,
    /// The size of the transaction. Always non-negative, the sign is carried
    /// by [Transaction::direction].
    pub amount: f64,
    /// Whether the money came in or went out.
    pub direction: Direction,
    /// When the transaction happened.
    pub timestamp: OffsetDateTime,
    /// The settlement state.
    pub status: TransactionStatus,
    /// Where the money was spent, income has no merchant.
    pub merchant: Option<String>,
    /// The bank reference code, e.g. "REF-000012".
    pub reference: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: f64, direction: Direction, timestamp: OffsetDateTime) -> TransactionBuilder {
        TransactionBuilder {
            id: String::new(),
            description: "Transaction".to_owned(),
            category: match direction {
                Direction::Credit => Category::Income,
                Direction::Debit => Category::Other,
            },
            amount,
            direction,
            timestamp,
            status: TransactionStatus::Completed,
            merchant: None,
            reference: None,
        }
    }

    /// Whether money came into the account.
    pub fn is_credit(&self) -> bool {
        self.direction == Direction::Credit
    }

    /// Whether money left the account.
    pub fn is_debit(&self) -> bool {
        self.direction == Direction::Debit
    }

    /// The amount with the sign applied, positive for credits and negative for debits.
    pub fn signed_amount(&self) -> f64 {
        match self.direction {
            Direction::Credit => self.amount,
            Direction::Debit => -self.amount,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// # Examples
///
/// ```
/// use pocketbank::{Category, Direction, Transaction};
/// use time::macros::datetime;
///
/// let transaction = Transaction::build(12.5, Direction::Debit, datetime!(2025-01-15 9:30 UTC))
///     .id("txn_1")
///     .description("Starbucks")
///     .category(Category::Food)
///     .merchant(Some("Starbucks"))
///     .finalize();
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    id: String,
    description: String,
    category: Category,
    amount: f64,
    direction: Direction,
    timestamp: OffsetDateTime,
    status: TransactionStatus,
    merchant: Option<String>,
    reference: Option<String>,
}

impl TransactionBuilder {
    /// Set the unique identifier.
    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_owned();
        self
    }

    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category. Credits default to [Category::Income] and debits to [Category::Other].
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the status, [TransactionStatus::Completed] by default.
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the merchant.
    pub fn merchant(mut self, merchant: Option<&str>) -> Self {
        self.merchant = merchant.map(ToOwned::to_owned);
        self
    }

    /// Set the bank reference code.
    pub fn reference(mut self, reference: Option<&str>) -> Self {
        self.reference = reference.map(ToOwned::to_owned);
        self
    }

    /// Build the final [Transaction].
    ///
    /// Negative amounts are stored as their magnitude since the direction
    /// already says which way the money moved.
    pub fn finalize(self) -> Transaction {
        Transaction {
            id: self.id,
            description: self.description,
            category: self.category,
            amount: self.amount.abs(),
            direction: self.direction,
            timestamp: self.timestamp,
            status: self.status,
            merchant: self.merchant,
            reference: self.reference,
        }
    }
}
