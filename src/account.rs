//! Bank accounts the user holds.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The kind of bank account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    /// An everyday spending account.
    Checking,
    /// An interest-bearing savings account.
    Savings,
    /// A brokerage or investment account.
    Investment,
}

impl AccountType {
    /// The display name, e.g. "Savings".
    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::Checking => "Checking",
            AccountType::Savings => "Savings",
            AccountType::Investment => "Investment",
        }
    }
}

impl Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bank account with its current balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier, e.g. "acc_1".
    pub id: String,
    /// The display name, e.g. "Checking Account".
    pub name: String,
    /// The kind of account.
    pub account_type: AccountType,
    /// The current balance in [Account::currency].
    pub balance: f64,
    /// ISO 4217 currency code, e.g. "USD".
    pub currency: String,
    /// The account number with all but the last four digits hidden, e.g. "****5678".
    pub masked_number: String,
    /// Whether this account is preselected for transfers and the overview.
    pub is_default: bool,
}

/// Get the default account, or the first account if none is marked default.
pub fn default_account(accounts: &[Account]) -> Option<&Account> {
    accounts
        .iter()
        .find(|account| account.is_default)
        .or_else(|| accounts.first())
}

/// Get the account with `id`.
pub fn find_account<'a>(accounts: &'a [Account], id: &str) -> Option<&'a Account> {
    accounts.iter().find(|account| account.id == id)
}
