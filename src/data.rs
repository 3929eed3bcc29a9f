//! Synthetic data that stands in for a banking backend.
//!
//! The server generates everything once at start-up and keeps it for the life
//! of the process, so every page sees the same records.

use rand::{Rng, seq::SliceRandom};
use time::{Duration, OffsetDateTime, Time};

use crate::{
    account::{Account, AccountType},
    transaction::{Category, Direction, Transaction, TransactionStatus},
    transfer::TransferRecipient,
};

const MERCHANTS: [&str; 26] = [
    "Starbucks",
    "Amazon",
    "Uber",
    "Netflix",
    "Walmart",
    "Target",
    "Whole Foods",
    "Shell Gas Station",
    "Best Buy",
    "Spotify",
    "Google Play",
    "Apple Store",
    "DoorDash",
    "Lyft",
    "Airbnb",
    "Hotel.com",
    "Southwest Airlines",
    "Delta Airlines",
    "Chipotle",
    "McDonald's",
    "Nike",
    "Adidas",
    "Sephora",
    "Ulta Beauty",
    "Equinox Gym",
    "Planet Fitness",
];

const SPENDING_CATEGORIES: [Category; 6] = [
    Category::Food,
    Category::Transport,
    Category::Shopping,
    Category::Bills,
    Category::Entertainment,
    Category::Health,
];

/// The share of generated transactions that are salary deposits.
const INCOME_PROBABILITY: f64 = 0.15;
/// The share of generated transactions that did not complete.
const UNSETTLED_PROBABILITY: f64 = 0.05;
/// How far back generated transactions go.
const HISTORY_DAYS: i64 = 90;

/// Generate `count` random transactions from the last 90 days before `now`.
///
/// The transactions are sorted newest first. IDs and references are numbered
/// from one in generation order, so they are unique.
pub fn generate_transactions(
    count: usize,
    now: OffsetDateTime,
    rng: &mut impl Rng,
) -> Vec<Transaction> {
    let mut transactions: Vec<Transaction> = (1..=count)
        .map(|number| generate_transaction(number, now, rng))
        .collect();

    transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    tracing::debug!("generated {} transactions", transactions.len());

    transactions
}

fn generate_transaction(number: usize, now: OffsetDateTime, rng: &mut impl Rng) -> Transaction {
    let timestamp = random_timestamp(now, rng);
    let status = random_status(rng);
    let id = format!("txn_{number}");
    let reference = format!("REF-{number:06}");

    if rng.gen_bool(INCOME_PROBABILITY) {
        let amount = rng.gen_range(3000..8000) as f64;

        return Transaction::build(amount, Direction::Credit, timestamp)
            .id(&id)
            .description("Salary Deposit")
            .category(Category::Income)
            .status(status)
            .reference(Some(&reference))
            .finalize();
    }

    let amount = rng.gen_range(5..505) as f64;
    let description = pick(&MERCHANTS, rng);
    let merchant = pick(&MERCHANTS, rng);
    let category = SPENDING_CATEGORIES
        .choose(rng)
        .copied()
        .unwrap_or(Category::Other);

    Transaction::build(amount, Direction::Debit, timestamp)
        .id(&id)
        .description(description)
        .category(category)
        .status(status)
        .merchant(Some(merchant))
        .reference(Some(&reference))
        .finalize()
}

fn pick(items: &[&'static str], rng: &mut impl Rng) -> &'static str {
    items.choose(rng).copied().unwrap_or("Unknown")
}

fn random_timestamp(now: OffsetDateTime, rng: &mut impl Rng) -> OffsetDateTime {
    let days_back = rng.gen_range(0..HISTORY_DAYS);
    let time = Time::from_hms(rng.gen_range(0..24), rng.gen_range(0..60), 0)
        .unwrap_or(Time::MIDNIGHT);

    (now - Duration::days(days_back)).replace_time(time)
}

fn random_status(rng: &mut impl Rng) -> TransactionStatus {
    if !rng.gen_bool(UNSETTLED_PROBABILITY) {
        TransactionStatus::Completed
    } else if rng.gen_bool(0.5) {
        TransactionStatus::Pending
    } else {
        TransactionStatus::Failed
    }
}

/// The user's bank accounts.
pub fn generate_accounts() -> Vec<Account> {
    vec![
        Account {
            id: "acc_1".to_owned(),
            name: "Checking Account".to_owned(),
            account_type: AccountType::Checking,
            balance: 12543.75,
            currency: "USD".to_owned(),
            masked_number: "****5678".to_owned(),
            is_default: true,
        },
        Account {
            id: "acc_2".to_owned(),
            name: "Savings Account".to_owned(),
            account_type: AccountType::Savings,
            balance: 45230.50,
            currency: "USD".to_owned(),
            masked_number: "****9012".to_owned(),
            is_default: false,
        },
        Account {
            id: "acc_3".to_owned(),
            name: "Investment Account".to_owned(),
            account_type: AccountType::Investment,
            balance: 89450.25,
            currency: "USD".to_owned(),
            masked_number: "****3456".to_owned(),
            is_default: false,
        },
    ]
}

/// The user's saved transfer recipients.
pub fn generate_recipients() -> Vec<TransferRecipient> {
    [
        ("rec_1", "John Doe", "****1234", "Chase Bank"),
        ("rec_2", "Jane Smith", "****5678", "Bank of America"),
        ("rec_3", "Mike Johnson", "****9012", "Wells Fargo"),
    ]
    .into_iter()
    .map(|(id, name, masked_number, bank_name)| TransferRecipient {
        id: id.to_owned(),
        name: name.to_owned(),
        masked_number: masked_number.to_owned(),
        bank_name: bank_name.to_owned(),
        is_saved: true,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};
    use time::{Duration, macros::datetime};

    use crate::transaction::{Category, Direction};

    use super::{generate_accounts, generate_recipients, generate_transactions};

    #[test]
    fn generates_requested_count_newest_first() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = datetime!(2025-06-01 12:00 UTC);

        let transactions = generate_transactions(100, now, &mut rng);

        assert_eq!(transactions.len(), 100);
        assert!(
            transactions
                .windows(2)
                .all(|pair| pair[0].timestamp >= pair[1].timestamp)
        );
        let ids: HashSet<_> = transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn generated_transactions_are_well_formed() {
        let mut rng = StdRng::seed_from_u64(3);
        let now = datetime!(2025-06-01 12:00 UTC);

        for transaction in generate_transactions(200, now, &mut rng) {
            assert!(transaction.amount > 0.0);
            assert!(transaction.timestamp > now - Duration::days(91));
            assert!(transaction.reference.as_deref().unwrap().starts_with("REF-"));

            match transaction.direction {
                Direction::Credit => {
                    assert_eq!(transaction.category, Category::Income);
                    assert_eq!(transaction.description, "Salary Deposit");
                    assert!(transaction.merchant.is_none());
                    assert!((3000.0..8000.0).contains(&transaction.amount));
                }
                Direction::Debit => {
                    assert_ne!(transaction.category, Category::Income);
                    assert!(transaction.merchant.is_some());
                    assert!((5.0..505.0).contains(&transaction.amount));
                }
            }
        }
    }

    #[test]
    fn same_seed_gives_same_transactions() {
        let now = datetime!(2025-06-01 12:00 UTC);

        let first = generate_transactions(20, now, &mut StdRng::seed_from_u64(9));
        let second = generate_transactions(20, now, &mut StdRng::seed_from_u64(9));

        assert_eq!(first, second);
    }

    #[test]
    fn exactly_one_default_account() {
        let accounts = generate_accounts();

        assert_eq!(accounts.len(), 3);
        assert_eq!(accounts.iter().filter(|a| a.is_default).count(), 1);
    }

    #[test]
    fn recipients_include_john_doe() {
        let recipients = generate_recipients();

        assert!(recipients.iter().any(|r| r.name == "John Doe"));
        assert!(recipients.iter().all(|r| r.is_saved));
    }
}
