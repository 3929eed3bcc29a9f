//! Summaries of transaction lists for the analytics and overview pages.
//!
//! Every function here is pure: it reads the transactions it is given and
//! returns a new projection, so the same input always gives the same output.

use std::collections::{BTreeMap, HashMap};

use time::{Date, UtcOffset};

use crate::format::format_short_date;

use super::core::{Category, Direction, Transaction};

/// The number of distinct days shown in the daily income/expense series.
pub const DAILY_WINDOW_DAYS: usize = 30;

/// The number of merchants shown in the top merchants ranking.
pub const TOP_MERCHANT_COUNT: usize = 8;

/// Round `amount` to two decimal places.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Money in, money out and what is left over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashFlowSummary {
    /// The sum of all credits.
    /// The sum of credits on the day.
    pub income: f64,
    /// The sum of all debits.
    /// The sum of debits on the day.
    pub expenses: f64,
    /// `income - expenses`.
    pub net: f64,
    /// `net / income * 100`, or exactly zero when there is no income.
    pub savings_rate: f64,
}

impl CashFlowSummary {
    /// Summarise `transactions` by direction.
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let (income, expenses) =
            transactions
                .into_iter()
                .fold((0.0, 0.0), |(income, expenses), transaction| {
                    match transaction.direction {
                        Direction::Credit => (income + transaction.amount, expenses),
                        Direction::Debit => (income, expenses + transaction.amount),
                    }
                });

        Self::new(income, expenses)
    }

    /// Build a summary from precomputed totals.
    pub fn new(income: f64, expenses: f64) -> Self {
        let net = income - expenses;

        Self {
            income,
            expenses,
            net,
            savings_rate: savings_rate(income, net),
        }
    }
}

/// The share of `income` that was kept, as a percentage.
///
/// Returns zero instead of NaN or infinity when there is no income.
pub fn savings_rate(income: f64, net: f64) -> f64 {
    if income > 0.0 {
        net / income * 100.0
    } else {
        0.0
    }
}

/// Sum the debits of `transactions` for each category, rounded to cents.
///
/// Categories without any debits are left out.
pub fn category_totals<'a, I>(transactions: I) -> HashMap<Category, f64>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals = HashMap::new();

    for transaction in transactions.into_iter().filter(|t| t.is_debit()) {
        *totals.entry(transaction.category).or_insert(0.0) += transaction.amount;
    }

    totals
        .into_iter()
        .map(|(category, total)| (category, round_cents(total)))
        .collect()
}

/// [category_totals] sorted from the largest total to the smallest.
pub fn sorted_category_totals<'a, I>(transactions: I) -> Vec<(Category, f64)>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: Vec<_> = category_totals(transactions).into_iter().collect();
    totals.sort_by(|(a_category, a_total), (b_category, b_total)| {
        b_total.total_cmp(a_total).then(a_category.cmp(b_category))
    });
    totals
}

/// The income and expenses for a single calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotal {
    /// The local calendar day.
    pub date: Date,
    /// Short month and day, e.g. "Dec 5".
    pub label: String,
    pub income: f64,
    pub expenses: f64,
}

/// Sum credits and debits per calendar day in the `local_offset` timezone.
///
/// Only the [DAILY_WINDOW_DAYS] most recent days that have transactions are
/// kept and they are returned oldest first.
pub fn daily_totals<'a, I>(transactions: I, local_offset: UtcOffset) -> Vec<DailyTotal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut days: BTreeMap<Date, (f64, f64)> = BTreeMap::new();

    for transaction in transactions {
        let date = transaction.timestamp.to_offset(local_offset).date();
        let (income, expenses) = days.entry(date).or_insert((0.0, 0.0));

        match transaction.direction {
            Direction::Credit => *income += transaction.amount,
            Direction::Debit => *expenses += transaction.amount,
        }
    }

    let skip = days.len().saturating_sub(DAILY_WINDOW_DAYS);

    days.into_iter()
        .skip(skip)
        .map(|(date, (income, expenses))| DailyTotal {
            date,
            label: format_short_date(date),
            income: round_cents(income),
            expenses: round_cents(expenses),
        })
        .collect()
}

/// The total spent at one merchant.
#[derive(Debug, Clone, PartialEq)]
pub struct MerchantTotal {
    /// The merchant name.
    pub name: String,
    /// The sum spent there, rounded to cents.
    pub total: f64,
}

/// Rank merchants by the total amount of their transactions.
///
/// Transactions without a merchant are ignored. At most `limit` merchants are
/// returned, largest total first, ties broken by name.
pub fn top_merchants<'a, I>(transactions: I, limit: usize) -> Vec<MerchantTotal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for transaction in transactions {
        if let Some(merchant) = transaction.merchant.as_deref() {
            *totals.entry(merchant).or_insert(0.0) += transaction.amount;
        }
    }

    let mut ranked: Vec<MerchantTotal> = totals
        .into_iter()
        .map(|(name, total)| MerchantTotal {
            name: name.to_owned(),
            total: round_cents(total),
        })
        .collect();

    ranked.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use time::{Duration, UtcOffset, macros::datetime};

    use crate::{
        data::generate_transactions,
        transaction::{
            core::{Category, Direction, Transaction},
            filter::{TransactionFilter, filter_transactions},
        },
    };

    use super::{
        CashFlowSummary, DAILY_WINDOW_DAYS, category_totals, daily_totals, round_cents,
        savings_rate, sorted_category_totals, top_merchants,
    };

    fn debit(amount: f64, category: Category, merchant: Option<&str>) -> Transaction {
        Transaction::build(amount, Direction::Debit, datetime!(2025-03-10 10:00 UTC))
            .category(category)
            .merchant(merchant)
            .finalize()
    }

    fn credit(amount: f64) -> Transaction {
        Transaction::build(amount, Direction::Credit, datetime!(2025-03-10 10:00 UTC))
            .description("Salary Deposit")
            .finalize()
    }

    #[test]
    fn summary_nets_income_and_expenses() {
        let transactions = vec![credit(1000.0), debit(250.0, Category::Food, None)];

        let summary = CashFlowSummary::from_transactions(&transactions);

        assert_eq!(summary.income, 1000.0);
        assert_eq!(summary.expenses, 250.0);
        assert_eq!(summary.net, 750.0);
        assert_eq!(summary.savings_rate, 75.0);
    }

    #[test]
    fn savings_rate_is_zero_without_income() {
        let transactions = vec![debit(250.0, Category::Food, None)];

        let summary = CashFlowSummary::from_transactions(&transactions);

        assert_eq!(summary.savings_rate, 0.0);
        assert_eq!(savings_rate(0.0, 0.0), 0.0);
        assert!(CashFlowSummary::from_transactions(&[]).savings_rate.is_finite());
    }

    #[test]
    fn category_totals_only_count_debits() {
        let transactions = vec![
            debit(10.005, Category::Food, None),
            debit(5.0, Category::Food, None),
            debit(20.0, Category::Bills, None),
            credit(3000.0),
        ];

        let totals = category_totals(&transactions);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&Category::Food], 15.01);
        assert_eq!(totals[&Category::Bills], 20.0);
        assert!(!totals.contains_key(&Category::Income));
    }

    #[test]
    fn sorted_category_totals_are_largest_first() {
        let transactions = vec![
            debit(10.0, Category::Food, None),
            debit(20.0, Category::Bills, None),
            debit(5.0, Category::Health, None),
        ];

        let totals = sorted_category_totals(&transactions);

        assert_eq!(
            totals,
            [
                (Category::Bills, 20.0),
                (Category::Food, 10.0),
                (Category::Health, 5.0)
            ]
        );
    }

    #[test]
    fn daily_totals_group_by_local_day() {
        let morning = Transaction::build(100.0, Direction::Credit, datetime!(2025-03-10 01:00 UTC))
            .finalize();
        let late = Transaction::build(40.0, Direction::Debit, datetime!(2025-03-10 23:00 UTC))
            .finalize();
        let transactions = vec![late, morning];

        let utc = daily_totals(&transactions, UtcOffset::UTC);
        assert_eq!(utc.len(), 1);
        assert_eq!(utc[0].label, "Mar 10");
        assert_eq!(utc[0].income, 100.0);
        assert_eq!(utc[0].expenses, 40.0);

        // In UTC+13 the late debit falls on the next day.
        let offset = UtcOffset::from_hms(13, 0, 0).unwrap();
        let local = daily_totals(&transactions, offset);
        assert_eq!(local.len(), 2);
        assert_eq!(local[0].label, "Mar 10");
        assert_eq!(local[1].label, "Mar 11");
        assert_eq!(local[1].expenses, 40.0);
    }

    #[test]
    fn daily_totals_keep_most_recent_days_in_order() {
        let start = datetime!(2025-01-01 12:00 UTC);
        let transactions: Vec<Transaction> = (0..45)
            .rev()
            .map(|day| {
                Transaction::build(1.0, Direction::Debit, start + Duration::days(day)).finalize()
            })
            .collect();

        let totals = daily_totals(&transactions, UtcOffset::UTC);

        assert_eq!(totals.len(), DAILY_WINDOW_DAYS);
        assert_eq!(totals[0].date, (start + Duration::days(15)).date());
        assert_eq!(totals[DAILY_WINDOW_DAYS - 1].date, (start + Duration::days(44)).date());
        assert!(totals.windows(2).all(|pair| pair[0].date < pair[1].date));
    }

    #[test]
    fn top_merchants_are_ranked_and_truncated() {
        let transactions = vec![
            debit(5.0, Category::Food, Some("Starbucks")),
            debit(7.0, Category::Food, Some("Starbucks")),
            debit(50.0, Category::Shopping, Some("Amazon")),
            debit(1.0, Category::Transport, Some("Uber")),
            debit(99.0, Category::Other, None),
        ];

        let ranked = top_merchants(&transactions, 2);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, "Amazon");
        assert_eq!(ranked[0].total, 50.0);
        assert_eq!(ranked[1].name, "Starbucks");
        assert_eq!(ranked[1].total, 12.0);
    }

    #[test]
    fn net_matches_filtered_credits_minus_debits() {
        let mut rng = StdRng::seed_from_u64(7);
        let transactions = generate_transactions(100, datetime!(2025-06-01 12:00 UTC), &mut rng);
        let filters = [
            TransactionFilter::default(),
            TransactionFilter {
                category: Some(Category::Food),
                ..Default::default()
            },
            TransactionFilter {
                category: Some(Category::Income),
                ..Default::default()
            },
            TransactionFilter {
                query: Some("a".to_owned()),
                ..Default::default()
            },
        ];

        for filter in filters {
            let filtered = filter_transactions(&transactions, &filter);
            let credits: f64 = filtered.iter().filter(|t| t.is_credit()).map(|t| t.amount).sum();
            let debits: f64 = filtered.iter().filter(|t| t.is_debit()).map(|t| t.amount).sum();

            let summary = CashFlowSummary::from_transactions(filtered.iter().copied());

            assert!((summary.net - (credits - debits)).abs() < 1e-9, "{filter:?}");
        }
    }

    #[test]
    fn category_totals_sum_to_total_debits() {
        let mut rng = StdRng::seed_from_u64(11);
        let transactions = generate_transactions(100, datetime!(2025-06-01 12:00 UTC), &mut rng);

        let category_sum: f64 = category_totals(&transactions).values().sum();
        let summary = CashFlowSummary::from_transactions(&transactions);

        // Each category total is rounded to cents, so allow half a cent per category.
        assert!((category_sum - round_cents(summary.expenses)).abs() <= 0.005 * 8.0);
    }
}
