//! Implements a struct that holds the state of the REST server.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use time::OffsetDateTime;

use crate::{
    account::Account,
    kyc::{DocumentSet, VerificationDesk, seed_documents},
    pagination::PaginationConfig,
    security::SecuritySettings,
    transaction::Transaction,
    transfer::{RandomAuthorizer, TransferAuthorizer, TransferDesk, TransferRecipient},
};

/// How long the simulated bank takes to respond and how often it says yes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// How long a submitted transfer waits before it is authorized.
    pub transfer_delay: Duration,
    /// How long a document upload takes.
    pub upload_delay: Duration,
    /// The chance that a transfer is approved, between zero and one.
    pub approval_probability: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            transfer_delay: Duration::from_secs(2),
            upload_delay: Duration::from_millis(1500),
            approval_probability: 0.9,
        }
    }
}

/// The state of the REST server.
///
/// The generated data never changes after start-up, so it is shared without a
/// lock. The transfer, document and security state are per session and sit
/// behind mutexes.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The transaction history, newest first.
    pub transactions: Arc<Vec<Transaction>>,

    /// The user's accounts.
    pub accounts: Arc<Vec<Account>>,

    /// The saved transfer recipients.
    pub recipients: Arc<Vec<TransferRecipient>>,

    /// The transfer wizard session.
    pub transfer_desk: TransferDesk,

    /// The identity documents.
    pub verification_desk: VerificationDesk,

    /// Password, sign-in options and devices.
    pub security: Arc<Mutex<SecuritySettings>>,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl AppState {
    /// Create a new [AppState] from the generated data.
    ///
    /// Transfers are approved at random with the probability set in `simulation`.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    pub fn new(
        transactions: Vec<Transaction>,
        accounts: Vec<Account>,
        recipients: Vec<TransferRecipient>,
        local_timezone: &str,
        pagination_config: PaginationConfig,
        simulation: SimulationConfig,
    ) -> Self {
        let authorizer = Arc::new(RandomAuthorizer::new(simulation.approval_probability));

        Self::with_authorizer(
            transactions,
            accounts,
            recipients,
            local_timezone,
            pagination_config,
            simulation,
            authorizer,
        )
    }

    /// Create a new [AppState] where transfers are decided by `authorizer`.
    pub fn with_authorizer(
        transactions: Vec<Transaction>,
        accounts: Vec<Account>,
        recipients: Vec<TransferRecipient>,
        local_timezone: &str,
        pagination_config: PaginationConfig,
        simulation: SimulationConfig,
        authorizer: Arc<dyn TransferAuthorizer>,
    ) -> Self {
        Self {
            transactions: Arc::new(transactions),
            accounts: Arc::new(accounts),
            recipients: Arc::new(recipients),
            transfer_desk: TransferDesk::new(authorizer, simulation.transfer_delay),
            verification_desk: VerificationDesk::new(
                DocumentSet::new(seed_documents()),
                simulation.upload_delay,
            ),
            security: Arc::new(Mutex::new(SecuritySettings::seed(OffsetDateTime::now_utc()))),
            local_timezone: local_timezone.to_owned(),
            pagination_config,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_state {
    use std::{sync::Arc, time::Duration};

    use rand::{SeedableRng, rngs::StdRng};
    use time::macros::datetime;

    use crate::{
        data::{generate_accounts, generate_recipients, generate_transactions},
        pagination::PaginationConfig,
        transfer::{AuthorizationDecision, FixedAuthorizer},
    };

    use super::{AppState, SimulationConfig};

    /// A state with 100 seeded transactions, no simulated delays and transfers
    /// that always succeed with the reference "TXN-TEST".
    pub(crate) fn get_test_app_state() -> AppState {
        let mut rng = StdRng::seed_from_u64(42);
        let transactions =
            generate_transactions(100, datetime!(2025-06-30 12:00 UTC), &mut rng);

        AppState::with_authorizer(
            transactions,
            generate_accounts(),
            generate_recipients(),
            "Etc/UTC",
            PaginationConfig::default(),
            SimulationConfig {
                transfer_delay: Duration::ZERO,
                upload_delay: Duration::ZERO,
                approval_probability: 1.0,
            },
            Arc::new(FixedAuthorizer(AuthorizationDecision::Approved {
                reference: "TXN-TEST".to_owned(),
            })),
        )
    }
}
