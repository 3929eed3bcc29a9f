//! The shared transfer session and the background authorization of transfers.

use std::{
    fmt::Debug,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use time::OffsetDateTime;
use tokio::task::JoinHandle;

use crate::Error;

use super::{
    authorizer::{TransferAuthorizer, TransferRequest},
    core::{AuthorizationDecision, ProcessingTicket, TransferError, TransferEvent, TransferSession},
};

/// Holds the user's transfer session and sends submitted transfers for
/// authorization.
///
/// Cloning a desk gives another handle to the same session.
#[derive(Clone)]
pub struct TransferDesk {
    session: Arc<Mutex<TransferSession>>,
    authorizer: Arc<dyn TransferAuthorizer>,
    settlement_delay: Duration,
}

impl Debug for TransferDesk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferDesk")
            .field("session", &self.session)
            .field("settlement_delay", &self.settlement_delay)
            .finish_non_exhaustive()
    }
}

impl TransferDesk {
    /// Create a desk with a fresh session.
    ///
    /// Submitted transfers wait `settlement_delay` before `authorizer` is asked
    /// for a decision.
    pub fn new(authorizer: Arc<dyn TransferAuthorizer>, settlement_delay: Duration) -> Self {
        Self {
            session: Arc::new(Mutex::new(TransferSession::new())),
            authorizer,
            settlement_delay,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, TransferSession>, Error> {
        self.session
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire transfer session lock: {error}"))
            .map_err(|_| Error::LockError)
    }

    /// A copy of the current session.
    pub fn session(&self) -> Result<TransferSession, Error> {
        Ok(self.lock()?.clone())
    }

    /// Apply `event` to the shared session and return the new session.
    ///
    /// # Errors
    ///
    /// Returns [Error::Transfer] if the session rejected the event, in which
    /// case the session is unchanged, or [Error::LockError] if the lock is
    /// poisoned.
    pub fn apply(&self, event: TransferEvent) -> Result<TransferSession, Error> {
        let mut session = self.lock()?;
        let event_name = event.name();

        match session.apply(event) {
            Ok(next) => {
                tracing::debug!(
                    "transfer moved from {} to {} after \"{event_name}\"",
                    session.stage(),
                    next.stage()
                );
                *session = next.clone();
                Ok(next)
            }
            Err(error) => {
                tracing::warn!("rejected attempt to {event_name}: {error}");
                Err(error.into())
            }
        }
    }

    /// Submit `pin` and start authorizing the transfer in the background.
    ///
    /// The returned session is the one in the processing state. The handle
    /// completes once the authorization result has been applied or discarded.
    ///
    /// # Errors
    ///
    /// Returns [Error::Transfer] if the PIN was rejected.
    pub fn submit_pin(&self, pin: String) -> Result<(TransferSession, JoinHandle<()>), Error> {
        let session = self.apply(TransferEvent::SubmitPin(pin))?;
        let ticket = session
            .processing_ticket()
            .ok_or(Error::Transfer(TransferError::StaleTicket))?;
        let request = TransferRequest {
            recipient_id: session
                .recipient()
                .map(|recipient| recipient.id.clone())
                .unwrap_or_default(),
            source_account_id: session.source_account_id().map(ToOwned::to_owned),
            amount: session.amount().unwrap_or_default(),
            submitted_at: OffsetDateTime::now_utc(),
        };

        let desk = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(desk.settlement_delay).await;
            let decision = desk.authorizer.authorize(&request);
            desk.resolve(ticket, decision);
        });

        Ok((session, handle))
    }

    fn resolve(&self, ticket: ProcessingTicket, decision: AuthorizationDecision) {
        match self.apply(TransferEvent::Resolve { ticket, decision }) {
            Ok(session) => tracing::info!("transfer finished with outcome {:?}", session.outcome()),
            Err(Error::Transfer(TransferError::StaleTicket)) => tracing::debug!(
                "discarded authorization result for abandoned transfer {}",
                ticket.generation()
            ),
            Err(error) => tracing::error!("could not apply authorization result: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use crate::{
        Error,
        transfer::{
            authorizer::FixedAuthorizer,
            core::{AuthorizationDecision, Stage, TransferError, TransferEvent, TransferRecipient},
        },
    };

    use super::TransferDesk;

    fn desk(decision: AuthorizationDecision, delay: Duration) -> TransferDesk {
        TransferDesk::new(Arc::new(FixedAuthorizer(decision)), delay)
    }

    fn approve() -> AuthorizationDecision {
        AuthorizationDecision::Approved {
            reference: "TXN-2025-000001".to_owned(),
        }
    }

    fn walk_to_auth(desk: &TransferDesk) {
        desk.apply(TransferEvent::SelectRecipient(TransferRecipient {
            id: "rec_1".to_owned(),
            name: "John Doe".to_owned(),
            masked_number: "****1234".to_owned(),
            bank_name: "Chase Bank".to_owned(),
            is_saved: true,
        }))
        .unwrap();
        desk.apply(TransferEvent::SubmitAmount {
            amount: "100.50".to_owned(),
            note: String::new(),
        })
        .unwrap();
        desk.apply(TransferEvent::Confirm).unwrap();
    }

    #[tokio::test]
    async fn rejected_event_leaves_session_unchanged() {
        let desk = desk(approve(), Duration::ZERO);
        let before = desk.session().unwrap();

        let result = desk.apply(TransferEvent::Confirm);

        assert!(matches!(
            result,
            Err(Error::Transfer(TransferError::WrongStage { .. }))
        ));
        assert_eq!(desk.session().unwrap(), before);
    }

    #[tokio::test]
    async fn submitted_transfer_settles() {
        let desk = desk(approve(), Duration::from_millis(10));
        walk_to_auth(&desk);

        let (session, handle) = desk.submit_pin("1234".to_owned()).unwrap();
        assert!(session.is_processing());
        assert!(desk.session().unwrap().is_processing());

        handle.await.unwrap();

        let session = desk.session().unwrap();
        assert_eq!(session.stage(), Stage::Success);
        assert!(!session.is_processing());
        assert_eq!(session.outcome(), Some(&approve()));
    }

    #[tokio::test]
    async fn declined_transfer_lands_on_error() {
        let desk = desk(
            AuthorizationDecision::Declined {
                reason: "no".to_owned(),
            },
            Duration::ZERO,
        );
        walk_to_auth(&desk);

        let (_, handle) = desk.submit_pin("1234".to_owned()).unwrap();
        handle.await.unwrap();

        assert_eq!(desk.session().unwrap().stage(), Stage::Error);
    }

    #[tokio::test]
    async fn abandoned_transfer_ignores_late_result() {
        let desk = desk(approve(), Duration::from_millis(20));
        walk_to_auth(&desk);

        let (_, handle) = desk.submit_pin("1234".to_owned()).unwrap();
        desk.apply(TransferEvent::Abandon).unwrap();
        handle.await.unwrap();

        let session = desk.session().unwrap();
        assert_eq!(session.stage(), Stage::Recipient);
        assert!(session.outcome().is_none());
        assert!(!session.is_processing());
    }

    #[tokio::test]
    async fn invalid_pin_does_not_start_processing() {
        let desk = desk(approve(), Duration::ZERO);
        walk_to_auth(&desk);

        let result = desk.submit_pin("12".to_owned());

        assert!(matches!(result, Err(Error::Transfer(TransferError::InvalidPin))));
        assert!(!desk.session().unwrap().is_processing());
    }
}
