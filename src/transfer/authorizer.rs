//! Deciding whether a submitted transfer goes through.

use rand::Rng;
use time::OffsetDateTime;

use super::core::AuthorizationDecision;

/// The details of a transfer sent for authorization.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    /// The ID of the recipient being paid.
    pub recipient_id: String,
    /// The account paying, `None` for the default account.
    pub source_account_id: Option<String>,
    /// How much to send.
    pub amount: f64,
    /// When the PIN was entered.
    pub submitted_at: OffsetDateTime,
}

/// Something that can approve or decline transfers.
///
/// The server only ships with [RandomAuthorizer]. A real deployment would
/// implement this trait with a call to the bank's payment API.
pub trait TransferAuthorizer: Send + Sync {
    /// Approve or decline `request`.
    fn authorize(&self, request: &TransferRequest) -> AuthorizationDecision;
}

/// Approves transfers at random.
///
/// This is a placeholder for a real payment backend, the approval rate has no
/// meaning beyond making both outcomes visible in the UI.
#[derive(Debug, Clone, Copy)]
pub struct RandomAuthorizer {
    approval_probability: f64,
}

impl RandomAuthorizer {
    /// Create an authorizer that approves with `approval_probability`, which
    /// is clamped to `[0, 1]`.
    pub fn new(approval_probability: f64) -> Self {
        Self {
            approval_probability: approval_probability.clamp(0.0, 1.0),
        }
    }
}

impl TransferAuthorizer for RandomAuthorizer {
    fn authorize(&self, request: &TransferRequest) -> AuthorizationDecision {
        let mut rng = rand::thread_rng();

        if rng.gen_bool(self.approval_probability) {
            AuthorizationDecision::Approved {
                reference: transfer_reference(request.submitted_at, rng.gen_range(0..1_000_000)),
            }
        } else {
            AuthorizationDecision::Declined {
                reason: "Unfortunately, the transfer could not be processed. \
                    Please try again or contact support."
                    .to_owned(),
            }
        }
    }
}

/// Always gives the same decision.
#[derive(Debug, Clone)]
pub struct FixedAuthorizer(pub AuthorizationDecision);

impl TransferAuthorizer for FixedAuthorizer {
    fn authorize(&self, _request: &TransferRequest) -> AuthorizationDecision {
        self.0.clone()
    }
}

/// A reference of the form "TXN-2025-004217".
pub fn transfer_reference(submitted_at: OffsetDateTime, serial: u32) -> String {
    format!("TXN-{}-{:06}", submitted_at.year(), serial % 1_000_000)
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::transfer::core::AuthorizationDecision;

    use super::{RandomAuthorizer, TransferAuthorizer, TransferRequest, transfer_reference};

    fn request() -> TransferRequest {
        TransferRequest {
            recipient_id: "rec_1".to_owned(),
            source_account_id: None,
            amount: 100.5,
            submitted_at: datetime!(2025-02-03 04:05 UTC),
        }
    }

    #[test]
    fn formats_reference() {
        assert_eq!(
            transfer_reference(datetime!(2024-12-15 10:00 UTC), 42),
            "TXN-2024-000042"
        );
    }

    #[test]
    fn certain_authorizer_always_approves() {
        let authorizer = RandomAuthorizer::new(1.0);

        for _ in 0..20 {
            match authorizer.authorize(&request()) {
                AuthorizationDecision::Approved { reference } => {
                    assert!(reference.starts_with("TXN-2025-"));
                    assert_eq!(reference.len(), "TXN-2025-000000".len());
                }
                decision => panic!("want approval, got {decision:?}"),
            }
        }
    }

    #[test]
    fn impossible_authorizer_always_declines() {
        let authorizer = RandomAuthorizer::new(-3.0);

        for _ in 0..20 {
            assert!(matches!(
                authorizer.authorize(&request()),
                AuthorizationDecision::Declined { .. }
            ));
        }
    }
}
