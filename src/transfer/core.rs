//! The transfer wizard as a pure state machine.
//!
//! A [TransferSession] only changes through [TransferSession::apply], which
//! takes the current session and an event and returns either the next session
//! or the reason the event was rejected. Rejected events never modify the
//! session, so callers can keep showing the previous state along with the
//! error.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// MODELS
// ============================================================================

/// Someone the user can send money to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecipient {
    /// Unique identifier, e.g. "rec_1".
    pub id: String,
    /// The recipient's full name.
    pub name: String,
    /// The account number with all but the last four digits hidden.
    pub masked_number: String,
    /// The bank that holds the recipient's account.
    pub bank_name: String,
    /// Whether the recipient is in the user's saved contacts.
    pub is_saved: bool,
}

/// Find the recipients whose name contains `query`, ignoring case.
///
/// A blank query matches every recipient.
pub fn search_recipients<'a>(
    recipients: &'a [TransferRecipient],
    query: &str,
) -> Vec<&'a TransferRecipient> {
    let needle = query.trim().to_lowercase();

    recipients
        .iter()
        .filter(|recipient| recipient.name.to_lowercase().contains(&needle))
        .collect()
}

/// The steps of the transfer wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Choosing who to pay and which account to pay from.
    Recipient,
    /// Entering the amount and a note.
    Amount,
    /// Checking the details before sending.
    Review,
    /// Entering the PIN, then waiting for the authorizer.
    Auth,
    /// The transfer was approved.
    Success,
    /// The transfer was declined.
    Error,
}

impl Stage {
    /// The 1-based position of the stage in the progress indicator.
    ///
    /// Both outcomes share the final position.
    pub fn step_number(self) -> u8 {
        match self {
            Stage::Recipient => 1,
            Stage::Amount => 2,
            Stage::Review => 3,
            Stage::Auth => 4,
            Stage::Success | Stage::Error => 5,
        }
    }

    /// Whether the transfer has finished, one way or the other.
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Success | Stage::Error)
    }

    /// The lowercase name, e.g. "review".
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Recipient => "recipient",
            Stage::Amount => "amount",
            Stage::Review => "review",
            Stage::Auth => "auth",
            Stage::Success => "success",
            Stage::Error => "error",
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one submission of a transfer for authorization.
///
/// The result of an authorization is only accepted if the ticket still
/// matches the session, so a result that arrives after the user abandoned
/// the transfer is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessingTicket(u64);

impl ProcessingTicket {
    /// The wizard generation the ticket was issued in.
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// The answer from whoever authorizes transfers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorizationDecision {
    /// The transfer went through and can be traced with `reference`.
    Approved {
        /// The bank reference for the transfer, e.g. "TXN-2025-000042".
        reference: String,
    },
    /// The transfer was refused, `reason` is shown to the user.
    Declined {
        /// Why the transfer was refused.
        reason: String,
    },
}

/// Things the user (or the authorizer) can do to the wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferEvent {
    /// Pick who to send the money to.
    SelectRecipient(TransferRecipient),
    /// Pick the account the money comes from, by account ID.
    SelectAccount(String),
    /// Enter the amount to send and an optional note.
    SubmitAmount {
        /// The amount as typed.
        amount: String,
        /// The note for the recipient, blank for none.
        note: String,
    },
    /// Go back one step.
    Back,
    /// Accept the transfer details shown on the review step.
    Confirm,
    /// Enter the PIN to authorize the transfer.
    SubmitPin(String),
    /// Deliver the authorization result for a submitted transfer.
    Resolve {
        /// The submission the result belongs to.
        ticket: ProcessingTicket,
        /// Whether the transfer went through.
        decision: AuthorizationDecision,
    },
    /// Start a new transfer after the previous one finished.
    Reset,
    /// Throw away the current transfer, whatever step it is at.
    Abandon,
}

impl TransferEvent {
    /// A short name for the event, used in error messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            TransferEvent::SelectRecipient(_) => "select a recipient",
            TransferEvent::SelectAccount(_) => "select an account",
            TransferEvent::SubmitAmount { .. } => "enter an amount",
            TransferEvent::Back => "go back",
            TransferEvent::Confirm => "confirm the transfer",
            TransferEvent::SubmitPin(_) => "enter a PIN",
            TransferEvent::Resolve { .. } => "resolve the transfer",
            TransferEvent::Reset => "start a new transfer",
            TransferEvent::Abandon => "cancel the transfer",
        }
    }
}

/// Why an event was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransferError {
    /// The event does not apply to the current step.
    #[error("cannot {event} during the {stage} step")]
    WrongStage {
        /// The name of the rejected event.
        event: &'static str,
        /// The step the wizard was at.
        stage: Stage,
    },

    /// The amount was not a positive number.
    #[error("Please enter a valid amount")]
    InvalidAmount,

    /// The PIN was not exactly four digits.
    #[error("PIN must be 4 digits")]
    InvalidPin,

    /// The transfer is being authorized and cannot be changed.
    #[error("the transfer is being processed")]
    Busy,

    /// An authorization result arrived for a transfer that is no longer active.
    #[error("the authorization result belongs to a transfer that is no longer active")]
    StaleTicket,

    /// No recipient has the given ID.
    #[error("could not find the recipient \"{0}\"")]
    UnknownRecipient(String),

    /// No account has the given ID.
    #[error("could not find the account \"{0}\"")]
    UnknownAccount(String),
}

/// One run through the transfer wizard.
///
/// Use [TransferSession::new] to start and [TransferSession::apply] to move
/// between steps.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferSession {
    stage: Stage,
    recipient: Option<TransferRecipient>,
    source_account_id: Option<String>,
    amount_input: String,
    amount: Option<f64>,
    note: Option<String>,
    pin: String,
    processing: bool,
    generation: u64,
    outcome: Option<AuthorizationDecision>,
}

impl Default for TransferSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferSession {
    /// A blank session on the first step.
    pub fn new() -> Self {
        Self::with_generation(0)
    }

    fn with_generation(generation: u64) -> Self {
        Self {
            stage: Stage::Recipient,
            recipient: None,
            source_account_id: None,
            amount_input: String::new(),
            amount: None,
            note: None,
            pin: String::new(),
            processing: false,
            generation,
            outcome: None,
        }
    }

    /// The step the wizard is at.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The recipient, once one has been picked.
    pub fn recipient(&self) -> Option<&TransferRecipient> {
        self.recipient.as_ref()
    }

    /// The account chosen to send from, `None` means the default account.
    pub fn source_account_id(&self) -> Option<&str> {
        self.source_account_id.as_deref()
    }

    /// The amount as the user typed it.
    pub fn amount_input(&self) -> &str {
        &self.amount_input
    }

    /// The validated amount, set once the amount step has been passed.
    pub fn amount(&self) -> Option<f64> {
        self.amount
    }

    /// The note for the recipient, if one was entered.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// The PIN as entered, empty before the auth step.
    pub fn pin(&self) -> &str {
        &self.pin
    }

    /// Whether a submitted transfer is waiting for the authorizer.
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Counts how many times the wizard has been restarted.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The ticket for the submission being authorized, if any.
    pub fn processing_ticket(&self) -> Option<ProcessingTicket> {
        self.processing.then_some(ProcessingTicket(self.generation))
    }

    /// The authorization result, set on the success and error steps.
    pub fn outcome(&self) -> Option<&AuthorizationDecision> {
        self.outcome.as_ref()
    }

    /// Compute the session that results from `event`.
    ///
    /// # Errors
    ///
    /// Returns a [TransferError] and leaves `self` untouched if the event is
    /// not valid for the current step or its input does not validate.
    pub fn apply(&self, event: TransferEvent) -> Result<TransferSession, TransferError> {
        if self.processing
            && !matches!(
                event,
                TransferEvent::Resolve { .. } | TransferEvent::Abandon
            )
        {
            return Err(TransferError::Busy);
        }

        let wrong_stage = |event: &TransferEvent| TransferError::WrongStage {
            event: event.name(),
            stage: self.stage,
        };

        let mut next = self.clone();

        match (self.stage, event) {
            (Stage::Recipient, TransferEvent::SelectRecipient(recipient)) => {
                next.recipient = Some(recipient);
                next.stage = Stage::Amount;
            }
            (Stage::Amount, TransferEvent::SelectAccount(account_id)) => {
                next.source_account_id = Some(account_id);
            }
            (Stage::Amount, TransferEvent::SubmitAmount { amount, note }) => {
                let value = parse_amount(&amount).ok_or(TransferError::InvalidAmount)?;
                let note = note.trim();

                next.amount_input = amount.trim().to_owned();
                next.amount = Some(value);
                next.note = (!note.is_empty()).then(|| note.to_owned());
                next.stage = Stage::Review;
            }
            (Stage::Amount, TransferEvent::Back) => {
                next.recipient = None;
                next.amount = None;
                next.stage = Stage::Recipient;
            }
            (Stage::Review, TransferEvent::Confirm) => {
                next.stage = Stage::Auth;
            }
            (Stage::Review, TransferEvent::Back) => {
                next.amount = None;
                next.stage = Stage::Amount;
            }
            (Stage::Auth, TransferEvent::SubmitPin(pin)) => {
                if !is_valid_pin(&pin) {
                    return Err(TransferError::InvalidPin);
                }

                next.pin = pin;
                next.processing = true;
            }
            (Stage::Auth, TransferEvent::Back) => {
                next.pin.clear();
                next.stage = Stage::Review;
            }
            (_, TransferEvent::Resolve { ticket, decision }) => {
                if self.processing_ticket() != Some(ticket) {
                    return Err(TransferError::StaleTicket);
                }

                next.processing = false;
                next.stage = match decision {
                    AuthorizationDecision::Approved { .. } => Stage::Success,
                    AuthorizationDecision::Declined { .. } => Stage::Error,
                };
                next.outcome = Some(decision);
            }
            (Stage::Success | Stage::Error, TransferEvent::Reset) | (_, TransferEvent::Abandon) => {
                next = Self::with_generation(self.generation + 1);
            }
            (_, event) => return Err(wrong_stage(&event)),
        }

        Ok(next)
    }
}

/// Parse a user-entered amount, accepting only finite, strictly positive numbers.
pub fn parse_amount(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount > 0.0)
}

/// Whether `pin` is exactly four ASCII digits.
pub fn is_valid_pin(pin: &str) -> bool {
    pin.len() == 4 && pin.bytes().all(|byte| byte.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::{
        AuthorizationDecision, Stage, TransferError, TransferEvent, TransferRecipient,
        TransferSession, is_valid_pin, parse_amount, search_recipients,
    };

    fn john_doe() -> TransferRecipient {
        TransferRecipient {
            id: "rec_1".to_owned(),
            name: "John Doe".to_owned(),
            masked_number: "****1234".to_owned(),
            bank_name: "Chase Bank".to_owned(),
            is_saved: true,
        }
    }

    fn submit_amount(amount: &str) -> TransferEvent {
        TransferEvent::SubmitAmount {
            amount: amount.to_owned(),
            note: String::new(),
        }
    }

    fn approved() -> AuthorizationDecision {
        AuthorizationDecision::Approved {
            reference: "TXN-2025-123456".to_owned(),
        }
    }

    fn declined() -> AuthorizationDecision {
        AuthorizationDecision::Declined {
            reason: "Insufficient funds".to_owned(),
        }
    }

    #[track_caller]
    fn apply_all(events: Vec<TransferEvent>) -> TransferSession {
        events
            .into_iter()
            .fold(TransferSession::new(), |session, event| {
                session.apply(event).unwrap()
            })
    }

    fn at_auth() -> TransferSession {
        apply_all(vec![
            TransferEvent::SelectRecipient(john_doe()),
            submit_amount("100.50"),
            TransferEvent::Confirm,
        ])
    }

    fn processing() -> TransferSession {
        at_auth()
            .apply(TransferEvent::SubmitPin("1234".to_owned()))
            .unwrap()
    }

    #[test]
    fn new_session_starts_at_recipient() {
        let session = TransferSession::new();

        assert_eq!(session.stage(), Stage::Recipient);
        assert!(session.recipient().is_none());
        assert!(!session.is_processing());
    }

    #[test]
    fn selecting_recipient_moves_to_amount() {
        let session = TransferSession::new()
            .apply(TransferEvent::SelectRecipient(john_doe()))
            .unwrap();

        assert_eq!(session.stage(), Stage::Amount);
        assert_eq!(session.recipient().unwrap().name, "John Doe");
    }

    #[test]
    fn invalid_amounts_never_advance() {
        let session = apply_all(vec![TransferEvent::SelectRecipient(john_doe())]);

        for amount in ["", "   ", "0", "-5", "abc", "NaN", "inf", "1e400"] {
            let result = session.apply(submit_amount(amount));

            assert_eq!(result, Err(TransferError::InvalidAmount), "amount {amount:?}");
            assert_eq!(session.stage(), Stage::Amount);
        }
    }

    #[test]
    fn valid_amount_moves_to_review() {
        let session = apply_all(vec![TransferEvent::SelectRecipient(john_doe())])
            .apply(TransferEvent::SubmitAmount {
                amount: " 100.50 ".to_owned(),
                note: "  Dinner  ".to_owned(),
            })
            .unwrap();

        assert_eq!(session.stage(), Stage::Review);
        assert_eq!(session.amount(), Some(100.5));
        assert_eq!(session.amount_input(), "100.50");
        assert_eq!(session.note(), Some("Dinner"));
    }

    #[test]
    fn blank_note_is_none() {
        let session = apply_all(vec![
            TransferEvent::SelectRecipient(john_doe()),
            submit_amount("5"),
        ]);

        assert_eq!(session.note(), None);
    }

    #[test]
    fn back_from_amount_clears_recipient() {
        let session = apply_all(vec![TransferEvent::SelectRecipient(john_doe())])
            .apply(TransferEvent::Back)
            .unwrap();

        assert_eq!(session.stage(), Stage::Recipient);
        assert!(session.recipient().is_none());
    }

    #[test]
    fn back_walks_through_previous_steps() {
        let session = at_auth();

        let review = session.apply(TransferEvent::Back).unwrap();
        assert_eq!(review.stage(), Stage::Review);

        let amount = review.apply(TransferEvent::Back).unwrap();
        assert_eq!(amount.stage(), Stage::Amount);
        assert_eq!(amount.amount(), None);
        assert_eq!(amount.amount_input(), "100.50");
    }

    #[test]
    fn source_account_can_be_changed_on_amount_step() {
        let session = apply_all(vec![
            TransferEvent::SelectRecipient(john_doe()),
            TransferEvent::SelectAccount("acc_2".to_owned()),
        ]);

        assert_eq!(session.source_account_id(), Some("acc_2"));
        assert_eq!(session.stage(), Stage::Amount);
    }

    #[test]
    fn auth_is_only_reachable_from_review() {
        let events = || {
            vec![
                TransferEvent::SelectRecipient(john_doe()),
                TransferEvent::SelectAccount("acc_1".to_owned()),
                submit_amount("10"),
                TransferEvent::Confirm,
                TransferEvent::Back,
                TransferEvent::SubmitPin("1234".to_owned()),
                TransferEvent::Reset,
            ]
        };

        // Try every event from every reachable non-auth stage and check that
        // auth is only entered through Confirm on the review step.
        let mut frontier = vec![TransferSession::new()];
        let mut visited = Vec::new();

        while let Some(session) = frontier.pop() {
            if visited.contains(&session) {
                continue;
            }
            visited.push(session.clone());

            for event in events() {
                let is_confirm = event == TransferEvent::Confirm;
                if let Ok(next) = session.apply(event) {
                    if next.stage() == Stage::Auth && session.stage() != Stage::Auth {
                        assert_eq!(session.stage(), Stage::Review);
                        assert!(is_confirm);
                        assert!(session.amount().is_some());
                    }
                    if !next.stage().is_terminal() && !next.is_processing() {
                        frontier.push(next);
                    }
                }
            }
        }
    }

    #[test]
    fn events_for_other_steps_are_rejected() {
        let session = TransferSession::new();

        assert_eq!(
            session.apply(TransferEvent::Confirm),
            Err(TransferError::WrongStage {
                event: "confirm the transfer",
                stage: Stage::Recipient
            })
        );
        assert!(session.apply(submit_amount("10")).is_err());
        assert!(session.apply(TransferEvent::SubmitPin("1234".to_owned())).is_err());
        assert!(session.apply(TransferEvent::Reset).is_err());
    }

    #[test]
    fn pin_must_be_four_digits() {
        let session = at_auth();

        for pin in ["", "123", "12345", "12a4", "１２３４"] {
            assert_eq!(
                session.apply(TransferEvent::SubmitPin(pin.to_owned())),
                Err(TransferError::InvalidPin),
                "pin {pin:?}"
            );
        }
    }

    #[test]
    fn submitting_pin_starts_processing() {
        let session = processing();

        assert_eq!(session.stage(), Stage::Auth);
        assert!(session.is_processing());
        assert_eq!(session.pin(), "1234");
        assert!(session.processing_ticket().is_some());
    }

    #[test]
    fn processing_rejects_everything_but_resolve_and_abandon() {
        let session = processing();

        for event in [
            TransferEvent::Back,
            TransferEvent::Confirm,
            TransferEvent::SubmitPin("1234".to_owned()),
            TransferEvent::Reset,
        ] {
            assert_eq!(session.apply(event), Err(TransferError::Busy));
        }
    }

    #[test]
    fn resolve_reaches_exactly_one_outcome() {
        let session = processing();
        let ticket = session.processing_ticket().unwrap();

        let success = session
            .apply(TransferEvent::Resolve {
                ticket,
                decision: approved(),
            })
            .unwrap();
        let error = session
            .apply(TransferEvent::Resolve {
                ticket,
                decision: declined(),
            })
            .unwrap();

        assert_eq!(success.stage(), Stage::Success);
        assert_eq!(success.outcome(), Some(&approved()));
        assert!(!success.is_processing());
        assert_eq!(error.stage(), Stage::Error);
        assert_eq!(error.outcome(), Some(&declined()));
    }

    #[test]
    fn stale_ticket_is_rejected_after_abandon() {
        let session = processing();
        let ticket = session.processing_ticket().unwrap();

        let abandoned = session.apply(TransferEvent::Abandon).unwrap();
        let result = abandoned.apply(TransferEvent::Resolve {
            ticket,
            decision: approved(),
        });

        assert_eq!(result, Err(TransferError::StaleTicket));
        assert_eq!(abandoned.stage(), Stage::Recipient);
        assert_eq!(abandoned.generation(), session.generation() + 1);
    }

    #[test]
    fn ticket_cannot_resolve_twice() {
        let session = processing();
        let ticket = session.processing_ticket().unwrap();
        let resolved = session
            .apply(TransferEvent::Resolve {
                ticket,
                decision: approved(),
            })
            .unwrap();

        assert_eq!(
            resolved.apply(TransferEvent::Resolve {
                ticket,
                decision: declined()
            }),
            Err(TransferError::StaleTicket)
        );
    }

    #[test]
    fn reset_from_either_outcome_clears_everything() {
        for decision in [approved(), declined()] {
            let session = processing();
            let ticket = session.processing_ticket().unwrap();
            let finished = session
                .apply(TransferEvent::Resolve { ticket, decision })
                .unwrap();

            let reset = finished.apply(TransferEvent::Reset).unwrap();

            assert_eq!(reset.stage(), Stage::Recipient);
            assert_eq!(reset.amount_input(), "");
            assert_eq!(reset.amount(), None);
            assert_eq!(reset.pin(), "");
            assert_eq!(reset.note(), None);
            assert!(reset.recipient().is_none());
            assert!(reset.outcome().is_none());
        }
    }

    #[test]
    fn parses_amounts() {
        assert_eq!(parse_amount("100.50"), Some(100.5));
        assert_eq!(parse_amount(" 7 "), Some(7.0));
        assert_eq!(parse_amount("0.00"), None);
        assert_eq!(parse_amount("-1"), None);
    }

    #[test]
    fn validates_pins() {
        assert!(is_valid_pin("0000"));
        assert!(is_valid_pin("1234"));
        assert!(!is_valid_pin("123"));
        assert!(!is_valid_pin("abcd"));
    }

    #[test]
    fn searches_recipients_by_name() {
        let recipients = vec![
            john_doe(),
            TransferRecipient {
                id: "rec_2".to_owned(),
                name: "Jane Smith".to_owned(),
                masked_number: "****5678".to_owned(),
                bank_name: "Bank of America".to_owned(),
                is_saved: true,
            },
        ];

        let got: Vec<_> = search_recipients(&recipients, "SMI")
            .into_iter()
            .map(|r| r.id.as_str())
            .collect();

        assert_eq!(got, ["rec_2"]);
        assert_eq!(search_recipients(&recipients, "  ").len(), 2);
    }
}
