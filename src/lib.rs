//! Pocketbank is a demo banking web app for a single user.
//!
//! It serves an account overview, a searchable transaction history, spending
//! analytics, a step by step transfer wizard, identity document verification
//! and security settings. All data is generated in memory at start-up and the
//! server renders HTML directly, with htmx handling the partial page updates.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod account;
mod alert;
mod analytics;
mod app_state;
mod dashboard;
mod data;
mod endpoints;
mod format;
mod html;
mod internal_server_error;
mod kyc;
mod logging;
mod navigation;
mod not_found;
mod pagination;
mod routing;
mod security;
mod timezone;
mod transaction;
mod transfer;

#[cfg(test)]
mod test_utils;

pub use account::{Account, AccountType};
pub use app_state::{AppState, SimulationConfig};
pub use data::{generate_accounts, generate_recipients, generate_transactions};
pub use kyc::{KycError, VerificationStatus};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use security::SecurityError;
pub use timezone::get_local_offset;
pub use transaction::{Category, Direction, Transaction, TransactionBuilder, TransactionStatus};
pub use transfer::{
    AuthorizationDecision, FixedAuthorizer, RandomAuthorizer, Stage, TransferAuthorizer,
    TransferError, TransferRecipient, TransferRequest,
};

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the ID in the
    /// URL is correct.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A lock around shared state was poisoned by a panicking thread.
    #[error("could not acquire the lock on shared state")]
    LockError,

    /// The transfer wizard rejected an action.
    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// A document action was rejected.
    #[error(transparent)]
    Kyc(#[from] KycError),

    /// A security settings action was rejected.
    #[error(transparent)]
    Security(#[from] SecurityError),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezone(timezone) => InternalServerError::new(
                "Invalid Timezone Settings",
                &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            )
            .into_response(),
            Error::LockError => InternalServerError::default().into_response(),
            // Rejected user actions on a page load are shown the same way as on an htmx request.
            error @ (Error::Transfer(_) | Error::Kyc(_) | Error::Security(_)) => {
                error.into_alert_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert fragment for htmx requests.
    pub(crate) fn into_alert_response(self) -> Response {
        let (status, title, details) = match self {
            Error::Transfer(
                error @ (TransferError::Busy
                | TransferError::StaleTicket
                | TransferError::WrongStage { .. }),
            ) => (
                StatusCode::CONFLICT,
                "Could not update transfer",
                format!("{error}. Refresh the page to see the current transfer."),
            ),
            Error::Transfer(error @ (TransferError::InvalidAmount | TransferError::InvalidPin)) => {
                (StatusCode::BAD_REQUEST, "Invalid transfer details", error.to_string())
            }
            Error::Transfer(
                error @ (TransferError::UnknownRecipient(_) | TransferError::UnknownAccount(_)),
            ) => (StatusCode::NOT_FOUND, "Could not update transfer", error.to_string()),
            Error::Kyc(error @ KycError::UploadInProgress) => (
                StatusCode::CONFLICT,
                "Upload in progress",
                format!("{error}. Wait for it to finish or cancel it first."),
            ),
            Error::Kyc(error @ KycError::UnknownDocument(_)) => {
                (StatusCode::NOT_FOUND, "Could not find document", error.to_string())
            }
            Error::Kyc(error) => (
                StatusCode::CONFLICT,
                "Could not update document",
                error.to_string(),
            ),
            Error::Security(error @ SecurityError::UnknownDevice(_)) => (
                StatusCode::NOT_FOUND,
                "Could not remove device",
                format!("{error}. Try refreshing the page to see if it was already removed."),
            ),
            Error::Security(error @ SecurityError::CurrentDevice) => {
                (StatusCode::BAD_REQUEST, "Could not remove device", error.to_string())
            }
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                "Not found",
                "The requested item could not be found.".to_owned(),
            ),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                )
            }
        };

        Alert::error(title, &details).into_response_with_status(status)
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{
        Error,
        kyc::KycError,
        security::SecurityError,
        transfer::{Stage, TransferError},
    };

    #[test]
    fn rejected_transfer_events_are_conflicts() {
        for error in [
            TransferError::Busy,
            TransferError::StaleTicket,
            TransferError::WrongStage {
                event: "confirm",
                stage: Stage::Recipient,
            },
        ] {
            let response = Error::Transfer(error).into_alert_response();

            assert_eq!(response.status(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn invalid_input_is_bad_request() {
        assert_eq!(
            Error::Transfer(TransferError::InvalidPin)
                .into_alert_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Security(SecurityError::CurrentDevice)
                .into_alert_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn unknown_items_are_not_found() {
        assert_eq!(
            Error::Kyc(KycError::UnknownDocument("passport".to_owned()))
                .into_alert_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn lock_error_is_internal_server_error() {
        assert_eq!(
            Error::LockError.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::LockError.into_alert_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
