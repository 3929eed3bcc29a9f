//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/transactions/{transaction_id}', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The account overview page.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for searching and browsing transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page showing the details of a single transaction.
pub const TRANSACTION_VIEW: &str = "/transactions/{transaction_id}";
/// Download the filtered transactions as a CSV file.
pub const TRANSACTIONS_EXPORT: &str = "/transactions/export";
/// The page with spending charts.
pub const ANALYTICS_VIEW: &str = "/analytics";
/// The transfer wizard page.
pub const TRANSFER_VIEW: &str = "/transfer";
/// The identity verification page.
pub const VERIFICATION_VIEW: &str = "/verification";
/// The preview of a single identity document.
pub const DOCUMENT_VIEW: &str = "/verification/documents/{document_id}";
/// The security settings page.
pub const SECURITY_VIEW: &str = "/security";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// Choose the recipient of the transfer.
pub const TRANSFER_RECIPIENT: &str = "/api/transfer/recipient";
/// Filter the recipient list by name.
pub const TRANSFER_RECIPIENT_SEARCH: &str = "/api/transfer/recipients";
/// Choose the account the transfer is paid from.
pub const TRANSFER_ACCOUNT: &str = "/api/transfer/account";
/// Enter the amount and note of the transfer.
pub const TRANSFER_AMOUNT: &str = "/api/transfer/amount";
/// Go back one step in the transfer wizard.
pub const TRANSFER_BACK: &str = "/api/transfer/back";
/// Accept the reviewed transfer.
pub const TRANSFER_CONFIRM: &str = "/api/transfer/confirm";
/// Enter the PIN and submit the transfer.
pub const TRANSFER_PIN: &str = "/api/transfer/pin";
/// Start over after a transfer finished.
pub const TRANSFER_RESET: &str = "/api/transfer/reset";
/// Throw away the transfer in progress.
pub const TRANSFER_CANCEL: &str = "/api/transfer/cancel";
/// Poll the transfer wizard while a transfer is being processed.
pub const TRANSFER_STATUS: &str = "/api/transfer/status";

/// Upload an identity document.
pub const DOCUMENT_UPLOAD: &str = "/api/verification/documents/{document_id}/upload";
/// Resubmit a rejected identity document.
pub const DOCUMENT_RESUBMIT: &str = "/api/verification/documents/{document_id}/resubmit";
/// Cancel the running document upload.
pub const UPLOAD_CANCEL: &str = "/api/verification/upload/cancel";
/// Poll the document list while an upload runs.
pub const DOCUMENTS_STATUS: &str = "/api/verification/documents";

/// Change the account password.
pub const PASSWORD: &str = "/api/security/password";
/// Turn two-factor authentication on or off.
pub const TWO_FACTOR: &str = "/api/security/two_factor";
/// Turn biometric unlock on or off.
pub const BIOMETRIC: &str = "/api/security/biometric";
/// Sign out a single device.
pub const DEVICE: &str = "/api/security/devices/{device_id}";
/// Sign out every device except the current one.
pub const DEVICES: &str = "/api/security/devices";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/transactions/{transaction_id}', '{transaction_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::ROOT,
            endpoints::DASHBOARD_VIEW,
            endpoints::TRANSACTIONS_VIEW,
            endpoints::TRANSACTION_VIEW,
            endpoints::TRANSACTIONS_EXPORT,
            endpoints::ANALYTICS_VIEW,
            endpoints::TRANSFER_VIEW,
            endpoints::VERIFICATION_VIEW,
            endpoints::DOCUMENT_VIEW,
            endpoints::SECURITY_VIEW,
            endpoints::INTERNAL_ERROR_VIEW,
            endpoints::STATIC,
            endpoints::TRANSFER_RECIPIENT,
            endpoints::TRANSFER_RECIPIENT_SEARCH,
            endpoints::TRANSFER_ACCOUNT,
            endpoints::TRANSFER_AMOUNT,
            endpoints::TRANSFER_BACK,
            endpoints::TRANSFER_CONFIRM,
            endpoints::TRANSFER_PIN,
            endpoints::TRANSFER_RESET,
            endpoints::TRANSFER_CANCEL,
            endpoints::TRANSFER_STATUS,
            endpoints::DOCUMENT_UPLOAD,
            endpoints::DOCUMENT_RESUBMIT,
            endpoints::UPLOAD_CANCEL,
            endpoints::DOCUMENTS_STATUS,
            endpoints::PASSWORD,
            endpoints::TWO_FACTOR,
            endpoints::BIOMETRIC,
            endpoints::DEVICE,
            endpoints::DEVICES,
        ] {
            assert_endpoint_is_valid_uri(endpoint);
        }
    }

    #[test]
    fn formatted_endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::TRANSACTION_VIEW, "txn_1"));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::DOCUMENT_UPLOAD, "id_front"));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::DEVICE, "dev_2"));
    }

    #[test]
    fn format_endpoint_replaces_parameter() {
        assert_eq!(
            format_endpoint("/transactions/{transaction_id}", "txn_12"),
            "/transactions/txn_12"
        );
        assert_eq!(
            format_endpoint("/api/verification/documents/{document_id}/upload", "selfie"),
            "/api/verification/documents/selfie/upload"
        );
    }

    #[test]
    fn format_endpoint_without_parameter_is_unchanged() {
        assert_eq!(format_endpoint("/transactions", "txn_1"), "/transactions");
    }

    #[test]
    fn format_endpoint_with_unclosed_parameter_replaces_rest() {
        assert_eq!(format_endpoint("/transactions/{id", "txn_1"), "/transactions/txn_1");
    }
}
