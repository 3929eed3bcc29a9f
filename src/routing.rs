//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    analytics::get_analytics_page,
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    kyc::{
        cancel_upload, get_document_page, get_documents_status, get_verification_page,
        resubmit_document, upload_document,
    },
    not_found::get_404_not_found,
    security::{
        change_password, get_security_page, log_out_other_devices, remove_device,
        toggle_biometric, toggle_two_factor,
    },
    transaction::{export_transactions, get_transaction_page, get_transactions_page},
    transfer::{
        back, cancel_transfer, confirm_transfer, get_transfer_page, get_transfer_status,
        reset_transfer, search_recipient_list, select_account, select_recipient, submit_amount,
        submit_pin,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let pages = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(endpoints::TRANSACTIONS_EXPORT, get(export_transactions))
        .route(endpoints::TRANSACTION_VIEW, get(get_transaction_page))
        .route(endpoints::ANALYTICS_VIEW, get(get_analytics_page))
        .route(endpoints::TRANSFER_VIEW, get(get_transfer_page))
        .route(endpoints::VERIFICATION_VIEW, get(get_verification_page))
        .route(endpoints::DOCUMENT_VIEW, get(get_document_page))
        .route(endpoints::SECURITY_VIEW, get(get_security_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let transfer_routes = Router::new()
        .route(endpoints::TRANSFER_RECIPIENT, post(select_recipient))
        .route(endpoints::TRANSFER_RECIPIENT_SEARCH, get(search_recipient_list))
        .route(endpoints::TRANSFER_ACCOUNT, post(select_account))
        .route(endpoints::TRANSFER_AMOUNT, post(submit_amount))
        .route(endpoints::TRANSFER_BACK, post(back))
        .route(endpoints::TRANSFER_CONFIRM, post(confirm_transfer))
        .route(endpoints::TRANSFER_PIN, post(submit_pin))
        .route(endpoints::TRANSFER_RESET, post(reset_transfer))
        .route(endpoints::TRANSFER_CANCEL, post(cancel_transfer))
        .route(endpoints::TRANSFER_STATUS, get(get_transfer_status));

    let verification_routes = Router::new()
        .route(endpoints::DOCUMENT_UPLOAD, post(upload_document))
        .route(endpoints::DOCUMENT_RESUBMIT, post(resubmit_document))
        .route(endpoints::UPLOAD_CANCEL, post(cancel_upload))
        .route(endpoints::DOCUMENTS_STATUS, get(get_documents_status));

    let security_routes = Router::new()
        .route(endpoints::PASSWORD, post(change_password))
        .route(endpoints::TWO_FACTOR, post(toggle_two_factor))
        .route(endpoints::BIOMETRIC, post(toggle_biometric))
        .route(endpoints::DEVICE, delete(remove_device))
        .route(endpoints::DEVICES, post(log_out_other_devices));

    pages
        .merge(transfer_routes)
        .merge(verification_routes)
        .merge(security_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use scraper::{Html, Selector};

    use crate::{
        app_state::test_state::get_test_app_state,
        endpoints::{self, format_endpoint},
    };

    use super::build_router;

    fn test_server() -> TestServer {
        TestServer::new(build_router(get_test_app_state()))
    }

    #[tokio::test]
    async fn every_page_renders() {
        let server = test_server();

        for page in [
            endpoints::DASHBOARD_VIEW,
            endpoints::TRANSACTIONS_VIEW,
            endpoints::ANALYTICS_VIEW,
            endpoints::TRANSFER_VIEW,
            endpoints::VERIFICATION_VIEW,
            endpoints::SECURITY_VIEW,
        ] {
            let response = server.get(page).await;

            assert_eq!(response.status_code(), StatusCode::OK, "GET {page}");
            let html = Html::parse_document(&response.text());
            assert!(html.errors.is_empty(), "{page}: {:?}", html.errors);
        }
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = test_server().get("/nowhere").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn export_is_not_mistaken_for_a_transaction() {
        let response = test_server().get(endpoints::TRANSACTIONS_EXPORT).await;

        response.assert_status_ok();
        assert!(response.text().starts_with("id,date,description"));
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let response = test_server()
            .get(&format_endpoint(endpoints::TRANSACTION_VIEW, "txn_9999"))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn transfer_steps_share_one_session() {
        let server = test_server();

        server
            .post(endpoints::TRANSFER_RECIPIENT)
            .form(&[("recipient_id", "rec_3")])
            .await
            .assert_status_ok();
        let response = server
            .post(endpoints::TRANSFER_AMOUNT)
            .form(&[("amount", "25"), ("note", "")])
            .await;

        response.assert_status_ok();
        let html = Html::parse_fragment(&response.text());
        let total = html
            .select(&Selector::parse("[data-review-total]").unwrap())
            .next()
            .expect("not at the review step")
            .text()
            .collect::<String>();
        assert_eq!(total.trim(), "$25.00");

        let page = server.get(endpoints::TRANSFER_VIEW).await.text();
        assert!(page.contains("data-stage=\"review\""));
    }

    #[tokio::test]
    async fn rejected_transfer_event_is_conflict_alert() {
        let response = test_server().post(endpoints::TRANSFER_CONFIRM).await;

        response.assert_status(StatusCode::CONFLICT);
        assert!(response.text().contains("role=\"alert\""));
    }

    #[tokio::test]
    async fn removes_device_with_delete() {
        let server = test_server();

        server
            .delete(&format_endpoint(endpoints::DEVICE, "dev_3"))
            .await
            .assert_status_ok();

        let page = server.get(endpoints::SECURITY_VIEW).await.text();
        assert!(!page.contains("data-device-id=\"dev_3\""));
    }
}
