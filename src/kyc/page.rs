//! The identity verification page, the document viewer and the document actions.

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::UtcOffset;

use crate::{
    AppState, Error, endpoints,
    endpoints::format_endpoint,
    format::{format_date, format_time},
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE, PAGE_CONTAINER_STYLE, base,
        link, loading_spinner, page_header, progress_bar, verification_badge,
    },
    navigation::NavBar,
    timezone::local_offset_or_error,
};

use super::{
    core::{Document, DocumentSet, VerificationStatus},
    desk::VerificationDesk,
};

const VERIFICATION_ID: &str = "verification";
const VERIFICATION_TARGET: &str = "#verification";
const ALERT_TARGET: &str = "#alert-container";

const SMALL_BUTTON_STYLE: &str = "px-3 py-1.5 text-sm rounded";

/// The state needed for the verification pages.
#[derive(Debug, Clone)]
pub struct VerificationState {
    pub desk: VerificationDesk,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for VerificationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            desk: state.verification_desk.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display the verification status and the documents.
pub async fn get_verification_page(
    State(state): State<VerificationState>,
) -> Result<Response, Error> {
    let local_offset = local_offset_or_error(&state.local_timezone)?;
    let documents = state.desk.documents()?;
    let nav_bar = NavBar::new(endpoints::VERIFICATION_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            (page_header("Identity Verification", "Verify your identity to unlock all features"))
            (verification_view(&documents, local_offset))
        }
    };

    Ok(base("Verification", &[], &content).into_response())
}

/// The verification fragment, polled while an upload runs.
pub async fn get_documents_status(
    State(state): State<VerificationState>,
) -> Result<Response, Error> {
    let local_offset = local_offset_or_error(&state.local_timezone)?;
    let documents = state.desk.documents()?;

    Ok(verification_view(&documents, local_offset).into_response())
}

/// Start the simulated upload of a document.
pub async fn upload_document(
    State(state): State<VerificationState>,
    Path(document_id): Path<String>,
) -> Result<Response, Error> {
    let local_offset = local_offset_or_error(&state.local_timezone)?;
    let (documents, _upload) = state.desk.start_upload(&document_id)?;

    Ok(verification_view(&documents, local_offset).into_response())
}

/// Stop the running upload.
pub async fn cancel_upload(State(state): State<VerificationState>) -> Result<Response, Error> {
    let local_offset = local_offset_or_error(&state.local_timezone)?;
    let documents = state.desk.cancel_upload()?;

    Ok(verification_view(&documents, local_offset).into_response())
}

/// Reset a rejected document so it can be uploaded again.
pub async fn resubmit_document(
    State(state): State<VerificationState>,
    Path(document_id): Path<String>,
) -> Result<Response, Error> {
    let local_offset = local_offset_or_error(&state.local_timezone)?;
    let documents = state.desk.resubmit(&document_id)?;

    Ok(verification_view(&documents, local_offset).into_response())
}

/// Show a single document, or the 404 page if there is no document with the ID.
pub async fn get_document_page(
    State(state): State<VerificationState>,
    Path(document_id): Path<String>,
) -> Result<Response, Error> {
    let local_offset = local_offset_or_error(&state.local_timezone)?;
    let documents = state.desk.documents()?;
    let document = documents.get(&document_id).ok_or_else(|| {
        tracing::debug!("no document with the ID {document_id}");
        Error::NotFound
    })?;
    let nav_bar = NavBar::new(endpoints::VERIFICATION_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            (link(endpoints::VERIFICATION_VIEW, "Back to verification"))

            section class={ (CARD_STYLE) " space-y-4" } data-document-id=(document.id)
            {
                header class="flex justify-between items-center"
                {
                    h1 class="text-2xl font-bold" { (document.name) }
                    (verification_badge(document.status))
                }

                div
                    class="flex items-center justify-center h-64 rounded border-2 border-dashed \
                        border-gray-300 dark:border-gray-600 text-gray-500 dark:text-gray-400"
                    data-preview
                {
                    @if document.uploaded_at.is_some() {
                        "Document preview"
                    } @else {
                        "No file uploaded yet"
                    }
                }

                @if let Some(uploaded_at) = document.uploaded_at {
                    p class="text-sm text-gray-600 dark:text-gray-400"
                    {
                        @let uploaded_at = uploaded_at.to_offset(local_offset);
                        "Uploaded " (format_date(uploaded_at)) " at " (format_time(uploaded_at))
                    }
                }

                @if let Some(reason) = &document.rejection_reason {
                    p class="text-red-600 dark:text-red-400" { "Rejected: " (reason) }
                }
            }
        }
    };

    Ok(base(&document.name, &[], &content).into_response())
}

fn verification_view(documents: &DocumentSet, local_offset: UtcOffset) -> Markup {
    let total = documents.documents().len();
    let verified = documents.verified_count();
    let percent = if total > 0 {
        verified as f64 / total as f64 * 100.0
    } else {
        100.0
    };
    let overall = documents.overall_status();
    let uploading = documents.uploading();

    let polling = html! {
        @if uploading.is_some() {
            div
                hidden
                data-polling
                hx-get=(endpoints::DOCUMENTS_STATUS)
                hx-trigger="every 1s"
                hx-target=(VERIFICATION_TARGET)
                hx-swap="outerHTML"
            {}
        }
    };

    html! {
        div id=(VERIFICATION_ID) class="flex flex-col gap-6"
        {
            (polling)

            section class={ (CARD_STYLE) " space-y-3" }
            {
                div class="flex items-center justify-between"
                {
                    h2 class="text-lg font-semibold" { "Verification Status" }
                    span data-overall-status=(overall.as_str()) { (verification_badge(overall)) }
                }

                (progress_bar(percent))

                p class="text-sm text-gray-600 dark:text-gray-400" data-verified-count
                {
                    (verified) " of " (total) " documents verified"
                }

                (status_message(overall))
            }

            section class={ (CARD_STYLE) " space-y-3" }
            {
                h2 class="text-lg font-semibold" { "Required Documents" }

                ul id="documents" class="divide-y divide-gray-200 dark:divide-gray-700"
                {
                    @for document in documents.documents() {
                        (document_row(document, uploading, local_offset))
                    }
                }
            }
        }
    }
}

fn status_message(overall: VerificationStatus) -> Markup {
    let message = match overall {
        VerificationStatus::Verified => "Your identity is verified. All features are unlocked.",
        VerificationStatus::PendingReview => {
            "Almost there. One document is still waiting for review."
        }
        _ => "Upload the remaining documents to finish verifying your identity.",
    };

    html! {
        p { (message) }
    }
}

fn document_row(document: &Document, uploading: Option<&str>, local_offset: UtcOffset) -> Markup {
    let is_uploading = uploading == Some(document.id.as_str());
    let upload_blocked = uploading.is_some();

    html! {
        li
            class="flex flex-col md:flex-row md:items-center justify-between gap-3 py-4"
            data-document-id=(document.id)
            data-status=(document.status.as_str())
        {
            div class="space-y-1"
            {
                div class="flex items-center gap-2"
                {
                    p class="font-medium" { (document.name) }
                    (verification_badge(document.status))
                }

                @if let Some(uploaded_at) = document.uploaded_at {
                    p class="text-sm text-gray-600 dark:text-gray-400"
                    {
                        "Uploaded " (format_date(uploaded_at.to_offset(local_offset)))
                    }
                }

                @if let Some(reason) = &document.rejection_reason {
                    p class="text-sm text-red-600 dark:text-red-400" data-rejection-reason { (reason) }
                }
            }

            div class="flex items-center gap-3"
            {
                @if document.uploaded_at.is_some() {
                    (link(&format_endpoint(endpoints::DOCUMENT_VIEW, &document.id), "View"))
                }

                @if is_uploading {
                    span class="text-sm text-blue-600" data-uploading
                    {
                        (loading_spinner()) "Uploading..."
                    }
                    (document_button(endpoints::UPLOAD_CANCEL, "Cancel", BUTTON_SECONDARY_STYLE, false))
                } @else if document.status == VerificationStatus::NotStarted {
                    (document_button(
                        &format_endpoint(endpoints::DOCUMENT_UPLOAD, &document.id),
                        "Upload",
                        BUTTON_PRIMARY_STYLE,
                        upload_blocked
                    ))
                } @else if document.status == VerificationStatus::Rejected {
                    (document_button(
                        &format_endpoint(endpoints::DOCUMENT_RESUBMIT, &document.id),
                        "Resubmit",
                        BUTTON_PRIMARY_STYLE,
                        false
                    ))
                }
            }
        }
    }
}

fn document_button(endpoint: &str, text: &str, style: &str, disabled: bool) -> Markup {
    html! {
        div
        {
            button
                type="button"
                class={ (style) " " (SMALL_BUTTON_STYLE) }
                hx-post=(endpoint)
                hx-target=(VERIFICATION_TARGET)
                hx-swap="outerHTML"
                hx-target-error=(ALERT_TARGET)
                disabled[disabled]
            {
                (text)
            }
        }
    }
}
