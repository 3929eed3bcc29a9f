//! The transfer wizard page and the htmx endpoints that move it between steps.
//!
//! Every endpoint responds with the whole `#transfer-wizard` element so the
//! page always shows the stage stored in the session. Rejected actions are
//! returned as alerts, except for a bad amount or PIN which are shown next to
//! the input.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::{Account, default_account, find_account},
    endpoints,
    format::{DEFAULT_CURRENCY, format_currency},
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE, FORM_ERROR_STYLE,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, badge, base,
        loading_spinner, page_header, progress_bar,
    },
    navigation::NavBar,
};

use super::{
    core::{
        AuthorizationDecision, Stage, TransferError, TransferEvent, TransferRecipient,
        TransferSession, search_recipients,
    },
    desk::TransferDesk,
};

const WIZARD_ID: &str = "transfer-wizard";
const WIZARD_TARGET: &str = "#transfer-wizard";
const RECIPIENT_LIST_ID: &str = "recipient-list";
const ALERT_TARGET: &str = "#alert-container";

/// The labels of the steps before the outcome, in order.
/// The fee charged on top of every transfer.
const TRANSFER_FEE: f64 = 0.0;

const STEP_LABELS: [&str; 4] = ["Recipient", "Amount", "Review", "Authorize"];

/// The state needed for the transfer wizard.
#[derive(Debug, Clone)]
pub struct TransferState {
    pub desk: TransferDesk,
    pub recipients: Arc<Vec<TransferRecipient>>,
    pub accounts: Arc<Vec<Account>>,
}

impl FromRef<AppState> for TransferState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            desk: state.transfer_desk.clone(),
            recipients: state.recipients.clone(),
            accounts: state.accounts.clone(),
        }
    }
}

/// What the user typed into a form that was rejected.
#[derive(Debug, Default)]
struct Feedback<'a> {
    amount: Option<&'a str>,
    note: Option<&'a str>,
    error: Option<String>,
}

/// Display the transfer wizard at the current step.
pub async fn get_transfer_page(State(state): State<TransferState>) -> Result<Response, Error> {
    let session = state.desk.session()?;
    let nav_bar = NavBar::new(endpoints::TRANSFER_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            (page_header("Transfer Money", "Send money to your contacts securely"))
            (wizard_view(&session, &state, &Feedback::default()))
        }
    };

    Ok(base("Transfer", &[], &content).into_response())
}

/// The wizard fragment, polled while a transfer is being processed.
pub async fn get_transfer_status(State(state): State<TransferState>) -> Result<Response, Error> {
    let session = state.desk.session()?;

    Ok(wizard_view(&session, &state, &Feedback::default()).into_response())
}

/// The query string for filtering recipients.
#[derive(Debug, Default, Deserialize)]
pub struct RecipientSearch {
    #[serde(default)]
    q: String,
}

/// The recipient list filtered by name.
pub async fn search_recipient_list(
    State(state): State<TransferState>,
    Query(search): Query<RecipientSearch>,
) -> Response {
    recipient_list(&search_recipients(&state.recipients, &search.q)).into_response()
}

/// The form data for choosing a recipient.
#[derive(Debug, Deserialize)]
pub struct RecipientForm {
    recipient_id: String,
}

/// Choose who to send money to and move on to the amount.
pub async fn select_recipient(
    State(state): State<TransferState>,
    Form(form): Form<RecipientForm>,
) -> Result<Response, Error> {
    let recipient = state
        .recipients
        .iter()
        .find(|recipient| recipient.id == form.recipient_id)
        .ok_or_else(|| TransferError::UnknownRecipient(form.recipient_id.clone()))?;

    let session = state
        .desk
        .apply(TransferEvent::SelectRecipient(recipient.clone()))?;

    Ok(wizard_view(&session, &state, &Feedback::default()).into_response())
}

/// The form data for choosing the account to pay from.
#[derive(Debug, Deserialize)]
pub struct AccountForm {
    account_id: String,
}

/// Change the account the transfer is paid from.
pub async fn select_account(
    State(state): State<TransferState>,
    Form(form): Form<AccountForm>,
) -> Result<Response, Error> {
    let account = find_account(&state.accounts, &form.account_id)
        .ok_or_else(|| TransferError::UnknownAccount(form.account_id.clone()))?;

    let session = state
        .desk
        .apply(TransferEvent::SelectAccount(account.id.clone()))?;

    Ok(wizard_view(&session, &state, &Feedback::default()).into_response())
}

/// The form data for the amount step.
#[derive(Debug, Deserialize)]
pub struct AmountForm {
    amount: String,
    #[serde(default)]
    note: String,
}

/// Check the amount and move on to the review.
///
/// An invalid amount keeps the wizard at the amount step with an error under
/// the input.
pub async fn submit_amount(
    State(state): State<TransferState>,
    Form(form): Form<AmountForm>,
) -> Result<Response, Error> {
    let event = TransferEvent::SubmitAmount {
        amount: form.amount.clone(),
        note: form.note.clone(),
    };

    match state.desk.apply(event) {
        Ok(session) => Ok(wizard_view(&session, &state, &Feedback::default()).into_response()),
        Err(Error::Transfer(error @ TransferError::InvalidAmount)) => {
            let session = state.desk.session()?;
            let feedback = Feedback {
                amount: Some(&form.amount),
                note: Some(&form.note),
                error: Some(error.to_string()),
            };

            Ok(wizard_view(&session, &state, &feedback).into_response())
        }
        Err(error) => Err(error),
    }
}

/// Go back one step.
pub async fn back(State(state): State<TransferState>) -> Result<Response, Error> {
    let session = state.desk.apply(TransferEvent::Back)?;

    Ok(wizard_view(&session, &state, &Feedback::default()).into_response())
}

/// Accept the reviewed transfer and ask for the PIN.
pub async fn confirm_transfer(State(state): State<TransferState>) -> Result<Response, Error> {
    let session = state.desk.apply(TransferEvent::Confirm)?;

    Ok(wizard_view(&session, &state, &Feedback::default()).into_response())
}

/// The form data for the authorization step.
#[derive(Debug, Deserialize)]
pub struct PinForm {
    pin: String,
}

/// Check the PIN and submit the transfer for authorization.
///
/// The outcome arrives in the background, so the response shows the
/// processing view which polls [get_transfer_status] until it is decided.
pub async fn submit_pin(
    State(state): State<TransferState>,
    Form(form): Form<PinForm>,
) -> Result<Response, Error> {
    match state.desk.submit_pin(form.pin) {
        Ok((session, _settlement)) => {
            tracing::info!("submitted transfer {} for authorization", session.generation());
            Ok(wizard_view(&session, &state, &Feedback::default()).into_response())
        }
        Err(Error::Transfer(error @ TransferError::InvalidPin)) => {
            let session = state.desk.session()?;
            let feedback = Feedback {
                error: Some(error.to_string()),
                ..Default::default()
            };

            Ok(wizard_view(&session, &state, &feedback).into_response())
        }
        Err(error) => Err(error),
    }
}

/// Start a new transfer after the last one succeeded or failed.
pub async fn reset_transfer(State(state): State<TransferState>) -> Result<Response, Error> {
    let session = state.desk.apply(TransferEvent::Reset)?;

    Ok(wizard_view(&session, &state, &Feedback::default()).into_response())
}

/// Throw away the transfer in progress, even while it is being processed.
pub async fn cancel_transfer(State(state): State<TransferState>) -> Result<Response, Error> {
    let session = state.desk.apply(TransferEvent::Abandon)?;

    Ok(wizard_view(&session, &state, &Feedback::default()).into_response())
}

fn source_account<'a>(session: &TransferSession, accounts: &'a [Account]) -> Option<&'a Account> {
    session
        .source_account_id()
        .and_then(|id| find_account(accounts, id))
        .or_else(|| default_account(accounts))
}

fn wizard_view(session: &TransferSession, state: &TransferState, feedback: &Feedback) -> Markup {
    let stage_content = match session.stage() {
        Stage::Recipient => recipient_step(&state.recipients),
        Stage::Amount => amount_step(session, &state.accounts, feedback),
        Stage::Review => review_step(session, &state.accounts),
        Stage::Auth if session.is_processing() => processing_view(),
        Stage::Auth => auth_step(feedback),
        Stage::Success | Stage::Error => outcome_view(session),
    };

    html! {
        section
            id=(WIZARD_ID)
            class={ (CARD_STYLE) " max-w-2xl w-full mx-auto space-y-6" }
            data-stage=(session.stage().as_str())
        {
            (step_progress(session.stage()))
            (stage_content)
        }
    }
}

fn step_progress(stage: Stage) -> Markup {
    let step = usize::from(stage.step_number());
    let percent = (step - 1) as f64 / STEP_LABELS.len() as f64 * 100.0;

    html! {
        div class="space-y-2"
        {
            ol class="flex justify-between text-sm"
            {
                @for (index, label) in STEP_LABELS.iter().enumerate() {
                    @let number = index + 1;
                    @if number == step {
                        li class="font-semibold text-blue-600 dark:text-blue-400" aria-current="step"
                        {
                            (number) ". " (label)
                        }
                    } @else if number < step {
                        li class="text-green-600 dark:text-green-400" { (number) ". " (label) }
                    } @else {
                        li class="text-gray-500 dark:text-gray-400" { (number) ". " (label) }
                    }
                }
            }
            (progress_bar(percent))
        }
    }
}

/// Buttons that post to `endpoint` and swap in the new wizard.
fn wizard_button(endpoint: &str, text: &str, style: &str) -> Markup {
    html! {
        button
            type="button"
            class=(style)
            hx-post=(endpoint)
            hx-target=(WIZARD_TARGET)
            hx-swap="outerHTML"
            hx-target-error=(ALERT_TARGET)
        {
            (text)
        }
    }
}

fn recipient_step(recipients: &[TransferRecipient]) -> Markup {
    let all: Vec<&TransferRecipient> = recipients.iter().collect();

    html! {
        div class="space-y-4"
        {
            h2 class="text-xl font-semibold" { "Select Recipient" }

            input
                type="search"
                name="q"
                placeholder="Search by name"
                aria-label="Search recipients"
                class=(FORM_TEXT_INPUT_STYLE)
                hx-get=(endpoints::TRANSFER_RECIPIENT_SEARCH)
                hx-trigger="input changed delay:300ms, search"
                hx-target={ "#" (RECIPIENT_LIST_ID) }
                hx-swap="outerHTML";

            (recipient_list(&all))
        }
    }
}

fn recipient_list(recipients: &[&TransferRecipient]) -> Markup {
    html! {
        ul id=(RECIPIENT_LIST_ID) class="space-y-2"
        {
            @if recipients.is_empty() {
                li class="text-gray-600 dark:text-gray-400" { "No recipients match your search." }
            }

            @for recipient in recipients {
                li data-recipient-id=(recipient.id)
                {
                    form
                        hx-post=(endpoints::TRANSFER_RECIPIENT)
                        hx-target=(WIZARD_TARGET)
                        hx-swap="outerHTML"
                        hx-target-error=(ALERT_TARGET)
                    {
                        input type="hidden" name="recipient_id" value=(recipient.id);

                        button
                            type="submit"
                            class="w-full flex items-center justify-between p-4 rounded border \
                                border-gray-200 dark:border-gray-700 hover:bg-gray-100 \
                                dark:hover:bg-gray-700 text-left"
                        {
                            div
                            {
                                p class="font-medium" { (recipient.name) }
                                p class="text-sm text-gray-600 dark:text-gray-400"
                                {
                                    (recipient.bank_name) " " (recipient.masked_number)
                                }
                            }

                            @if recipient.is_saved {
                                (badge("Saved", "bg-blue-100 text-blue-800"))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn recipient_summary(recipient: Option<&TransferRecipient>) -> Markup {
    html! {
        @if let Some(recipient) = recipient {
            div class="p-4 rounded bg-gray-50 dark:bg-gray-700"
            {
                p class="text-sm text-gray-600 dark:text-gray-400" { "Sending to" }
                p class="font-medium" data-recipient { (recipient.name) }
                p class="text-sm text-gray-600 dark:text-gray-400"
                {
                    (recipient.bank_name) " " (recipient.masked_number)
                }
            }
        }
    }
}

fn amount_step(session: &TransferSession, accounts: &[Account], feedback: &Feedback) -> Markup {
    let selected_account = source_account(session, accounts);
    let amount = feedback.amount.unwrap_or(session.amount_input());
    let note = feedback.note.or(session.note()).unwrap_or_default();

    html! {
        div class="space-y-4"
        {
            h2 class="text-xl font-semibold" { "Enter Amount" }

            (recipient_summary(session.recipient()))

            div
            {
                label for="account_id" class=(FORM_LABEL_STYLE) { "From account" }
                select
                    id="account_id"
                    name="account_id"
                    class=(FORM_TEXT_INPUT_STYLE)
                    hx-post=(endpoints::TRANSFER_ACCOUNT)
                    hx-trigger="change"
                    hx-target=(WIZARD_TARGET)
                    hx-swap="outerHTML"
                    hx-target-error=(ALERT_TARGET)
                {
                    @for account in accounts {
                        @let is_selected = selected_account.is_some_and(|selected| selected.id == account.id);
                        option value=(account.id) selected[is_selected]
                        {
                            (account.name) " (" (format_currency(account.balance, &account.currency)) ")"
                        }
                    }
                }
            }

            form
                class="space-y-4"
                hx-post=(endpoints::TRANSFER_AMOUNT)
                hx-target=(WIZARD_TARGET)
                hx-swap="outerHTML"
                hx-target-error=(ALERT_TARGET)
            {
                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                    input
                        type="text"
                        inputmode="decimal"
                        id="amount"
                        name="amount"
                        placeholder="0.00"
                        value=(amount)
                        class=(FORM_TEXT_INPUT_STYLE)
                        required;
                }

                div
                {
                    label for="note" class=(FORM_LABEL_STYLE) { "Note (optional)" }
                    input
                        type="text"
                        id="note"
                        name="note"
                        placeholder="What's it for?"
                        value=(note)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                @if let Some(error) = &feedback.error {
                    p class=(FORM_ERROR_STYLE) { (error) }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Continue" }
            }

            div class="flex gap-4"
            {
                (wizard_button(endpoints::TRANSFER_BACK, "Back", BUTTON_SECONDARY_STYLE))
                (wizard_button(endpoints::TRANSFER_CANCEL, "Cancel", BUTTON_SECONDARY_STYLE))
            }
        }
    }
}

fn review_step(session: &TransferSession, accounts: &[Account]) -> Markup {
    let amount = session.amount().unwrap_or_default();
    let account_name = source_account(session, accounts)
        .map(|account| account.name.as_str())
        .unwrap_or("-");

    html! {
        div class="space-y-4"
        {
            h2 class="text-xl font-semibold" { "Review Transfer" }

            (recipient_summary(session.recipient()))

            dl class="space-y-2"
            {
                div class="flex justify-between"
                {
                    dt class="text-gray-600 dark:text-gray-400" { "From" }
                    dd { (account_name) }
                }

                div class="flex justify-between pt-3 border-t border-gray-200 dark:border-gray-700"
                {
                    dt class="text-gray-600 dark:text-gray-400" { "Amount" }
                    dd class="font-semibold" data-review-amount { (format_currency(amount, DEFAULT_CURRENCY)) }
                }

                div class="flex justify-between"
                {
                    dt class="text-gray-600 dark:text-gray-400" { "Fee" }
                    dd class="font-semibold" data-review-fee { (format_currency(TRANSFER_FEE, DEFAULT_CURRENCY)) }
                }

                @if let Some(note) = session.note() {
                    div class="flex justify-between"
                    {
                        dt class="text-gray-600 dark:text-gray-400" { "Note" }
                        dd { (note) }
                    }
                }

                div class="flex justify-between pt-2 border-t border-gray-200 dark:border-gray-700 text-lg font-bold"
                {
                    dt { "Total" }
                    dd data-review-total { (format_currency(amount + TRANSFER_FEE, DEFAULT_CURRENCY)) }
                }
            }

            (wizard_button(endpoints::TRANSFER_CONFIRM, "Confirm Transfer", BUTTON_PRIMARY_STYLE))

            div class="flex gap-4"
            {
                (wizard_button(endpoints::TRANSFER_BACK, "Back", BUTTON_SECONDARY_STYLE))
                (wizard_button(endpoints::TRANSFER_CANCEL, "Cancel", BUTTON_SECONDARY_STYLE))
            }
        }
    }
}

fn auth_step(feedback: &Feedback) -> Markup {
    html! {
        div class="space-y-4"
        {
            h2 class="text-xl font-semibold" { "Authorize Transfer" }
            p class="text-gray-600 dark:text-gray-400" { "Enter your 4-digit PIN to send the money." }

            form
                class="space-y-4"
                hx-post=(endpoints::TRANSFER_PIN)
                hx-target=(WIZARD_TARGET)
                hx-swap="outerHTML"
                hx-target-error=(ALERT_TARGET)
                hx-disabled-elt="find button"
            {
                div
                {
                    label for="pin" class=(FORM_LABEL_STYLE) { "PIN" }
                    input
                        type="password"
                        inputmode="numeric"
                        autocomplete="off"
                        id="pin"
                        name="pin"
                        maxlength="4"
                        pattern="[0-9]{4}"
                        class={ (FORM_TEXT_INPUT_STYLE) " text-center tracking-widest" }
                        required;
                }

                @if let Some(error) = &feedback.error {
                    p class=(FORM_ERROR_STYLE) { (error) }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="htmx-indicator" { (loading_spinner()) }
                    "Authorize"
                }
            }

            div class="flex gap-4"
            {
                (wizard_button(endpoints::TRANSFER_BACK, "Back", BUTTON_SECONDARY_STYLE))
                (wizard_button(endpoints::TRANSFER_CANCEL, "Cancel", BUTTON_SECONDARY_STYLE))
            }
        }
    }
}

fn processing_view() -> Markup {
    html! {
        div
            class="space-y-4 text-center"
            data-processing
            hx-get=(endpoints::TRANSFER_STATUS)
            hx-trigger="every 1s"
            hx-target=(WIZARD_TARGET)
            hx-swap="outerHTML"
        {
            h2 class="text-xl font-semibold" { "Processing Transfer" }
            p class="text-gray-600 dark:text-gray-400"
            {
                span class="text-blue-600" { (loading_spinner()) }
                "Please wait while we authorize your transfer."
            }

            (wizard_button(endpoints::TRANSFER_CANCEL, "Cancel", BUTTON_SECONDARY_STYLE))
        }
    }
}

fn outcome_view(session: &TransferSession) -> Markup {
    let amount = format_currency(session.amount().unwrap_or_default(), DEFAULT_CURRENCY);
    let recipient = session
        .recipient()
        .map(|recipient| recipient.name.as_str())
        .unwrap_or("the recipient");

    html! {
        div class="space-y-4 text-center"
        {
            @match session.outcome() {
                Some(AuthorizationDecision::Approved { reference }) => {
                    h2 class="text-xl font-semibold text-green-600 dark:text-green-400" { "Transfer Successful!" }
                    p { (amount) " was sent to " (recipient) "." }
                    p class="text-sm text-gray-600 dark:text-gray-400"
                    {
                        "Reference: " span class="font-mono" data-reference { (reference) }
                    }

                    (wizard_button(endpoints::TRANSFER_RESET, "New Transfer", BUTTON_PRIMARY_STYLE))
                }
                Some(AuthorizationDecision::Declined { reason }) => {
                    h2 class="text-xl font-semibold text-red-600 dark:text-red-400" { "Transfer Failed" }
                    p data-reason { (reason) }

                    (wizard_button(endpoints::TRANSFER_RESET, "Try Again", BUTTON_PRIMARY_STYLE))
                }
                None => {
                    p { "The transfer has finished." }

                    (wizard_button(endpoints::TRANSFER_RESET, "New Transfer", BUTTON_PRIMARY_STYLE))
                }
            }
        }
    }
}
