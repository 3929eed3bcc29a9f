//! The security settings page and its htmx endpoints.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints::{self, format_endpoint},
    format::{format_date, format_time},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, badge,
        base, page_header, password_input,
    },
    navigation::NavBar,
    timezone::local_offset_or_error,
};

use super::core::{
    Device, LoginAttempt, LoginStatus, PasswordChange, PasswordError, SecuritySettings,
};

const ALERT_TARGET: &str = "#alert-container";

/// The state needed for the security page.
#[derive(Debug, Clone)]
pub struct SecurityState {
    pub settings: Arc<Mutex<SecuritySettings>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for SecurityState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            settings: state.security.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl SecurityState {
    fn lock(&self) -> Result<MutexGuard<'_, SecuritySettings>, Error> {
        self.settings
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire security settings lock: {error}"))
            .map_err(|_| Error::LockError)
    }
}

/// Display the password form, sign-in options, devices and sign-in history.
pub async fn get_security_page(State(state): State<SecurityState>) -> Result<Response, Error> {
    let local_offset = local_offset_or_error(&state.local_timezone)?;
    let settings = state.lock()?.clone();
    let nav_bar = NavBar::new(endpoints::SECURITY_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            (page_header("Security Settings", "Manage your account security and privacy"))

            div class="grid grid-cols-1 lg:grid-cols-2 gap-6"
            {
                (password_form(None, settings.password_changed_at, local_offset))
                (sign_in_options(&settings))
            }

            (devices_view(&settings.devices, local_offset))
            (login_history_view(&settings.login_history, local_offset))
        }
    };

    Ok(base("Security", &[], &content).into_response())
}

/// Change the account password.
///
/// A mismatch or a short password is shown next to the input and nothing changes.
pub async fn change_password(
    State(state): State<SecurityState>,
    Form(change): Form<PasswordChange>,
) -> Result<Response, Error> {
    let local_offset = local_offset_or_error(&state.local_timezone)?;
    let mut settings = state.lock()?;

    match settings.change_password(&change, OffsetDateTime::now_utc()) {
        Ok(()) => {
            tracing::info!("password changed");

            Ok(html! {
                (password_form(None, settings.password_changed_at, local_offset))
                (alert_oob(Alert::success("Password updated", "Your password was changed.")))
            }
            .into_response())
        }
        Err(error) => {
            tracing::debug!("rejected password change: {error}");

            Ok(password_form(Some(error), settings.password_changed_at, local_offset)
                .into_response())
        }
    }
}

/// Turn two-factor authentication on or off.
pub async fn toggle_two_factor(State(state): State<SecurityState>) -> Result<Response, Error> {
    let mut settings = state.lock()?;
    settings.two_factor_enabled = !settings.two_factor_enabled;
    tracing::info!("two-factor authentication enabled: {}", settings.two_factor_enabled);

    Ok(sign_in_options(&settings).into_response())
}

/// Turn biometric unlock on or off.
pub async fn toggle_biometric(State(state): State<SecurityState>) -> Result<Response, Error> {
    let mut settings = state.lock()?;
    settings.biometric_enabled = !settings.biometric_enabled;
    tracing::info!("biometric unlock enabled: {}", settings.biometric_enabled);

    Ok(sign_in_options(&settings).into_response())
}

/// Sign out a device other than the current one.
pub async fn remove_device(
    State(state): State<SecurityState>,
    Path(device_id): Path<String>,
) -> Result<Response, Error> {
    let local_offset = local_offset_or_error(&state.local_timezone)?;
    let mut settings = state.lock()?;
    let device = settings
        .remove_device(&device_id)
        .inspect_err(|error| tracing::warn!("could not remove device: {error}"))?;
    tracing::info!("removed device {} ({})", device.id, device.name);

    Ok(devices_view(&settings.devices, local_offset).into_response())
}

/// Sign out every device except the current one.
pub async fn log_out_other_devices(
    State(state): State<SecurityState>,
) -> Result<Response, Error> {
    let local_offset = local_offset_or_error(&state.local_timezone)?;
    let mut settings = state.lock()?;
    let removed = settings.log_out_other_devices();
    tracing::info!("logged out of {removed} devices");

    let details = match removed {
        0 => "There were no other devices to log out.".to_owned(),
        1 => "1 other device was logged out.".to_owned(),
        count => format!("{count} other devices were logged out."),
    };

    Ok(html! {
        (devices_view(&settings.devices, local_offset))
        (alert_oob(Alert::success("Logged out", &details)))
    }
    .into_response())
}

/// Swap `alert` into the alert container alongside the main response.
fn alert_oob(alert: Alert) -> Markup {
    html! {
        div id="alert-container" hx-swap-oob="innerHTML" { (alert.into_html()) }
    }
}

fn password_form(
    error: Option<PasswordError>,
    changed_at: Option<OffsetDateTime>,
    local_offset: UtcOffset,
) -> Markup {
    let error_message = error.map(|error| error.to_string());
    let (new_error, confirm_error) = match error {
        Some(PasswordError::TooShort) => (error_message.as_deref(), None),
        Some(PasswordError::Mismatch) => (None, error_message.as_deref()),
        None => (None, None),
    };

    html! {
        section id="password-section" class={ (CARD_STYLE) " space-y-4" }
        {
            h2 class="text-lg font-semibold" { "Change Password" }

            @if let Some(changed_at) = changed_at {
                @let changed_at = changed_at.to_offset(local_offset);
                p class="text-sm text-gray-600 dark:text-gray-400" data-password-changed
                {
                    "Last changed " (format_date(changed_at)) " at " (format_time(changed_at))
                }
            }

            form
                class="space-y-4"
                hx-post=(endpoints::PASSWORD)
                hx-target="#password-section"
                hx-swap="outerHTML"
                hx-target-error=(ALERT_TARGET)
            {
                (password_input("current_password", "Current Password", "Enter current password", None))
                (password_input("new_password", "New Password", "Enter new password", new_error))
                (password_input("confirm_password", "Confirm New Password", "Confirm new password", confirm_error))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Password" }
            }
        }
    }
}

fn toggle(endpoint: &str, label: &str, description: &str, enabled: bool) -> Markup {
    html! {
        div class="flex items-center justify-between gap-4"
        {
            div
            {
                p class="font-medium" { (label) }
                p class="text-sm text-gray-600 dark:text-gray-400" { (description) }
            }

            button
                type="button"
                role="switch"
                aria-checked=(if enabled { "true" } else { "false" })
                aria-label=(label)
                class={
                    "relative inline-flex h-6 w-11 items-center rounded-full "
                    (if enabled { "bg-blue-600" } else { "bg-gray-300 dark:bg-gray-600" })
                }
                hx-post=(endpoint)
                hx-target="#sign-in-options"
                hx-swap="outerHTML"
                hx-target-error=(ALERT_TARGET)
            {
                span
                    class={
                        "inline-block h-4 w-4 rounded-full bg-white transition "
                        (if enabled { "translate-x-6" } else { "translate-x-1" })
                    }
                {}
            }
        }
    }
}

fn sign_in_options(settings: &SecuritySettings) -> Markup {
    html! {
        section id="sign-in-options" class={ (CARD_STYLE) " space-y-4" }
        {
            h2 class="text-lg font-semibold" { "Sign-in Options" }

            (toggle(
                endpoints::TWO_FACTOR,
                "Two-Factor Authentication",
                "Require a code from your phone when signing in",
                settings.two_factor_enabled
            ))
            (toggle(
                endpoints::BIOMETRIC,
                "Biometric Login",
                "Use your fingerprint or face to sign in",
                settings.biometric_enabled
            ))
        }
    }
}

fn devices_view(devices: &[Device], local_offset: UtcOffset) -> Markup {
    let has_other_devices = devices.iter().any(|device| !device.is_current);

    html! {
        section id="devices" class={ (CARD_STYLE) " space-y-4" }
        {
            div class="flex items-center justify-between gap-4"
            {
                h2 class="text-lg font-semibold" { "Trusted Devices" }

                @if has_other_devices {
                    div
                    {
                        button
                            type="button"
                            class=(BUTTON_SECONDARY_STYLE)
                            hx-post=(endpoints::DEVICES)
                            hx-confirm="Log out from all other devices?"
                            hx-target="#devices"
                            hx-swap="outerHTML"
                            hx-target-error=(ALERT_TARGET)
                        {
                            "Log out from all devices"
                        }
                    }
                }
            }

            ul class="divide-y divide-gray-200 dark:divide-gray-700"
            {
                @for device in devices {
                    @let last_active = device.last_active.to_offset(local_offset);

                    li class="flex items-center justify-between gap-4 py-3" data-device-id=(device.id)
                    {
                        div
                        {
                            p class="font-medium"
                            {
                                (device.name) " "
                                @if device.is_current {
                                    (badge("This device", "bg-green-100 text-green-800"))
                                }
                            }
                            p class="text-sm text-gray-600 dark:text-gray-400"
                            {
                                (device.kind.label()) " · " (device.location) " · "
                                (format_date(last_active)) " " (format_time(last_active))
                            }
                        }

                        @if !device.is_current {
                            button
                                type="button"
                                class=(BUTTON_DELETE_STYLE)
                                hx-delete=(format_endpoint(endpoints::DEVICE, &device.id))
                                hx-confirm={ "Remove " (device.name) "?" }
                                hx-target="#devices"
                                hx-swap="outerHTML"
                                hx-target-error=(ALERT_TARGET)
                            {
                                "Remove"
                            }
                        }
                    }
                }
            }
        }
    }
}

fn login_history_view(history: &[LoginAttempt], local_offset: UtcOffset) -> Markup {
    html! {
        section class={ (CARD_STYLE) " space-y-4 overflow-x-auto" }
        {
            h2 class="text-lg font-semibold" { "Login History" }

            table id="login-history" class="w-full text-sm text-left"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Device" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Location" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                    }
                }

                tbody
                {
                    @for attempt in history {
                        @let timestamp = attempt.timestamp.to_offset(local_offset);

                        tr class=(TABLE_ROW_STYLE) data-login-status=(attempt.status.label())
                        {
                            td class=(TABLE_CELL_STYLE) { (attempt.device) }
                            td class=(TABLE_CELL_STYLE) { (attempt.location) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                (format_date(timestamp)) " " (format_time(timestamp))
                            }
                            td class=(TABLE_CELL_STYLE)
                            {
                                (login_status_badge(attempt.status))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn login_status_badge(status: LoginStatus) -> Markup {
    let colour = match status {
        LoginStatus::Success => "bg-green-100 text-green-800",
        LoginStatus::Failed => "bg-red-100 text-red-800",
    };

    badge(status.label(), colour)
}
