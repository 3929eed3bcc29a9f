//! Account security settings, trusted devices and sign-in history.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use unicode_segmentation::UnicodeSegmentation;

/// The minimum number of characters in a new password.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// What a password change looks like when submitted from the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordChange {
    /// The password the user signs in with now.
    pub current_password: String,
    /// The password to switch to.
    pub new_password: String,
    /// The new password typed a second time.
    pub confirm_password: String,
}

/// Why a password change was refused.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PasswordError {
    /// The new password and its confirmation differ.
    #[error("Passwords do not match")]
    Mismatch,

    /// The new password has fewer than [MIN_PASSWORD_LENGTH] characters.
    #[error("Password must be at least {} characters", MIN_PASSWORD_LENGTH)]
    TooShort,
}

/// Check that a password change can go ahead.
///
/// The confirmation is checked before the length, so a short password that
/// was typed differently twice reports the mismatch. Length counts
/// user-perceived characters rather than bytes.
pub fn validate_password_change(change: &PasswordChange) -> Result<(), PasswordError> {
    if change.new_password != change.confirm_password {
        return Err(PasswordError::Mismatch);
    }

    if change.new_password.graphemes(true).count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }

    Ok(())
}

/// The form factor of a signed in device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// A mobile phone.
    Phone,
    /// A desktop or laptop computer.
    Desktop,
    /// A tablet.
    Tablet,
}

impl DeviceKind {
    /// The text shown next to the device name.
    pub fn label(self) -> &'static str {
        match self {
            DeviceKind::Phone => "Phone",
            DeviceKind::Desktop => "Desktop",
            DeviceKind::Tablet => "Tablet",
        }
    }
}

/// A device that is signed in to the user's account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Unique identifier, e.g. "dev_1".
    pub id: String,
    /// The device name, e.g. "iPhone 14 Pro".
    pub name: String,
    /// What sort of device it is.
    pub kind: DeviceKind,
    /// When the device last used the account.
    pub last_active: OffsetDateTime,
    /// The city the device was last seen in.
    pub location: String,
    /// Whether this is the device the user is on right now.
    pub is_current: bool,
}

/// Whether a sign-in attempt got in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginStatus {
    /// The user signed in.
    Success,
    /// The credentials were wrong.
    Failed,
}

impl LoginStatus {
    /// The text shown in the login history.
    pub fn label(self) -> &'static str {
        match self {
            LoginStatus::Success => "Success",
            LoginStatus::Failed => "Failed",
        }
    }
}

/// One attempt to sign in to the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginAttempt {
    /// Unique identifier, e.g. "login_1".
    pub id: String,
    /// When the attempt was made.
    pub timestamp: OffsetDateTime,
    /// The city the attempt came from.
    pub location: String,
    /// The name of the device that made the attempt.
    pub device: String,
    /// Whether the attempt got in.
    pub status: LoginStatus,
}

/// Why a security settings action was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SecurityError {
    /// No device has the given ID.
    #[error("could not find the device \"{0}\"")]
    UnknownDevice(String),

    /// The device the user is on cannot be signed out from itself.
    #[error("the current device cannot be removed")]
    CurrentDevice,
}

/// Everything shown on the security page.
#[derive(Debug, Clone, PartialEq)]
pub struct SecuritySettings {
    /// Whether sign-in asks for a code from the phone.
    pub two_factor_enabled: bool,
    /// Whether the app can be unlocked with a fingerprint or face.
    pub biometric_enabled: bool,
    /// The devices signed in to the account.
    pub devices: Vec<Device>,
    /// Recent sign-in attempts, newest first.
    pub login_history: Vec<LoginAttempt>,
    /// When the password was last changed in this session.
    pub password_changed_at: Option<OffsetDateTime>,
}

impl SecuritySettings {
    /// The settings of a new session, with activity times relative to `now`.
    pub fn seed(now: OffsetDateTime) -> Self {
        let new_york = "New York, USA".to_owned();
        let two_hours_ago = now - Duration::hours(2);
        let yesterday = now - Duration::hours(24);

        Self {
            two_factor_enabled: true,
            biometric_enabled: true,
            devices: vec![
                Device {
                    id: "dev_1".to_owned(),
                    name: "iPhone 14 Pro".to_owned(),
                    kind: DeviceKind::Phone,
                    last_active: now,
                    location: new_york.clone(),
                    is_current: true,
                },
                Device {
                    id: "dev_2".to_owned(),
                    name: "MacBook Pro".to_owned(),
                    kind: DeviceKind::Desktop,
                    last_active: two_hours_ago,
                    location: new_york.clone(),
                    is_current: false,
                },
                Device {
                    id: "dev_3".to_owned(),
                    name: "iPad Air".to_owned(),
                    kind: DeviceKind::Tablet,
                    last_active: yesterday,
                    location: new_york.clone(),
                    is_current: false,
                },
            ],
            login_history: vec![
                LoginAttempt {
                    id: "login_1".to_owned(),
                    timestamp: now,
                    location: new_york.clone(),
                    device: "iPhone 14 Pro".to_owned(),
                    status: LoginStatus::Success,
                },
                LoginAttempt {
                    id: "login_2".to_owned(),
                    timestamp: two_hours_ago,
                    location: new_york,
                    device: "MacBook Pro".to_owned(),
                    status: LoginStatus::Success,
                },
                LoginAttempt {
                    id: "login_3".to_owned(),
                    timestamp: yesterday,
                    location: "Unknown".to_owned(),
                    device: "Chrome Browser".to_owned(),
                    status: LoginStatus::Failed,
                },
            ],
            password_changed_at: None,
        }
    }

    /// Get the device with `id`.
    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|device| device.id == id)
    }

    /// Sign out the device `id`.
    ///
    /// # Errors
    ///
    /// Fails if there is no such device or it is the current device.
    pub fn remove_device(&mut self, id: &str) -> Result<Device, SecurityError> {
        let position = self
            .devices
            .iter()
            .position(|device| device.id == id)
            .ok_or_else(|| SecurityError::UnknownDevice(id.to_owned()))?;

        if self.devices[position].is_current {
            return Err(SecurityError::CurrentDevice);
        }

        Ok(self.devices.remove(position))
    }

    /// Sign out every device except the current one, returning how many were removed.
    pub fn log_out_other_devices(&mut self) -> usize {
        let before = self.devices.len();
        self.devices.retain(|device| device.is_current);
        before - self.devices.len()
    }

    /// Validate and record a password change made at `now`.
    pub fn change_password(
        &mut self,
        change: &PasswordChange,
        now: OffsetDateTime,
    ) -> Result<(), PasswordError> {
        validate_password_change(change)?;
        self.password_changed_at = Some(now);
        Ok(())
    }
}
