//! Password, sign-in options and the devices signed in to the account.

mod core;
mod page;

pub use core::{SecurityError, SecuritySettings};
pub use page::{
    change_password, get_security_page, log_out_other_devices, remove_device,
    toggle_biometric, toggle_two_factor,
};
