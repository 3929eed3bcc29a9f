//! Sending money to a recipient in a few guided steps.

mod authorizer;
mod core;
mod desk;
mod page;

pub use authorizer::{FixedAuthorizer, RandomAuthorizer, TransferAuthorizer, TransferRequest};
pub use core::{AuthorizationDecision, Stage, TransferError, TransferRecipient};
pub use desk::TransferDesk;
pub use page::{
    back, cancel_transfer, confirm_transfer, get_transfer_page, get_transfer_status,
    reset_transfer, search_recipient_list, select_account, select_recipient, submit_amount,
    submit_pin,
};
