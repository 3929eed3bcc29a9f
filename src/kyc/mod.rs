//! Identity verification documents.

mod core;
mod desk;
mod page;

pub use core::{DocumentSet, KycError, VerificationStatus, seed_documents};
pub use desk::VerificationDesk;
pub use page::{
    cancel_upload, get_document_page, get_documents_status, get_verification_page,
    resubmit_document, upload_document,
};
