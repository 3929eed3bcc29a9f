//! Identity documents and their verification status.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{OffsetDateTime, macros::datetime};

/// Where a document (or the whole verification) is in the review process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Nothing has been uploaded yet.
    NotStarted,
    /// Uploaded, or some documents are still missing.
    InProgress,
    /// Waiting for a reviewer.
    PendingReview,
    /// Accepted by a reviewer.
    Verified,
    /// Turned down by a reviewer, see the rejection reason.
    Rejected,
}

impl VerificationStatus {
    /// The snake case name, e.g. "pending_review".
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationStatus::NotStarted => "not_started",
            VerificationStatus::InProgress => "in_progress",
            VerificationStatus::PendingReview => "pending_review",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }

    /// The text shown in status badges.
    pub fn label(self) -> &'static str {
        match self {
            VerificationStatus::NotStarted => "Not Started",
            VerificationStatus::InProgress => "In Progress",
            VerificationStatus::PendingReview => "Pending Review",
            VerificationStatus::Verified => "Verified",
            VerificationStatus::Rejected => "Rejected",
        }
    }
}

impl Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document the user must provide to verify their identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier, e.g. "id_front".
    pub id: String,
    /// The display name, e.g. "ID (Front)".
    pub name: String,
    /// Where the document is in the review process.
    pub status: VerificationStatus,
    /// When the file was uploaded, unset until it is.
    pub uploaded_at: Option<OffsetDateTime>,
    /// Why the reviewer turned the document down, only set when rejected.
    pub rejection_reason: Option<String>,
}

/// The number of documents that have been verified.
pub fn verified_count(documents: &[Document]) -> usize {
    documents
        .iter()
        .filter(|document| document.status == VerificationStatus::Verified)
        .count()
}

/// Derive the status of the whole verification from its documents.
///
/// All documents verified gives [VerificationStatus::Verified], all but one
/// gives [VerificationStatus::PendingReview] and anything less gives
/// [VerificationStatus::InProgress]. An empty set counts as verified.
pub fn overall_status(documents: &[Document]) -> VerificationStatus {
    let verified = verified_count(documents);

    if verified == documents.len() {
        VerificationStatus::Verified
    } else if verified + 1 == documents.len() {
        VerificationStatus::PendingReview
    } else {
        VerificationStatus::InProgress
    }
}

/// The documents a new user has on file.
pub fn seed_documents() -> Vec<Document> {
    let document = |id: &str, name: &str, status, uploaded_at| Document {
        id: id.to_owned(),
        name: name.to_owned(),
        status,
        uploaded_at,
        rejection_reason: None,
    };

    vec![
        document(
            "id_front",
            "ID (Front)",
            VerificationStatus::Verified,
            Some(datetime!(2024-12-15 00:00 UTC)),
        ),
        document(
            "id_back",
            "ID (Back)",
            VerificationStatus::Verified,
            Some(datetime!(2024-12-15 00:00 UTC)),
        ),
        document(
            "selfie",
            "Selfie",
            VerificationStatus::InProgress,
            Some(datetime!(2024-12-18 00:00 UTC)),
        ),
        document(
            "address",
            "Address Proof",
            VerificationStatus::NotStarted,
            None,
        ),
    ]
}

/// Why a document action was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KycError {
    /// No document has the given ID.
    #[error("could not find the document \"{0}\"")]
    UnknownDocument(String),

    /// Only documents that have not been started can be uploaded.
    #[error("the document \"{id}\" cannot be uploaded while it is {status}")]
    NotUploadable {
        /// The document ID.
        id: String,
        /// The status that blocked the upload.
        status: VerificationStatus,
    },

    /// Another document is still uploading.
    #[error("wait for the current upload to finish before starting another")]
    UploadInProgress,

    /// The upload was cancelled or replaced before it finished.
    #[error("the upload is no longer active")]
    StaleUpload,

    /// Only rejected documents can be resubmitted.
    #[error("the document \"{id}\" cannot be resubmitted while it is {status}")]
    NotRejected {
        /// The document ID.
        id: String,
        /// The status that blocked the resubmission.
        status: VerificationStatus,
    },
}

/// Identifies one upload so a cancelled upload cannot complete later.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UploadTicket {
    document_id: String,
    serial: u64,
}

impl UploadTicket {
    /// The document being uploaded.
    pub fn document_id(&self) -> &str {
        &self.document_id
    }
}

/// The user's documents plus the upload that is currently running, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSet {
    documents: Vec<Document>,
    pending_upload: Option<UploadTicket>,
    next_serial: u64,
}

impl DocumentSet {
    /// Track `documents` with no upload running.
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            pending_upload: None,
            next_serial: 0,
        }
    }

    /// The documents in display order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Get the document with `id`.
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|document| document.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Document, KycError> {
        self.documents
            .iter_mut()
            .find(|document| document.id == id)
            .ok_or_else(|| KycError::UnknownDocument(id.to_owned()))
    }

    /// The ID of the document being uploaded.
    pub fn uploading(&self) -> Option<&str> {
        self.pending_upload.as_ref().map(UploadTicket::document_id)
    }

    /// See [overall_status].
    pub fn overall_status(&self) -> VerificationStatus {
        overall_status(&self.documents)
    }

    /// How many documents are verified.
    pub fn verified_count(&self) -> usize {
        verified_count(&self.documents)
    }

    /// Start uploading the document `id`.
    ///
    /// # Errors
    ///
    /// Fails if the document does not exist, is not in the not started state,
    /// or another upload is still running.
    pub fn begin_upload(&mut self, id: &str) -> Result<UploadTicket, KycError> {
        if self.pending_upload.is_some() {
            return Err(KycError::UploadInProgress);
        }

        let document = self.get_mut(id)?;
        if document.status != VerificationStatus::NotStarted {
            return Err(KycError::NotUploadable {
                id: id.to_owned(),
                status: document.status,
            });
        }

        let ticket = UploadTicket {
            document_id: id.to_owned(),
            serial: self.next_serial,
        };
        self.next_serial += 1;
        self.pending_upload = Some(ticket.clone());

        Ok(ticket)
    }

    /// Finish the upload identified by `ticket`, marking the document as in
    /// progress and uploaded at `now`.
    ///
    /// # Errors
    ///
    /// Returns [KycError::StaleUpload] if `ticket` is not the running upload.
    pub fn complete_upload(
        &mut self,
        ticket: &UploadTicket,
        now: OffsetDateTime,
    ) -> Result<&Document, KycError> {
        if self.pending_upload.as_ref() != Some(ticket) {
            return Err(KycError::StaleUpload);
        }

        self.pending_upload = None;
        let document = self.get_mut(&ticket.document_id)?;
        document.status = VerificationStatus::InProgress;
        document.uploaded_at = Some(now);

        Ok(document)
    }

    /// Stop the running upload, returning its ticket if there was one.
    pub fn cancel_upload(&mut self) -> Option<UploadTicket> {
        self.pending_upload.take()
    }

    /// Send a rejected document back to the not started state.
    ///
    /// # Errors
    ///
    /// Fails if the document does not exist or was not rejected.
    pub fn resubmit(&mut self, id: &str) -> Result<(), KycError> {
        let document = self.get_mut(id)?;
        if document.status != VerificationStatus::Rejected {
            return Err(KycError::NotRejected {
                id: id.to_owned(),
                status: document.status,
            });
        }

        document.status = VerificationStatus::NotStarted;
        document.rejection_reason = None;

        Ok(())
    }
}
