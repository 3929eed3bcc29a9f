//! The shared document set and the simulated document uploads.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use time::OffsetDateTime;
use tokio::task::JoinHandle;

use crate::Error;

use super::core::{DocumentSet, KycError};

/// Holds the user's documents and runs uploads in the background.
#[derive(Debug, Clone)]
pub struct VerificationDesk {
    documents: Arc<Mutex<DocumentSet>>,
    upload_delay: Duration,
}

impl VerificationDesk {
    /// Create a desk for `documents` where uploads take `upload_delay`.
    pub fn new(documents: DocumentSet, upload_delay: Duration) -> Self {
        Self {
            documents: Arc::new(Mutex::new(documents)),
            upload_delay,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, DocumentSet>, Error> {
        self.documents
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire document lock: {error}"))
            .map_err(|_| Error::LockError)
    }

    /// A copy of the current documents.
    pub fn documents(&self) -> Result<DocumentSet, Error> {
        Ok(self.lock()?.clone())
    }

    /// Start uploading the document `id`.
    ///
    /// The handle completes once the upload has finished or been discarded.
    ///
    /// # Errors
    ///
    /// Returns [Error::Kyc] if the upload cannot start.
    pub fn start_upload(&self, id: &str) -> Result<(DocumentSet, JoinHandle<()>), Error> {
        let (ticket, snapshot) = {
            let mut documents = self.lock()?;
            let ticket = documents.begin_upload(id).inspect_err(|error| {
                tracing::warn!("could not start upload: {error}");
            })?;
            (ticket, documents.clone())
        };
        tracing::debug!("started upload of {}", ticket.document_id());

        let desk = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(desk.upload_delay).await;

            let Ok(mut documents) = desk.lock() else {
                return;
            };
            match documents.complete_upload(&ticket, OffsetDateTime::now_utc()) {
                Ok(document) => tracing::info!("finished upload of {}", document.id),
                Err(KycError::StaleUpload) => {
                    tracing::debug!("discarded cancelled upload of {}", ticket.document_id())
                }
                Err(error) => tracing::error!("could not finish upload: {error}"),
            }
        });

        Ok((snapshot, handle))
    }

    /// Cancel the running upload, if any.
    pub fn cancel_upload(&self) -> Result<DocumentSet, Error> {
        let mut documents = self.lock()?;
        if let Some(ticket) = documents.cancel_upload() {
            tracing::debug!("cancelled upload of {}", ticket.document_id());
        }
        Ok(documents.clone())
    }

    /// Move a rejected document back to not started.
    ///
    /// # Errors
    ///
    /// Returns [Error::Kyc] if the document cannot be resubmitted.
    pub fn resubmit(&self, id: &str) -> Result<DocumentSet, Error> {
        let mut documents = self.lock()?;
        documents
            .resubmit(id)
            .inspect_err(|error| tracing::warn!("could not resubmit document: {error}"))?;
        Ok(documents.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::{
        Error,
        kyc::core::{DocumentSet, KycError, VerificationStatus, seed_documents},
    };

    use super::VerificationDesk;

    #[tokio::test]
    async fn upload_completes_after_delay() {
        let desk = VerificationDesk::new(
            DocumentSet::new(seed_documents()),
            Duration::from_millis(10),
        );

        let (snapshot, handle) = desk.start_upload("address").unwrap();
        assert_eq!(snapshot.uploading(), Some("address"));

        handle.await.unwrap();

        let documents = desk.documents().unwrap();
        let address = documents.get("address").unwrap();
        assert_eq!(address.status, VerificationStatus::InProgress);
        assert!(address.uploaded_at.is_some());
        assert_eq!(documents.uploading(), None);
    }

    #[tokio::test]
    async fn cancelled_upload_leaves_document_untouched() {
        let desk = VerificationDesk::new(
            DocumentSet::new(seed_documents()),
            Duration::from_millis(20),
        );

        let (_, handle) = desk.start_upload("address").unwrap();
        desk.cancel_upload().unwrap();
        handle.await.unwrap();

        let documents = desk.documents().unwrap();
        assert_eq!(
            documents.get("address").unwrap().status,
            VerificationStatus::NotStarted
        );
    }

    #[tokio::test]
    async fn second_upload_is_refused() {
        let mut documents = seed_documents();
        documents[2].status = VerificationStatus::NotStarted;
        let desk = VerificationDesk::new(DocumentSet::new(documents), Duration::from_millis(20));

        desk.start_upload("address").unwrap();

        assert!(matches!(
            desk.start_upload("selfie"),
            Err(Error::Kyc(KycError::UploadInProgress))
        ));
    }
}
