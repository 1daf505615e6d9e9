//! Read and archive operations on top of an [`EmailRepository`].

use crate::Result;
use crate::model::{EmailRecord, MessageUid};
use crate::repository::EmailRepository;

/// Shows the oldest message of a folder.
#[derive(Debug, Clone)]
pub struct ReadFirstEmail<R> {
    repository: R,
}

impl<R: EmailRepository> ReadFirstEmail<R> {
    /// Creates the operation over `repository`.
    #[must_use]
    pub const fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Returns the first message of `folder`, or `None` when it is empty.
    ///
    /// # Errors
    ///
    /// Propagates repository errors unchanged.
    pub async fn execute(&self, folder: &str) -> Result<Option<EmailRecord>> {
        let record = self.repository.first_email(folder).await?;
        tracing::debug!(folder, found = record.is_some(), "Read first email");
        Ok(record)
    }
}

/// Archives one message by UID.
#[derive(Debug, Clone)]
pub struct ArchiveEmail<R> {
    repository: R,
}

impl<R: EmailRepository> ArchiveEmail<R> {
    /// Creates the operation over `repository`.
    #[must_use]
    pub const fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Archives `uid` from `folder`. Returns whether the message moved.
    ///
    /// # Errors
    ///
    /// Propagates repository errors unchanged.
    pub async fn execute(&self, folder: &str, uid: &MessageUid) -> Result<bool> {
        self.repository.archive_email(folder, uid).await
    }
}
