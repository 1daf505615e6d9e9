//! Repository backed by an IMAP server.

use crate::Result;
use crate::config::ConnectionConfig;
use crate::model::{EmailRecord, MessageUid};
use crate::service::mail::{self, DEFAULT_ARCHIVE_FOLDER};

use super::EmailRepository;

/// Reads and archives mail on the server described by a [`ConnectionConfig`].
#[derive(Debug, Clone)]
pub struct ImapEmailRepository {
    config: ConnectionConfig,
    archive_folder: String,
}

impl ImapEmailRepository {
    /// Creates a repository archiving to `Archive`.
    #[must_use]
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            archive_folder: DEFAULT_ARCHIVE_FOLDER.to_string(),
        }
    }

    /// Archives to `folder` instead of `Archive`.
    #[must_use]
    pub fn with_archive_folder(mut self, folder: impl Into<String>) -> Self {
        self.archive_folder = folder.into();
        self
    }

    /// Connection settings in use.
    #[must_use]
    pub const fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Folder messages are archived to.
    #[must_use]
    pub fn archive_folder(&self) -> &str {
        &self.archive_folder
    }
}

impl EmailRepository for ImapEmailRepository {
    async fn first_email(&self, folder: &str) -> Result<Option<EmailRecord>> {
        let records = mail::fetch_first(&self.config, folder, Some(1)).await?;
        Ok(records.into_iter().next())
    }

    async fn archive_email(&self, folder: &str, uid: &MessageUid) -> Result<bool> {
        mail::archive_by_uid(&self.config, folder, uid, &self.archive_folder).await
    }
}
