//! In-memory repository for tests and offline demos.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::Result;
use crate::model::{EmailRecord, MessageUid};
use crate::service::mail::DEFAULT_ARCHIVE_FOLDER;

use super::EmailRepository;

/// Folders of records held in memory.
///
/// Records keep insertion order, which stands in for server order.
#[derive(Debug)]
pub struct InMemoryEmailRepository {
    folders: Mutex<HashMap<String, Vec<EmailRecord>>>,
    archive_folder: String,
}

impl Default for InMemoryEmailRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEmailRepository {
    /// Creates an empty repository archiving to `Archive`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            folders: Mutex::new(HashMap::new()),
            archive_folder: DEFAULT_ARCHIVE_FOLDER.to_string(),
        }
    }

    /// Archives to `folder` instead of `Archive`.
    #[must_use]
    pub fn with_archive_folder(mut self, folder: impl Into<String>) -> Self {
        self.archive_folder = folder.into();
        self
    }

    /// Appends a record to `folder`, creating the folder if needed.
    pub fn add_email(&self, folder: &str, record: EmailRecord) {
        self.lock()
            .entry(folder.to_string())
            .or_default()
            .push(record);
    }

    /// Returns a copy of the records in `folder`, oldest first.
    #[must_use]
    pub fn emails(&self, folder: &str) -> Vec<EmailRecord> {
        self.lock().get(folder).cloned().unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<EmailRecord>>> {
        self.folders.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EmailRepository for InMemoryEmailRepository {
    async fn first_email(&self, folder: &str) -> Result<Option<EmailRecord>> {
        Ok(self
            .lock()
            .get(folder)
            .and_then(|records| records.first())
            .cloned())
    }

    async fn archive_email(&self, folder: &str, uid: &MessageUid) -> Result<bool> {
        let mut folders = self.lock();

        let Some(records) = folders.get_mut(folder) else {
            return Ok(false);
        };
        let Some(index) = records.iter().position(|r| r.uid() == uid) else {
            return Ok(false);
        };

        let record = records.remove(index);
        folders
            .entry(self.archive_folder.clone())
            .or_default()
            .push(record);
        Ok(true)
    }
}
