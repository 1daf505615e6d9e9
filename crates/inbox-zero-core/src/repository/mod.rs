//! The mail capability the use cases depend on.
//!
//! [`EmailRepository`] has exactly the two operations the application needs.
//! [`ImapEmailRepository`] talks to a real server through the mail service;
//! [`InMemoryEmailRepository`] keeps folders in memory for tests.

mod imap;
mod memory;

use std::future::Future;
use std::sync::Arc;

use crate::Result;
use crate::model::{EmailRecord, MessageUid};

pub use imap::ImapEmailRepository;
pub use memory::InMemoryEmailRepository;

/// Something that can show the oldest message of a folder and archive one.
pub trait EmailRepository {
    /// Returns the first message of `folder` in server order, if any.
    fn first_email(&self, folder: &str)
    -> impl Future<Output = Result<Option<EmailRecord>>> + Send;

    /// Archives the message `uid` of `folder`. Returns whether anything moved.
    fn archive_email(
        &self,
        folder: &str,
        uid: &MessageUid,
    ) -> impl Future<Output = Result<bool>> + Send;
}

impl<R: EmailRepository + ?Sized> EmailRepository for Arc<R> {
    fn first_email(&self, folder: &str)
    -> impl Future<Output = Result<Option<EmailRecord>>> + Send {
        (**self).first_email(folder)
    }

    fn archive_email(
        &self,
        folder: &str,
        uid: &MessageUid,
    ) -> impl Future<Output = Result<bool>> + Send {
        (**self).archive_email(folder, uid)
    }
}
