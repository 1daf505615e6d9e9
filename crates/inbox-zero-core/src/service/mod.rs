//! Service layer between the use cases and the IMAP session crate.

pub mod mail;

pub use mail::{
    DEFAULT_ARCHIVE_FOLDER, archive_by_uid, archive_first, download_attachments, fetch_first,
};
