//! # inbox-zero-core
//!
//! Read-and-archive mail logic for the inbox-zero helper.
//!
//! This crate provides:
//! - Connection configuration with validation
//! - The [`EmailRecord`] model built from raw server messages
//! - Mail service functions: fetch the first messages of a folder, archive by
//!   UID or archive whatever is first, download attachments
//! - The [`EmailRepository`] capability with IMAP and in-memory backends
//! - [`ReadFirstEmail`] and [`ArchiveEmail`] operations
//!
//! Every service call opens its own session and logs out before returning.
//! Reads use `BODY.PEEK[]`, so viewing a message never marks it as seen.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
mod error;
pub mod mapper;
pub mod model;
pub mod repository;
pub mod service;
pub mod usecase;

pub use config::{ConnectionConfig, ConnectionConfigBuilder, DEFAULT_FOLDER, ValidationError};
pub use error::{MailError, Result};
pub use mapper::AttachmentPayload;
pub use model::{EmailRecord, EmailRecordBuilder, MessageUid};
pub use repository::{EmailRepository, ImapEmailRepository, InMemoryEmailRepository};
pub use service::{
    DEFAULT_ARCHIVE_FOLDER, archive_by_uid, archive_first, download_attachments, fetch_first,
};
pub use usecase::{ArchiveEmail, ReadFirstEmail};
