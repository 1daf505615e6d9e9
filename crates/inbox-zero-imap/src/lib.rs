//! # inbox-zero-imap
//!
//! Transport and session layer for the inbox-zero helper.
//!
//! Protocol work is delegated to [`async_imap`]; this crate decides how the
//! socket is opened and wraps the logged-in session in a small scoped type:
//!
//! - **Closed set of transports**: [`Transport::Tls`] (rustls, webpki roots)
//!   or [`Transport::Plain`] (unencrypted TCP, for local servers)
//! - **Scoped sessions**: [`MailSession::open`] connects, logs in and selects
//!   a folder; [`MailSession::close`] logs out
//! - **Raw fetches**: [`FetchedMessage`] carries the UID and the untouched
//!   message bytes, parsed further up
//!
//! ## Session lifecycle
//!
//! ```text
//! connect ──→ login ──→ select ──→ fetch / uid move ──→ logout
//!    │          │          │
//!    ▼          ▼          ▼
//! transport   Auth    MailboxNotFound
//!  errors
//! ```
//!
//! There is no retry or reconnect: any failure aborts the operation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod connection;
mod error;
pub mod fetch;

pub use connection::{Credentials, ImapStream, MailSession, SessionConfig, Transport};
pub use error::{Error, Result};
pub use fetch::FetchedMessage;
