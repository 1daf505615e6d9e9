//! IMAP connection management.
//!
//! This module provides:
//! - Configuration (host, port, transport, credentials)
//! - TLS/plaintext stream abstraction
//! - The scoped, folder-selected session used by every mail operation

mod config;
mod session;
mod stream;

pub use config::{Credentials, SessionConfig, Transport};
pub use session::{MailSession, mailbox_name};
pub use stream::{ImapStream, connect, connect_plain, connect_tls, create_tls_connector};
