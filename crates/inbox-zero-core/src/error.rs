//! Error types for the core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ValidationError;

/// Errors surfaced by the mail operations.
///
/// Each variant keeps the underlying cause and adds only the context the
/// operation already had (host, folder, path).
#[derive(Debug, Error)]
pub enum MailError {
    /// Host unreachable, TLS handshake failed or the connection dropped
    /// before the session was usable.
    #[error("Connection to {host}:{port} failed: {source}")]
    Connection {
        /// Server hostname.
        host: String,
        /// Server port.
        port: u16,
        /// Underlying transport error.
        #[source]
        source: inbox_zero_imap::Error,
    },

    /// The server rejected the credentials.
    #[error("Authentication failed for {username}: {source}")]
    Authentication {
        /// Username that was rejected.
        username: String,
        /// Underlying IMAP error.
        #[source]
        source: inbox_zero_imap::Error,
    },

    /// The requested folder does not exist on the server.
    #[error("Folder not found: {folder}")]
    FolderNotFound {
        /// Folder that was requested.
        folder: String,
        /// Underlying IMAP error.
        #[source]
        source: inbox_zero_imap::Error,
    },

    /// The connection config failed validation; nothing was sent.
    #[error("Invalid configuration: {}", join_messages(.0))]
    InvalidConfig(Vec<ValidationError>),

    /// A server message lacked data the model requires (e.g. its UID).
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// Writing a downloaded attachment failed.
    #[error("Could not write {}: {source}", .path.display())]
    Storage {
        /// File or directory being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Any other IMAP failure once the session was open.
    #[error("IMAP error: {0}")]
    Imap(#[from] inbox_zero_imap::Error),
}

impl MailError {
    /// Classifies a failure to open a session.
    pub(crate) fn on_open(
        err: inbox_zero_imap::Error,
        host: &str,
        port: u16,
        username: &str,
        folder: &str,
    ) -> Self {
        use inbox_zero_imap::Error as ImapError;

        match err {
            ImapError::Auth(_) => Self::Authentication {
                username: username.to_string(),
                source: err,
            },
            ImapError::MailboxNotFound { .. } => Self::FolderNotFound {
                folder: folder.to_string(),
                source: err,
            },
            ImapError::No(_) | ImapError::Bad(_) => Self::Imap(err),
            _ => Self::Connection {
                host: host.to_string(),
                port,
                source: err,
            },
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ValidationError::message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, MailError>;
