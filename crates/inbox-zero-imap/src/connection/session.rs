//! Scoped IMAP session.
//!
//! A `MailSession` is opened already authenticated with a folder selected.
//! Callers finish with [`MailSession::close`], which logs out; if the session
//! is dropped instead, the socket is closed without a LOGOUT.
//!
//! Folder names are given as plain Unicode and encoded with [`mailbox_name`]
//! on the wire.
//!
//! ```ignore
//! use inbox_zero_imap::{Credentials, MailSession, SessionConfig, Transport};
//!
//! let config = SessionConfig::new("imap.example.com", Transport::Tls);
//! let credentials = Credentials::new("user@example.com", "password");
//!
//! let mut session = MailSession::open(&config, &credentials, "INBOX").await?;
//! let outcome = session.fetch_first(Some(1)).await;
//! session.close().await;
//! let messages = outcome?;
//! ```

use futures::TryStreamExt;

use super::config::{Credentials, SessionConfig};
use super::stream::{ImapStream, connect};
use crate::fetch::{FETCH_QUERY, FetchedMessage, first_messages};
use crate::{Error, Result};

/// An authenticated session with one folder selected.
pub struct MailSession {
    inner: async_imap::Session<ImapStream>,
    host: String,
    folder: String,
    exists: u32,
}

impl MailSession {
    /// Connects, logs in and selects `folder`.
    ///
    /// # Errors
    ///
    /// - transport errors ([`Error::is_transport`]) when the host cannot be
    ///   reached or the TLS handshake fails
    /// - [`Error::Auth`] when the server rejects the credentials
    /// - [`Error::MailboxNotFound`] when the folder cannot be selected
    pub async fn open(
        config: &SessionConfig,
        credentials: &Credentials,
        folder: &str,
    ) -> Result<Self> {
        tracing::debug!(
            host = %config.host,
            port = config.port,
            transport = %config.transport,
            "Connecting to IMAP server"
        );
        let stream = connect(config).await?;

        let client = async_imap::Client::new(stream);
        let mut inner = client
            .login(&credentials.username, &credentials.password)
            .await
            .map_err(|(err, _client)| login_error(err))?;

        let mailbox = match inner.select(mailbox_name(folder)).await {
            Ok(mailbox) => mailbox,
            Err(err) => {
                let err = select_error(err, folder);
                if let Err(e) = inner.logout().await {
                    tracing::warn!(?e, host = %config.host, "LOGOUT after failed SELECT failed");
                }
                return Err(err);
            }
        };

        tracing::debug!(host = %config.host, folder, exists = mailbox.exists, "Folder selected");

        Ok(Self {
            inner,
            host: config.host.clone(),
            folder: folder.to_string(),
            exists: mailbox.exists,
        })
    }

    /// Returns the selected folder.
    #[must_use]
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Returns the number of messages the folder held when selected.
    #[must_use]
    pub const fn exists(&self) -> u32 {
        self.exists
    }

    /// Fetches the first `limit` messages in server order (all when `None`).
    ///
    /// # Errors
    ///
    /// Returns an error if the FETCH command fails.
    pub async fn fetch_first(&mut self, limit: Option<u32>) -> Result<Vec<FetchedMessage>> {
        let Some(sequence_set) = first_messages(limit, self.exists) else {
            tracing::debug!(folder = %self.folder, "Nothing to fetch");
            return Ok(Vec::new());
        };

        let fetches: Vec<_> = self
            .inner
            .fetch(&sequence_set, FETCH_QUERY)
            .await?
            .try_collect()
            .await?;

        let mut messages: Vec<FetchedMessage> =
            fetches.iter().map(FetchedMessage::from_fetch).collect();
        messages.sort_by_key(|m| m.seq);

        tracing::debug!(folder = %self.folder, count = messages.len(), "Fetched messages");
        Ok(messages)
    }

    /// Moves the single message `uid` to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the move.
    pub async fn uid_move(&mut self, uid: u32, target: &str) -> Result<()> {
        self.inner.uid_mv(uid.to_string(), mailbox_name(target)).await?;
        tracing::debug!(folder = %self.folder, uid, target, "Message moved");
        Ok(())
    }

    /// Logs out. A failing LOGOUT is logged and otherwise ignored.
    pub async fn close(mut self) {
        match self.inner.logout().await {
            Ok(()) => tracing::debug!(host = %self.host, "Logged out"),
            Err(e) => tracing::warn!(?e, host = %self.host, "LOGOUT failed"),
        }
    }
}

impl std::fmt::Debug for MailSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailSession")
            .field("host", &self.host)
            .field("folder", &self.folder)
            .field("exists", &self.exists)
            .finish_non_exhaustive()
    }
}

/// Encodes a folder name as IMAP modified UTF-7 (RFC 3501 5.1.3).
#[must_use]
pub fn mailbox_name(folder: &str) -> String {
    utf7_imap::encode_utf7_imap(folder.to_string())
}

fn login_error(err: async_imap::error::Error) -> Error {
    use async_imap::error::Error as ImapError;

    match err {
        ImapError::No(text) | ImapError::Bad(text) => Error::Auth(text),
        other => other.into(),
    }
}

fn select_error(err: async_imap::error::Error, folder: &str) -> Error {
    use async_imap::error::Error as ImapError;

    match err {
        ImapError::No(reason) | ImapError::Bad(reason) => Error::MailboxNotFound {
            mailbox: folder.to_string(),
            reason,
        },
        other => other.into(),
    }
}
