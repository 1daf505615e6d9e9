//! Connection configuration.
//!
//! A [`ConnectionConfig`] is built once per mailbox, either with
//! [`ConnectionConfig::builder`] or deserialized from a settings file, and is
//! never mutated afterwards.

use std::fmt;
use std::num::NonZeroU16;

use inbox_zero_imap::{Credentials, SessionConfig, Transport};
use serde::Deserialize;

/// Folder read when the caller does not name one.
pub const DEFAULT_FOLDER: &str = "INBOX";

/// Immutable IMAP connection settings.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ConnectionConfigFile")]
pub struct ConnectionConfig {
    host: String,
    port: u16,
    username: String,
    password: String,
    use_tls: bool,
    default_folder: String,
}

impl ConnectionConfig {
    /// Starts a builder with TLS on port 993 and `INBOX` as default folder.
    #[must_use]
    pub fn builder(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> ConnectionConfigBuilder {
        ConnectionConfigBuilder::new(host, username, password)
    }

    /// Server hostname.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Server port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Login name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Login password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Whether the connection is TLS-wrapped.
    #[must_use]
    pub const fn use_tls(&self) -> bool {
        self.use_tls
    }

    /// Folder shown when the caller does not pick one.
    #[must_use]
    pub fn default_folder(&self) -> &str {
        &self.default_folder
    }

    /// Transport variant selected by [`Self::use_tls`].
    #[must_use]
    pub const fn transport(&self) -> Transport {
        Transport::from_use_tls(self.use_tls)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns every invalid field, not just the first one.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.host.trim().is_empty() {
            errors.push(ValidationError::EmptyHost);
        }
        if self.port == 0 {
            errors.push(ValidationError::InvalidPort);
        }
        if self.username.trim().is_empty() {
            errors.push(ValidationError::EmptyUsername);
        }
        if self.password.is_empty() {
            errors.push(ValidationError::EmptyPassword);
        }
        if self.default_folder.trim().is_empty() {
            errors.push(ValidationError::EmptyFolder);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    pub(crate) fn session_config(&self) -> SessionConfig {
        SessionConfig::new(self.host.clone(), self.transport()).with_port(self.port)
    }

    pub(crate) fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("use_tls", &self.use_tls)
            .field("default_folder", &self.default_folder)
            .finish()
    }
}

/// Builder for [`ConnectionConfig`].
#[derive(Debug, Clone)]
pub struct ConnectionConfigBuilder {
    host: String,
    port: Option<u16>,
    username: String,
    password: String,
    use_tls: bool,
    default_folder: String,
}

impl ConnectionConfigBuilder {
    fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: None,
            username: username.into(),
            password: password.into(),
            use_tls: true,
            default_folder: DEFAULT_FOLDER.to_string(),
        }
    }

    /// Sets the port. Defaults to the transport's usual port.
    ///
    /// Port 0 is reported by [`ConnectionConfig::validate`], which every
    /// mail operation runs before connecting.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Chooses between TLS and plaintext.
    #[must_use]
    pub const fn use_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    /// Sets the default folder.
    #[must_use]
    pub fn default_folder(mut self, folder: impl Into<String>) -> Self {
        self.default_folder = folder.into();
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ConnectionConfig {
        let transport = Transport::from_use_tls(self.use_tls);
        ConnectionConfig {
            host: self.host,
            port: self.port.unwrap_or_else(|| transport.default_port()),
            username: self.username,
            password: self.password,
            use_tls: self.use_tls,
            default_folder: self.default_folder,
        }
    }
}

/// On-disk shape of a connection config; optional fields get defaults.
#[derive(Deserialize)]
struct ConnectionConfigFile {
    host: String,
    #[serde(default)]
    port: Option<NonZeroU16>,
    username: String,
    password: String,
    #[serde(default = "default_use_tls")]
    use_tls: bool,
    #[serde(default = "default_folder")]
    default_folder: String,
}

const fn default_use_tls() -> bool {
    true
}

fn default_folder() -> String {
    DEFAULT_FOLDER.to_string()
}

impl From<ConnectionConfigFile> for ConnectionConfig {
    fn from(file: ConnectionConfigFile) -> Self {
        let mut builder = ConnectionConfigBuilder::new(file.host, file.username, file.password)
            .use_tls(file.use_tls)
            .default_folder(file.default_folder);
        if let Some(port) = file.port {
            builder = builder.port(port.get());
        }
        builder.build()
    }
}

/// Validation error for a connection configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Host is empty.
    EmptyHost,
    /// Port is zero.
    InvalidPort,
    /// Username is empty.
    EmptyUsername,
    /// Password is empty.
    EmptyPassword,
    /// Default folder is empty.
    EmptyFolder,
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyHost => "IMAP server is required",
            Self::InvalidPort => "IMAP port must be 1-65535",
            Self::EmptyUsername => "Username is required",
            Self::EmptyPassword => "Password is required",
            Self::EmptyFolder => "Folder name is required",
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyHost => "host",
            Self::InvalidPort => "port",
            Self::EmptyUsername => "username",
            Self::EmptyPassword => "password",
            Self::EmptyFolder => "default_folder",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ValidationError {}
