//! Connection configuration types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Transport used to reach the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// TLS from the start (port 993). **Recommended.**
    #[default]
    Tls,
    /// Unencrypted TCP (port 143). **Not recommended for production.**
    Plain,
}

impl Transport {
    /// Selects the transport from a "use TLS" switch.
    #[must_use]
    pub const fn from_use_tls(use_tls: bool) -> Self {
        if use_tls { Self::Tls } else { Self::Plain }
    }

    /// Returns the default port for this transport.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Tls => 993,
            Self::Plain => 143,
        }
    }

    /// Returns true if the transport encrypts traffic.
    #[must_use]
    pub const fn is_tls(self) -> bool {
        matches!(self, Self::Tls)
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tls => f.write_str("tls"),
            Self::Plain => f.write_str("plain"),
        }
    }
}

/// Where and how to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Transport variant.
    pub transport: Transport,
}

impl SessionConfig {
    /// Creates a configuration on the transport's default port.
    #[must_use]
    pub fn new(host: impl Into<String>, transport: Transport) -> Self {
        Self {
            host: host.into(),
            port: transport.default_port(),
            transport,
        }
    }

    /// Overrides the port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

/// Login credentials. The password never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username for LOGIN.
    pub username: String,
    /// Password for LOGIN.
    pub password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
