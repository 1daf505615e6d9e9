//! Domain model types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a message within a folder.
///
/// Opaque to the domain: it is compared and handed back to the server. Only
/// [`MessageUid::server_uid`] reads it as a number, for the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageUid(String);

impl MessageUid {
    /// Wraps a UID string.
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    /// Returns the UID as sent to the server.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the UID as a single nonzero server UID.
    ///
    /// `None` for anything else: empty strings, ranges such as `1:*`, signs,
    /// whitespace or other bytes that are not ASCII digits.
    #[must_use]
    pub fn server_uid(&self) -> Option<u32> {
        if self.0.is_empty() || !self.0.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.0.parse().ok().filter(|uid| *uid > 0)
    }

    /// Returns true if the UID is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<u32> for MessageUid {
    fn from(uid: u32) -> Self {
        Self(uid.to_string())
    }
}

impl From<&str> for MessageUid {
    fn from(uid: &str) -> Self {
        Self::new(uid)
    }
}

impl fmt::Display for MessageUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A message normalized for display.
///
/// Built fresh on every fetch and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    uid: MessageUid,
    subject: String,
    sender: String,
    date: String,
    body_text: String,
    body_html: String,
    attachments: Vec<String>,
}

impl EmailRecord {
    /// Starts a record for the given UID; every other field starts empty.
    #[must_use]
    pub fn builder(uid: impl Into<MessageUid>) -> EmailRecordBuilder {
        EmailRecordBuilder {
            record: Self {
                uid: uid.into(),
                subject: String::new(),
                sender: String::new(),
                date: String::new(),
                body_text: String::new(),
                body_html: String::new(),
                attachments: Vec::new(),
            },
        }
    }

    /// Server UID.
    #[must_use]
    pub const fn uid(&self) -> &MessageUid {
        &self.uid
    }

    /// Subject line (empty when absent).
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Sender address.
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// RFC 3339 date, or empty when the message had no usable date.
    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Plain-text body.
    #[must_use]
    pub fn body_text(&self) -> &str {
        &self.body_text
    }

    /// HTML body.
    #[must_use]
    pub fn body_html(&self) -> &str {
        &self.body_html
    }

    /// Body to display: the text part when present, else the HTML part.
    #[must_use]
    pub fn display_body(&self) -> &str {
        if self.body_text.is_empty() {
            &self.body_html
        } else {
            &self.body_text
        }
    }

    /// Attachment file names, in message order.
    #[must_use]
    pub fn attachments(&self) -> &[String] {
        &self.attachments
    }
}

/// Builder for [`EmailRecord`].
#[derive(Debug, Clone)]
pub struct EmailRecordBuilder {
    record: EmailRecord,
}

impl EmailRecordBuilder {
    /// Sets the subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.record.subject = subject.into();
        self
    }

    /// Sets the sender.
    #[must_use]
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.record.sender = sender.into();
        self
    }

    /// Sets the date.
    #[must_use]
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.record.date = date.into();
        self
    }

    /// Sets the plain-text body.
    #[must_use]
    pub fn body_text(mut self, body: impl Into<String>) -> Self {
        self.record.body_text = body.into();
        self
    }

    /// Sets the HTML body.
    #[must_use]
    pub fn body_html(mut self, body: impl Into<String>) -> Self {
        self.record.body_html = body.into();
        self
    }

    /// Sets the attachment names.
    #[must_use]
    pub fn attachments(mut self, names: Vec<String>) -> Self {
        self.record.attachments = names;
        self
    }

    /// Finishes the record.
    #[must_use]
    pub fn build(self) -> EmailRecord {
        self.record
    }
}
