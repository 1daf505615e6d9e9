//! Raw message retrieval.
//!
//! Messages are fetched whole with `BODY.PEEK[]`, so reading a folder never
//! sets the `\Seen` flag. Parsing the bytes is left to the caller.

use async_imap::types::Fetch;

/// FETCH attributes requested for every message.
pub const FETCH_QUERY: &str = "(UID BODY.PEEK[])";

/// A message as returned by the server, before any MIME parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedMessage {
    /// Sequence number within the selected folder (1-based).
    pub seq: u32,
    /// Server-assigned UID, if the server reported one.
    pub uid: Option<u32>,
    /// Full RFC 5322 message bytes.
    pub raw: Vec<u8>,
}

impl FetchedMessage {
    /// Creates a message from its parts.
    #[must_use]
    pub fn new(seq: u32, uid: Option<u32>, raw: impl Into<Vec<u8>>) -> Self {
        Self {
            seq,
            uid,
            raw: raw.into(),
        }
    }

    pub(crate) fn from_fetch(fetch: &Fetch) -> Self {
        Self {
            seq: fetch.message,
            uid: fetch.uid,
            raw: fetch.body().map(<[u8]>::to_vec).unwrap_or_default(),
        }
    }
}

/// Builds the sequence set covering the first `limit` messages of a folder
/// holding `exists` messages, or `None` when there is nothing to fetch.
///
/// A `limit` of `None` covers the whole folder.
#[must_use]
pub fn first_messages(limit: Option<u32>, exists: u32) -> Option<String> {
    let count = limit.map_or(exists, |n| n.min(exists));
    match count {
        0 => None,
        1 => Some("1".to_string()),
        n => Some(format!("1:{n}")),
    }
}
