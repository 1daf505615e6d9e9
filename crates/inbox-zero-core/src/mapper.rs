//! Conversion of raw server messages into [`EmailRecord`]s.
//!
//! MIME parsing is done by `mail-parser`. Only genuine `text/plain` and
//! `text/html` parts fill the bodies; the parser's text/HTML conversions are
//! not used, so a text-only message has an empty `body_html`.

use chrono::{FixedOffset, NaiveDate, TimeZone};
use inbox_zero_imap::FetchedMessage;
use mail_parser::{Message, MessageParser, MimeHeaders, PartType};

use crate::model::{EmailRecord, MessageUid};
use crate::{MailError, Result};

/// An attachment with its decoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPayload {
    /// File name as declared by the message.
    pub file_name: String,
    /// Decoded content.
    pub contents: Vec<u8>,
}

/// Builds the record for a fetched message.
///
/// # Errors
///
/// Returns [`MailError::DataIntegrity`] if the server did not report a UID
/// for the message.
pub fn to_record(message: &FetchedMessage) -> Result<EmailRecord> {
    let uid = server_uid(message)?;

    let Some(parsed) = MessageParser::default().parse(message.raw.as_slice()) else {
        tracing::warn!(%uid, size = message.raw.len(), "Unparseable message, keeping UID only");
        return Ok(EmailRecord::builder(uid).build());
    };

    let attachments = named_attachments(&parsed)
        .map(|(name, _)| name.to_string())
        .collect();

    Ok(EmailRecord::builder(uid)
        .subject(parsed.subject().unwrap_or_default())
        .sender(sender(&parsed))
        .date(parsed.date().and_then(format_date).unwrap_or_default())
        .body_text(text_body(&parsed))
        .body_html(html_body(&parsed))
        .attachments(attachments)
        .build())
}

/// Extracts the named attachments of a fetched message with their bytes.
///
/// Attachments without a file name are skipped.
#[must_use]
pub fn attachments(message: &FetchedMessage) -> Vec<AttachmentPayload> {
    MessageParser::default()
        .parse(message.raw.as_slice())
        .map(|parsed| {
            named_attachments(&parsed)
                .map(|(name, contents)| AttachmentPayload {
                    file_name: name.to_string(),
                    contents: contents.to_vec(),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn server_uid(message: &FetchedMessage) -> Result<MessageUid> {
    match message.uid {
        Some(uid) if uid > 0 => Ok(MessageUid::from(uid)),
        _ => Err(MailError::DataIntegrity(format!(
            "message {} was fetched without a server UID",
            message.seq
        ))),
    }
}

fn named_attachments<'a>(message: &'a Message<'a>) -> impl Iterator<Item = (&'a str, &'a [u8])> {
    message.attachments().filter_map(|part| {
        part.attachment_name()
            .filter(|name| !name.is_empty())
            .map(|name| (name, part.contents()))
    })
}

fn sender(message: &Message<'_>) -> String {
    message
        .from()
        .and_then(|from| from.first())
        .and_then(|addr| addr.address().or_else(|| addr.name()))
        .unwrap_or_default()
        .to_string()
}

fn text_body(message: &Message<'_>) -> String {
    message
        .text_body
        .iter()
        .filter_map(|id| message.part(*id))
        .find_map(|part| match &part.body {
            PartType::Text(text) => Some(text.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

fn html_body(message: &Message<'_>) -> String {
    message
        .html_body
        .iter()
        .filter_map(|id| message.part(*id))
        .find_map(|part| match &part.body {
            PartType::Html(html) => Some(html.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

/// Renders a header date as RFC 3339, keeping the header's own offset.
fn format_date(date: &mail_parser::DateTime) -> Option<String> {
    let offset_secs = i32::from(date.tz_hour) * 3600 + i32::from(date.tz_minute) * 60;
    let offset = if date.tz_before_gmt {
        FixedOffset::west_opt(offset_secs)?
    } else {
        FixedOffset::east_opt(offset_secs)?
    };

    let local = NaiveDate::from_ymd_opt(
        i32::from(date.year),
        u32::from(date.month),
        u32::from(date.day),
    )?
    .and_hms_opt(
        u32::from(date.hour),
        u32::from(date.minute),
        u32::from(date.second),
    )?;

    offset
        .from_local_datetime(&local)
        .single()
        .map(|dt| dt.to_rfc3339())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fetched(uid: Option<u32>, raw: &str) -> FetchedMessage {
        FetchedMessage::new(1, uid, raw.replace('\n', "\r\n").into_bytes())
    }

    const PLAIN: &str = "From: Sender <sender@test.com>
To: test@test.com
Subject: Hello World
Date: Tue, 05 Mar 2024 10:00:00 +0100
Content-Type: text/plain; charset=utf-8

Test body content
";

    const NO_DATE: &str = "From: sender@test.com
Subject: Undated

No date here
";

    const ALTERNATIVE: &str = "From: sender@test.com
Subject: Both bodies
Date: Mon, 01 Jan 2024 08:30:00 -0500
MIME-Version: 1.0
Content-Type: multipart/alternative; boundary=\"alt\"

--alt
Content-Type: text/plain; charset=utf-8

Plain version
--alt
Content-Type: text/html; charset=utf-8

<p>HTML version</p>
--alt--
";

    const WITH_ATTACHMENTS: &str = "From: sender@test.com
Subject: Email with Attachment
MIME-Version: 1.0
Content-Type: multipart/mixed; boundary=\"mix\"

--mix
Content-Type: text/plain; charset=utf-8

Email with attachment
--mix
Content-Type: application/octet-stream
Content-Transfer-Encoding: base64
Content-Disposition: attachment; filename=\"test.txt\"

VGVzdCBmaWxlIGNvbnRlbnQ=
--mix
Content-Type: application/pdf
Content-Transfer-Encoding: base64
Content-Disposition: attachment; filename=\"report.pdf\"

JVBERi0=
--mix
Content-Type: application/octet-stream
Content-Transfer-Encoding: base64
Content-Disposition: attachment

AAEC
--mix--
";

    #[test]
    fn test_plain_message() {
        let record = to_record(&fetched(Some(11), PLAIN)).unwrap();

        assert_eq!(record.uid().as_str(), "11");
        assert_eq!(record.subject(), "Hello World");
        assert_eq!(record.sender(), "sender@test.com");
        assert_eq!(record.date(), "2024-03-05T10:00:00+01:00");
        assert!(record.body_text().contains("Test body content"));
        assert_eq!(record.body_html(), "");
        assert!(record.attachments().is_empty());
    }

    #[test]
    fn test_missing_uid_is_data_integrity_error() {
        let err = to_record(&fetched(None, PLAIN)).unwrap_err();
        assert!(matches!(err, MailError::DataIntegrity(_)));
    }

    #[test]
    fn test_zero_uid_is_data_integrity_error() {
        let err = to_record(&fetched(Some(0), PLAIN)).unwrap_err();
        assert!(matches!(err, MailError::DataIntegrity(_)));
    }

    #[test]
    fn test_missing_date_is_empty() {
        let record = to_record(&fetched(Some(3), NO_DATE)).unwrap();
        assert_eq!(record.date(), "");
        assert_eq!(record.subject(), "Undated");
    }

    #[test]
    fn test_missing_subject_is_empty() {
        let record = to_record(&fetched(Some(3), "From: a@b.c\n\nbody\n")).unwrap();
        assert_eq!(record.subject(), "");
    }

    #[test]
    fn test_alternative_keeps_both_bodies() {
        let record = to_record(&fetched(Some(5), ALTERNATIVE)).unwrap();

        assert!(record.body_text().contains("Plain version"));
        assert!(record.body_html().contains("<p>HTML version</p>"));
        assert_eq!(record.date(), "2024-01-01T08:30:00-05:00");
    }

    #[test]
    fn test_named_attachments_in_order() {
        let record = to_record(&fetched(Some(8), WITH_ATTACHMENTS)).unwrap();

        assert_eq!(record.attachments(), ["test.txt", "report.pdf"]);
        assert!(record.body_text().contains("Email with attachment"));
    }

    #[test]
    fn test_attachment_payloads_are_decoded() {
        let payloads = attachments(&fetched(Some(8), WITH_ATTACHMENTS));

        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0].file_name, "test.txt");
        assert_eq!(payloads[0].contents, b"Test file content");
        assert_eq!(payloads[1].file_name, "report.pdf");
        assert_eq!(payloads[1].contents, b"%PDF-");
    }

    #[test]
    fn test_empty_raw_keeps_uid() {
        let record = to_record(&FetchedMessage::new(1, Some(2), Vec::new())).unwrap();
        assert_eq!(record.uid().as_str(), "2");
        assert_eq!(record.subject(), "");
    }
}
