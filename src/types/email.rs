//! Email records and inbox search parameters.

use super::{AttachmentId, SearchResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Address with an optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    /// Email address.
    pub address: String,
    /// Display name, if one is specified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Attachment reference carried on a received [`Email`].
///
/// Pass `id` to [`MailiskClient::download_attachment`](crate::MailiskClient::download_attachment)
/// to fetch the content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailAttachment {
    pub id: AttachmentId,
    pub filename: String,
    pub content_type: String,
    /// Size in bytes.
    pub size: u64,
}

/// Email delivered to a namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email {
    /// Namespace scoped ID.
    pub id: String,
    /// Sender of email.
    pub from: EmailAddress,
    /// Recipients of email.
    pub to: Vec<EmailAddress>,
    /// Carbon-copied recipients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<Vec<EmailAddress>>,
    /// Blind carbon-copied recipients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcc: Option<Vec<EmailAddress>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Content that was sent in HTML format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Content that was sent in plain text format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// When this email was received.
    pub received_date: DateTime<Utc>,
    /// Unix timestamp (s) when this email was received.
    pub received_timestamp: i64,
    /// Unix timestamp (s) when this email will be deleted.
    pub expires_timestamp: i64,
    /// Spam score as reported by SpamAssassin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spam_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<EmailAttachment>,
}

/// Filters for [`MailiskClient::search_inbox`](crate::MailiskClient::search_inbox).
///
/// Unset fields are omitted from the query. `from_timestamp` and `wait` are
/// filled in by the client when left unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchInboxParams {
    /// Maximum number of emails returned, used with `offset` for pagination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Number of emails to skip, used with `limit` for pagination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Starting unix timestamp in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_timestamp: Option<i64>,
    /// Ending unix timestamp in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_timestamp: Option<i64>,
    /// The `to` address must start with this.
    ///
    /// `foo` matches `foobar@namespace.mailisk.net` but not `barfoo@namespace.mailisk.net`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_addr_prefix: Option<String>,
    /// The `from` address must include this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_addr_includes: Option<String>,
    /// Case-insensitive subject substring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_includes: Option<String>,
    /// Keep the request open until at least one email matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait: Option<bool>,
}

impl SearchInboxParams {
    /// Create empty filters; the client fills in the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the number of emails to skip.
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Only emails received at or after this Unix timestamp (s).
    pub fn with_from_timestamp(mut self, timestamp: i64) -> Self {
        self.from_timestamp = Some(timestamp);
        self
    }

    /// Only emails received at or before this Unix timestamp (s).
    pub fn with_to_timestamp(mut self, timestamp: i64) -> Self {
        self.to_timestamp = Some(timestamp);
        self
    }

    /// Only emails whose recipient address starts with `prefix`.
    pub fn with_to_addr_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.to_addr_prefix = Some(prefix.into());
        self
    }

    /// Only emails whose sender address contains `needle`.
    pub fn with_from_addr_includes(mut self, needle: impl Into<String>) -> Self {
        self.from_addr_includes = Some(needle.into());
        self
    }

    /// Only emails whose subject contains `needle`.
    pub fn with_subject_includes(mut self, needle: impl Into<String>) -> Self {
        self.subject_includes = Some(needle.into());
        self
    }

    /// Set the long-poll flag. Only `false` disables waiting.
    pub fn with_wait(mut self, wait: bool) -> Self {
        self.wait = Some(wait);
        self
    }
}

pub type SearchInboxResponse = SearchResponse<SearchInboxParams, Email>;

/// File attached to an outgoing virtual email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingAttachment {
    pub filename: String,
    pub content: Vec<u8>,
    /// MIME type; `application/octet-stream` when unset.
    pub content_type: Option<String>,
}

impl OutgoingAttachment {
    /// Create an attachment from raw bytes.
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            content_type: None,
        }
    }

    /// Set the MIME type. Default: `application/octet-stream`.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Message submitted through a namespace's virtual SMTP relay.
///
/// `to` must be an address in the namespace, e.g.
/// `john@mynamespace.mailisk.net`. This is not checked client-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendVirtualEmailParams {
    pub from: String,
    pub to: String,
    pub subject: String,
    /// Plaintext version of the message.
    pub text: Option<String>,
    /// HTML version of the message.
    pub html: Option<String>,
    /// Extra headers added verbatim.
    pub headers: BTreeMap<String, String>,
    pub attachments: Vec<OutgoingAttachment>,
}

impl SendVirtualEmailParams {
    /// Create a message with no body. `to` may list several comma-separated addresses.
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            text: None,
            html: None,
            headers: BTreeMap::new(),
            attachments: Vec::new(),
        }
    }

    /// Set the plain text body.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the HTML body.
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Add a custom header, replacing any previous value for `name`.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Append an attachment.
    pub fn with_attachment(mut self, attachment: OutgoingAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_email() {
        let json = r#"{
            "id": "email-123",
            "from": {"address": "sender@example.com", "name": "Sender"},
            "to": [{"address": "recipient@test-namespace.mailisk.net"}],
            "subject": "Test Email",
            "html": "<p>Test content</p>",
            "text": "Test content",
            "received_date": "2025-06-20T10:15:30.000Z",
            "received_timestamp": 1750414530,
            "expires_timestamp": 1753006530,
            "spam_score": 0.4,
            "attachments": [
                {"id": "att-1", "filename": "a.txt", "content_type": "text/plain", "size": 12}
            ]
        }"#;

        let email: Email = serde_json::from_str(json).unwrap();
        assert_eq!(email.id, "email-123");
        assert_eq!(email.from.name.as_deref(), Some("Sender"));
        assert_eq!(email.to[0].name, None);
        assert_eq!(email.cc, None);
        assert_eq!(email.received_date.timestamp(), 1750414530);
        assert_eq!(email.spam_score, Some(0.4));
        assert_eq!(email.attachments[0].id.as_str(), "att-1");
    }

    #[test]
    fn test_email_without_attachments() {
        let json = r#"{
            "id": "email-1",
            "from": {"address": "a@example.com"},
            "to": [],
            "received_date": "2025-06-20T10:15:30Z",
            "received_timestamp": 1750414530,
            "expires_timestamp": 1753006530
        }"#;

        let email: Email = serde_json::from_str(json).unwrap();
        assert!(email.attachments.is_empty());
        assert_eq!(email.subject, None);
    }

    #[test]
    fn test_unset_filters_are_omitted() {
        let params = SearchInboxParams::new()
            .with_to_addr_prefix("john")
            .with_wait(false);
        let query = serde_urlencoded::to_string(&params).unwrap();
        assert_eq!(query, "to_addr_prefix=john&wait=false");
    }
}
