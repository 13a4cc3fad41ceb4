//! Request and response records for the Mailisk API.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{self, Display, Formatter};

#[cfg(feature = "tracing")]
use tracing::debug;

mod attachment;
mod email;
mod namespace;
mod sms;
mod smtp;

pub use attachment::{Attachment, GetAttachmentResponse};
pub use email::{
    Email, EmailAddress, EmailAttachment, OutgoingAttachment, SearchInboxParams,
    SearchInboxResponse, SendVirtualEmailParams,
};
pub use namespace::{ListNamespacesResponse, Namespace};
pub use sms::{
    ListSmsNumbersResponse, SearchSmsMessagesParams, SearchSmsMessagesResponse,
    SendVirtualSmsParams, SmsMessage, SmsNumber,
};
pub use smtp::{SmtpSettings, SmtpSettingsResponse};

// =============================================================================
// AttachmentId
// =============================================================================

/// Identifier of an attachment stored by Mailisk.
///
/// Found on [`EmailAttachment::id`] and accepted by
/// [`MailiskClient::get_attachment`](crate::MailiskClient::get_attachment).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentId(String);

impl AttachmentId {
    /// Create a new AttachmentId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AttachmentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AttachmentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for AttachmentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for AttachmentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// =============================================================================
// Envelopes
// =============================================================================

/// Paginated search result.
///
/// `options` echoes the parameters the service actually used, including the
/// defaults filled in by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "O: DeserializeOwned + Default, T: DeserializeOwned"))]
pub struct SearchResponse<O, T> {
    /// Total number of records matching the query.
    pub total_count: u64,
    /// Parameters that were used for the query.
    ///
    /// An echo that is missing or does not match `O` reads as `O::default()`;
    /// it never fails the search.
    #[serde(default, deserialize_with = "lenient_echo")]
    pub options: O,
    /// Records in this page.
    pub data: Vec<T>,
}

fn lenient_echo<'de, D, O>(deserializer: D) -> Result<O, D::Error>
where
    D: Deserializer<'de>,
    O: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(O::deserialize(value).unwrap_or_else(|_e| {
        #[cfg(feature = "tracing")]
        debug!(error = %_e, "Ignoring unreadable options echo");
        O::default()
    }))
}

/// Single-record response wrapped in a `data` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Listing response; `total_count` is not sent by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    pub data: Vec<T>,
}
