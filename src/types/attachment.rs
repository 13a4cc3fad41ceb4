//! Attachment metadata.

use super::{AttachmentId, DataResponse};
use serde::{Deserialize, Serialize};
use url::Url;

/// Stored attachment with a short-lived download link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: AttachmentId,
    pub filename: String,
    pub content_type: String,
    /// Size in bytes.
    pub size: u64,
    /// Expiry as reported by the service, e.g. `Fri, 23 Jun 2025 02:29:13 GMT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    /// Pre-signed URL, valid for a single download.
    pub download_url: Url,
}

pub type GetAttachmentResponse = DataResponse<Attachment>;
