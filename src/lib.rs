//! # Mailisk
//!
//! Async client for the [Mailisk](https://mailisk.com) email and SMS testing API.
//!
//! Mailisk gives every account isolated inboxes ("namespaces") and SMS numbers
//! that tests can send to and then search. This crate wraps the HTTP API and
//! the per-namespace virtual SMTP relay behind [`MailiskClient`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mailisk::{MailiskClient, SearchInboxParams, SendVirtualEmailParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MailiskClient::with_api_key("your_api_key")?;
//!
//!     client
//!         .send_virtual_email(
//!             "mynamespace",
//!             &SendVirtualEmailParams::new(
//!                 "test@example.com",
//!                 "john@mynamespace.mailisk.net",
//!                 "Password reset",
//!             )
//!             .with_text("Your code is 123456"),
//!         )
//!         .await?;
//!
//!     // Blocks until the email arrives (or five minutes pass)
//!     let inbox = client
//!         .search_inbox(
//!             "mynamespace",
//!             Some(SearchInboxParams::new().with_to_addr_prefix("john")),
//!             None,
//!         )
//!         .await?;
//!     println!("{:?}", inbox.data[0].text);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Waiting searches
//!
//! [`MailiskClient::search_inbox`] and [`MailiskClient::search_sms_messages`]
//! ask the service to hold the request open until a matching message exists.
//! Unless told otherwise they only look at the last 15 minutes, give up after
//! five minutes and follow up to 99999 redirects. These defaults live in
//! [`LongPollPolicy`] and can be replaced with
//! [`MailiskClientBuilder::long_poll`] or per call with [`RequestOptions`].
//!
//! ## Features
//!
//! - `tracing` - OpenTelemetry tracing instrumentation (enabled by default)

pub mod client;
pub mod errors;
pub mod mail;
pub mod policy;
mod request;
pub mod types;

// Re-export commonly used types at the crate root
pub use client::{API_KEY_HEADER, BasicAuth, DEFAULT_BASE_URL, MailiskClient, MailiskClientBuilder};
pub use errors::{BoxError, MailError, MailiskError, Result};
pub use mail::{LettreTransport, MailSession, MailTransport, SmtpConnection};
pub use policy::{LongPollPolicy, RequestOptions, ResolvedRequestOptions};
pub use types::{
    Attachment, AttachmentId, DataResponse, Email, EmailAddress, EmailAttachment,
    GetAttachmentResponse, ListNamespacesResponse, ListResponse, ListSmsNumbersResponse,
    Namespace, OutgoingAttachment, SearchInboxParams, SearchInboxResponse, SearchResponse,
    SearchSmsMessagesParams, SearchSmsMessagesResponse, SendVirtualEmailParams,
    SendVirtualSmsParams, SmsMessage, SmsNumber, SmtpSettings, SmtpSettingsResponse,
};
