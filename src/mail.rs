//! Mail transport used to submit virtual emails.
//!
//! [`MailiskClient::send_virtual_email`](crate::MailiskClient::send_virtual_email)
//! fetches the namespace's SMTP settings and hands them to a [`MailTransport`],
//! which opens a [`MailSession`] for a single message. [`LettreTransport`] is
//! the default; tests and callers with their own SMTP stack can plug in any
//! other implementation through
//! [`MailiskClient::send_virtual_email_with`](crate::MailiskClient::send_virtual_email_with).

use crate::errors::MailError;
use crate::types::{SendVirtualEmailParams, SmtpSettings};
use lettre::message::header::{ContentType, HeaderName, HeaderValue};
use lettre::message::{Attachment as MimeAttachment, Mailbox, Mailboxes, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::{ExposeSecret, SecretString};
use std::future::Future;
use std::time::Duration;

#[cfg(feature = "tracing")]
use tracing::debug;

/// Where and how to reach an SMTP relay.
#[derive(Clone)]
pub struct SmtpConnection {
    pub host: String,
    pub port: u16,
    /// Implicit TLS. Virtual SMTP always uses `false`: a plaintext port that
    /// is upgraded with STARTTLS when the relay offers it.
    pub secure: bool,
    pub username: String,
    pub password: SecretString,
}

impl SmtpConnection {
    /// Connection for a namespace relay; never implicit TLS.
    pub fn from_settings(settings: SmtpSettings) -> Self {
        Self {
            host: settings.host,
            port: settings.port,
            secure: false,
            username: settings.username,
            password: settings.password,
        }
    }
}

impl std::fmt::Debug for SmtpConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConnection")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Factory for mail sessions.
///
/// # Example
///
/// ```rust,ignore
/// use mailisk::{MailError, MailSession, MailTransport, SendVirtualEmailParams, SmtpConnection};
///
/// struct Outbox;
/// struct OutboxSession;
///
/// impl MailTransport for Outbox {
///     type Session = OutboxSession;
///
///     async fn open(&self, connection: &SmtpConnection) -> Result<OutboxSession, MailError> {
///         Ok(OutboxSession)
///     }
/// }
///
/// impl MailSession for OutboxSession {
///     async fn send(&self, message: &SendVirtualEmailParams) -> Result<(), MailError> {
///         println!("would send {} to {}", message.subject, message.to);
///         Ok(())
///     }
///
///     async fn close(self) {}
/// }
/// ```
#[allow(async_fn_in_trait)]
pub trait MailTransport: Send + Sync {
    /// Session type produced by [`open`](MailTransport::open).
    type Session: MailSession;

    /// Open a session against the relay described by `connection`.
    fn open(
        &self,
        connection: &SmtpConnection,
    ) -> impl Future<Output = Result<Self::Session, MailError>> + Send;
}

/// Session scoped to a single submission.
#[allow(async_fn_in_trait)]
pub trait MailSession: Send + Sync {
    /// Submit one message.
    fn send(
        &self,
        message: &SendVirtualEmailParams,
    ) -> impl Future<Output = Result<(), MailError>> + Send;

    /// Release the session. Called after every send, successful or not.
    fn close(self) -> impl Future<Output = ()> + Send;
}

/// [`MailTransport`] backed by lettre's async SMTP client on Tokio.
#[derive(Debug, Clone, Default)]
pub struct LettreTransport {
    timeout: Option<Duration>,
}

impl LettreTransport {
    /// Create a transport with lettre's default timeouts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SMTP command timeout. lettre's default applies when unset.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl MailTransport for LettreTransport {
    type Session = LettreSession;

    async fn open(&self, connection: &SmtpConnection) -> Result<LettreSession, MailError> {
        let tls_parameters = TlsParameters::new(connection.host.clone()).map_err(|e| {
            MailError::Connect {
                host: connection.host.clone(),
                port: connection.port,
                source: Box::new(e),
            }
        })?;
        let tls = if connection.secure {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Opportunistic(tls_parameters)
        };

        let credentials = Credentials::new(
            connection.username.clone(),
            connection.password.expose_secret().to_string(),
        );

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(connection.host.as_str())
                .port(connection.port)
                .tls(tls)
                .credentials(credentials);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(Some(timeout));
        }

        #[cfg(feature = "tracing")]
        debug!(
            host = %connection.host,
            port = connection.port,
            secure = connection.secure,
            "Opened SMTP session"
        );

        Ok(LettreSession {
            transport: builder.build(),
        })
    }
}

/// Session produced by [`LettreTransport`].
pub struct LettreSession {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl std::fmt::Debug for LettreSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LettreSession").finish_non_exhaustive()
    }
}

impl MailSession for LettreSession {
    async fn send(&self, message: &SendVirtualEmailParams) -> Result<(), MailError> {
        let email = build_message(message)?;
        self.transport
            .send(email)
            .await
            .map_err(|e| MailError::Send(Box::new(e)))?;
        Ok(())
    }

    async fn close(self) {
        drop(self.transport);

        #[cfg(feature = "tracing")]
        debug!("Closed SMTP session");
    }
}

/// Build the MIME message for a virtual email.
///
/// `text` and `html` together become `multipart/alternative`; attachments
/// wrap the body in `multipart/mixed`.
pub fn build_message(params: &SendVirtualEmailParams) -> Result<Message, MailError> {
    let from: Mailbox = params
        .from
        .parse()
        .map_err(|source| MailError::Address {
            address: params.from.clone(),
            source,
        })?;
    let recipients: Mailboxes =
        params
            .to
            .parse()
            .map_err(|source| MailError::Address {
                address: params.to.clone(),
                source,
            })?;

    let mut builder = Message::builder()
        .from(from)
        .subject(params.subject.clone());
    for recipient in recipients {
        builder = builder.to(recipient);
    }
    for (name, value) in &params.headers {
        let header_name = HeaderName::new_from_ascii(name.clone())
            .map_err(|_| MailError::Header { name: name.clone() })?;
        builder = builder.raw_header(HeaderValue::new(header_name, value.clone()));
    }

    let body = match (&params.text, &params.html) {
        (Some(text), Some(html)) => {
            Body::Multi(MultiPart::alternative_plain_html(text.clone(), html.clone()))
        }
        (Some(text), None) => Body::Single(SinglePart::plain(text.clone())),
        (None, Some(html)) => Body::Single(SinglePart::html(html.clone())),
        (None, None) => Body::Single(SinglePart::plain(String::new())),
    };

    let message = if params.attachments.is_empty() {
        match body {
            Body::Single(part) => builder.singlepart(part),
            Body::Multi(part) => builder.multipart(part),
        }
    } else {
        let mut mixed = match body {
            Body::Single(part) => MultiPart::mixed().singlepart(part),
            Body::Multi(part) => MultiPart::mixed().multipart(part),
        };
        for attachment in &params.attachments {
            let content_type = attachment
                .content_type
                .as_deref()
                .unwrap_or("application/octet-stream");
            let content_type =
                ContentType::parse(content_type).map_err(|source| MailError::ContentType {
                    content_type: content_type.to_string(),
                    source,
                })?;
            mixed = mixed.singlepart(
                MimeAttachment::new(attachment.filename.clone())
                    .body(attachment.content.clone(), content_type),
            );
        }
        builder.multipart(mixed)
    };

    message.map_err(MailError::Build)
}

enum Body {
    Single(SinglePart),
    Multi(MultiPart),
}
