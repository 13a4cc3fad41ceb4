//! Error types for Mailisk client operations.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Main error type for Mailisk client operations.
///
/// Errors are surfaced exactly as the transport reported them; the client
/// never retries or substitutes a default value.
#[derive(Debug, Error)]
pub enum MailiskError {
    /// Failed to build HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    BuildHttpClient(#[source] reqwest::Error),

    /// The configured base URL cannot carry path segments.
    #[error("Base URL cannot be used for API requests: {url}")]
    InvalidBaseUrl { url: Url },

    /// Error parsing a request URL.
    #[error("Error building Mailisk request URL: {0}")]
    BuildRequestUrl(#[from] url::ParseError),

    /// Error encoding query parameters.
    #[error("Error encoding query parameters: {0}")]
    EncodeQuery(#[from] serde_urlencoded::ser::Error),

    /// Failed to send HTTP request.
    #[error("Failed to send HTTP request: {0}")]
    HttpRequest(#[from] reqwest_middleware::Error),

    /// Mailisk answered with a non-success status.
    #[error("Request to {url} failed with status {status}: {body}")]
    Status {
        status: StatusCode,
        url: Url,
        body: String,
    },

    /// The request did not complete within its timeout.
    #[error("Request timed out after {:.1}s", timeout.as_secs_f64())]
    Timeout { timeout: Duration },

    /// The redirect chain exceeded its cap.
    #[error("Exceeded maximum of {max} redirects")]
    TooManyRedirects { max: usize },

    /// A redirect response carried no usable `Location` header.
    #[error("Invalid redirect location: {location}")]
    InvalidRedirect { location: String },

    /// Failed to read the response body.
    #[error("Failed to parse response: {0}")]
    ParseResponse(#[source] reqwest::Error),

    /// Failed to deserialize JSON response.
    #[error("Failed to deserialize JSON response: {0}")]
    DeserializeJson(#[from] serde_json::Error),

    /// Virtual SMTP submission failed.
    #[error("Mail transport error: {0}")]
    Mail(#[from] MailError),
}

impl MailiskError {
    /// Returns true if the request was cut off by its timeout.
    ///
    /// Long-poll searches surface their five minute ceiling this way.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::HttpRequest(err) => err.is_timeout(),
            _ => false,
        }
    }

    /// HTTP status of a non-success response, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::HttpRequest(err) => err.status(),
            _ => None,
        }
    }
}

/// Boxed error produced by a [`MailTransport`](crate::MailTransport) implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by the mail transport while submitting a virtual email.
///
/// The underlying error is kept as the [`source`](std::error::Error::source);
/// for [`LettreTransport`](crate::LettreTransport) failures it is a
/// `lettre::transport::smtp::Error`, reachable through [`smtp_error`](Self::smtp_error).
#[derive(Debug, Error)]
pub enum MailError {
    /// Could not configure a session for the SMTP relay.
    #[error("Failed to open SMTP session to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: BoxError,
    },

    /// A sender or recipient address could not be parsed.
    #[error("Invalid email address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    /// A custom header name was rejected.
    #[error("Invalid header '{name}'")]
    Header { name: String },

    /// An attachment content type could not be parsed.
    #[error("Invalid content type '{content_type}': {source}")]
    ContentType {
        content_type: String,
        #[source]
        source: lettre::message::header::ContentTypeErr,
    },

    /// Building the MIME message failed.
    #[error("Failed to build message: {0}")]
    Build(#[source] lettre::error::Error),

    /// The relay rejected the message or the connection failed mid-send.
    #[error("Failed to send message: {0}")]
    Send(#[source] BoxError),
}

impl MailError {
    /// The SMTP error behind a connect or send failure, if lettre produced it.
    ///
    /// Use it to tell permanent rejections (`5xx`) from transient ones.
    pub fn smtp_error(&self) -> Option<&lettre::transport::smtp::Error> {
        match self {
            Self::Connect { source, .. } | Self::Send(source) => source.downcast_ref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MailiskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_classified() {
        let err = MailiskError::Timeout {
            timeout: Duration::from_secs(300),
        };
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "Request timed out after 300.0s");
    }

    #[test]
    fn test_status_accessor() {
        let err = MailiskError::Status {
            status: StatusCode::UNAUTHORIZED,
            url: Url::parse("https://api.mailisk.com/api/namespaces").unwrap(),
            body: "Unauthorized".to_string(),
        };
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_mail_error_converts() {
        let err: MailiskError = MailError::Send("550 mailbox unavailable".into()).into();
        assert!(matches!(err, MailiskError::Mail(MailError::Send(_))));
        assert_eq!(
            err.to_string(),
            "Mail transport error: Failed to send message: 550 mailbox unavailable"
        );
    }

    #[test]
    fn test_mail_error_keeps_source_chain() {
        use std::error::Error as _;

        let address_err = "not an address"
            .parse::<lettre::Address>()
            .unwrap_err();
        let err: MailiskError = MailError::Address {
            address: "not an address".to_string(),
            source: address_err,
        }
        .into();

        let mail = err.source().expect("mail error should be the source");
        assert!(mail.source().is_some());
        assert!(
            mail.source()
                .unwrap()
                .downcast_ref::<lettre::address::AddressError>()
                .is_some()
        );
    }

    #[test]
    fn test_send_error_keeps_source() {
        use std::error::Error as _;

        let err = MailError::Send(Box::new(std::io::Error::other("connection reset")));
        let source = err.source().expect("send error should have a source");
        assert_eq!(source.to_string(), "connection reset");
        assert!(err.smtp_error().is_none());
    }
}
