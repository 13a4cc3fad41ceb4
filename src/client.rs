//! Mailisk HTTP client.

use crate::errors::{MailiskError, Result};
use crate::mail::{LettreTransport, MailSession, MailTransport, SmtpConnection};
use crate::policy::{LongPollPolicy, RequestOptions, ResolvedRequestOptions};
use crate::request::{self, DEFAULT_FOLLOW_REDIRECTS};
use crate::types::{
    AttachmentId, GetAttachmentResponse, ListNamespacesResponse, ListSmsNumbersResponse,
    SearchInboxParams, SearchInboxResponse, SearchSmsMessagesParams, SearchSmsMessagesResponse,
    SendVirtualEmailParams, SendVirtualSmsParams, SmtpSettingsResponse,
};
use chrono::Utc;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use url::Url;

#[cfg(feature = "tracing")]
use opentelemetry::trace::Status;
#[cfg(feature = "tracing")]
use tracing::Span;
#[cfg(feature = "tracing")]
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Default Mailisk API URL.
pub const DEFAULT_BASE_URL: &str = "https://api.mailisk.com/";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// HTTP basic-auth credentials sent alongside the API key.
#[derive(Clone)]
pub struct BasicAuth {
    pub username: String,
    pub password: SecretString,
}

impl BasicAuth {
    /// Create credentials from a username and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Mailisk HTTP client.
///
/// Every request to the base URL carries the `X-Api-Key` header and, when
/// configured, basic-auth credentials. The client holds no per-call state
/// and is cheap to clone.
///
/// # Example
///
/// ```rust,ignore
/// use mailisk::{MailiskClient, SearchInboxParams};
///
/// let client = MailiskClient::with_api_key("your_api_key")?;
///
/// // Waits up to five minutes for a matching email
/// let response = client
///     .search_inbox(
///         "mynamespace",
///         Some(SearchInboxParams::new().with_to_addr_prefix("john")),
///         None,
///     )
///     .await?;
/// for email in response.data {
///     println!("{}: {:?}", email.from.address, email.subject);
/// }
/// ```
#[derive(Clone)]
pub struct MailiskClient {
    http_client: ClientWithMiddleware,
    api_key: SecretString,
    base_url: Url,
    basic_auth: Option<BasicAuth>,
    long_poll: LongPollPolicy,
}

impl std::fmt::Debug for MailiskClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailiskClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("basic_auth", &self.basic_auth)
            .field("long_poll", &self.long_poll)
            .finish()
    }
}

/// Builder for configuring a [`MailiskClient`].
pub struct MailiskClientBuilder {
    api_key: String,
    base_url: Option<Url>,
    basic_auth: Option<BasicAuth>,
    http_client: Option<ClientWithMiddleware>,
    long_poll: LongPollPolicy,
}

impl MailiskClientBuilder {
    /// Create a new builder with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            basic_auth: None,
            http_client: None,
            long_poll: LongPollPolicy::default(),
        }
    }

    /// Set a custom API base URL.
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Send HTTP basic-auth credentials with every API request.
    pub fn basic_auth(mut self, auth: BasicAuth) -> Self {
        self.basic_auth = Some(auth);
        self
    }

    /// Set a custom HTTP client with middleware.
    ///
    /// Redirects are followed by [`MailiskClient`] itself, so the inner
    /// `reqwest::Client` should be built with `redirect::Policy::none()`.
    pub fn http_client(mut self, client: ClientWithMiddleware) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Override the long-poll defaults used by searches.
    pub fn long_poll(mut self, policy: LongPollPolicy) -> Self {
        self.long_poll = policy;
        self
    }

    /// Build the [`MailiskClient`].
    pub fn build(self) -> Result<MailiskClient> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let client = reqwest::Client::builder()
                    .redirect(reqwest::redirect::Policy::none())
                    .build()
                    .map_err(MailiskError::BuildHttpClient)?;
                ClientBuilder::new(client).build()
            }
        };

        Ok(MailiskClient {
            http_client,
            api_key: SecretString::from(self.api_key),
            base_url,
            basic_auth: self.basic_auth,
            long_poll: self.long_poll,
        })
    }
}

impl MailiskClient {
    /// Create a new Mailisk client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL for the Mailisk API
    /// * `api_key` - API key for authentication
    pub fn new(base_url: impl AsRef<str>, api_key: impl Into<String>) -> Result<Self> {
        let url = Url::parse(base_url.as_ref())?;
        Self::builder(api_key).base_url(url).build()
    }

    /// Create a new client with the default API URL.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    /// Create a builder for configuring the client.
    pub fn builder(api_key: impl Into<String>) -> MailiskClientBuilder {
        MailiskClientBuilder::new(api_key)
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Long-poll defaults applied to searches.
    pub fn long_poll_policy(&self) -> &LongPollPolicy {
        &self.long_poll
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        request::endpoint_url(&self.base_url, segments)
    }

    /// Attach API credentials.
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(API_KEY_HEADER, self.api_key.expose_secret());
        match &self.basic_auth {
            Some(auth) => builder.basic_auth(&auth.username, Some(auth.password.expose_secret())),
            None => builder,
        }
    }

    /// GET against the API; credentials only go to the API's own origin.
    fn api_get(&self, url: Url) -> RequestBuilder {
        let same_origin = url.origin() == self.base_url.origin();
        let builder = self.http_client.get(url);
        if same_origin {
            self.authorize(builder)
        } else {
            builder
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        options: ResolvedRequestOptions,
    ) -> Result<T> {
        request::with_timeout(options.timeout, async {
            let response =
                request::get_following(|hop| self.api_get(hop), url, options.max_redirects)
                    .await?;
            request::read_json(response).await
        })
        .await
    }

    async fn get_plain_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        self.get_json(
            url,
            ResolvedRequestOptions {
                timeout: None,
                max_redirects: DEFAULT_FOLLOW_REDIRECTS,
            },
        )
        .await
    }

    /// List all namespaces that belong to the current account.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "MailiskClient::list_namespaces",
            skip_all,
            fields(count = tracing::field::Empty)
        )
    )]
    pub async fn list_namespaces(&self) -> Result<ListNamespacesResponse> {
        let url = self.endpoint(&["api", "namespaces"])?;
        let response: ListNamespacesResponse = self.get_plain_json(url).await?;

        #[cfg(feature = "tracing")]
        {
            Span::current()
                .record("count", response.data.len())
                .set_status(Status::Ok);
        }

        Ok(response)
    }

    /// Search the inbox of a namespace.
    ///
    /// By default the request waits server-side until at least one email
    /// matches or five minutes pass, and only emails received in the last
    /// 15 minutes are considered. Pass `from_timestamp` or `wait: false` in
    /// `params` to change that; pass `options` to override the timeout or
    /// redirect cap.
    ///
    /// ```rust,ignore
    /// // Last 20 emails in the namespace, without waiting
    /// let response = client
    ///     .search_inbox(
    ///         "mynamespace",
    ///         Some(
    ///             SearchInboxParams::new()
    ///                 .with_wait(false)
    ///                 .with_from_timestamp(0)
    ///                 .with_limit(20),
    ///         ),
    ///         None,
    ///     )
    ///     .await?;
    /// ```
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "MailiskClient::search_inbox",
            skip_all,
            fields(namespace = %namespace, total_count = tracing::field::Empty)
        )
    )]
    pub async fn search_inbox(
        &self,
        namespace: &str,
        params: Option<SearchInboxParams>,
        options: Option<RequestOptions>,
    ) -> Result<SearchInboxResponse> {
        let params = self
            .long_poll
            .resolve_inbox_params(params.unwrap_or_default(), Utc::now());
        let options = self
            .long_poll
            .resolve_options(params.wait.unwrap_or(true), options.unwrap_or_default());

        let mut url = self.endpoint(&["api", "emails", namespace, "inbox"])?;
        request::set_query(&mut url, &params)?;

        let response: SearchInboxResponse = self.get_json(url, options).await?;

        #[cfg(feature = "tracing")]
        {
            Span::current()
                .record("total_count", response.total_count)
                .set_status(Status::Ok);
        }

        Ok(response)
    }

    /// Search SMS messages sent to a phone number.
    ///
    /// Same waiting behaviour as [`search_inbox`](Self::search_inbox); the
    /// default window is expressed as `from_date`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "MailiskClient::search_sms_messages",
            skip_all,
            fields(phone_number = %phone_number, total_count = tracing::field::Empty)
        )
    )]
    pub async fn search_sms_messages(
        &self,
        phone_number: &str,
        params: Option<SearchSmsMessagesParams>,
        options: Option<RequestOptions>,
    ) -> Result<SearchSmsMessagesResponse> {
        let params = self
            .long_poll
            .resolve_sms_params(params.unwrap_or_default(), Utc::now());
        let options = self
            .long_poll
            .resolve_options(params.wait.unwrap_or(true), options.unwrap_or_default());

        let mut url = self.endpoint(&["api", "sms", phone_number, "messages"])?;
        request::set_query(&mut url, &params)?;

        let response: SearchSmsMessagesResponse = self.get_json(url, options).await?;

        #[cfg(feature = "tracing")]
        {
            Span::current()
                .record("total_count", response.total_count)
                .set_status(Status::Ok);
        }

        Ok(response)
    }

    /// List all SMS phone numbers associated with the account.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "MailiskClient::list_sms_numbers", skip_all)
    )]
    pub async fn list_sms_numbers(&self) -> Result<ListSmsNumbersResponse> {
        let url = self.endpoint(&["api", "sms", "numbers"])?;
        self.get_plain_json(url).await
    }

    /// Send a virtual SMS to one of the account's numbers.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "MailiskClient::send_virtual_sms",
            skip_all,
            fields(to_number = %params.to_number)
        )
    )]
    pub async fn send_virtual_sms(&self, params: &SendVirtualSmsParams) -> Result<()> {
        let url = self.endpoint(&["api", "sms", "virtual"])?;
        let response = self
            .authorize(self.http_client.post(url))
            .json(params)
            .send()
            .await?;
        request::ensure_success(response).await?;

        #[cfg(feature = "tracing")]
        Span::current().set_status(Status::Ok);

        Ok(())
    }

    /// Get the virtual SMTP settings for a namespace.
    ///
    /// Not cached; every call hits the API.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "MailiskClient::get_smtp_settings",
            skip_all,
            fields(namespace = %namespace)
        )
    )]
    pub async fn get_smtp_settings(&self, namespace: &str) -> Result<SmtpSettingsResponse> {
        let url = self.endpoint(&["api", "smtp", namespace])?;
        self.get_plain_json(url).await
    }

    /// Send an email through the namespace's virtual SMTP relay.
    ///
    /// Emails can only be delivered to addresses of Mailisk namespaces, e.g.
    /// `john@mynamespace.mailisk.net`.
    ///
    /// ```rust,ignore
    /// client
    ///     .send_virtual_email(
    ///         "mynamespace",
    ///         &SendVirtualEmailParams::new(
    ///             "test@example.com",
    ///             "john@mynamespace.mailisk.net",
    ///             "This is a test",
    ///         )
    ///         .with_text("Testing"),
    ///     )
    ///     .await?;
    /// ```
    pub async fn send_virtual_email(
        &self,
        namespace: &str,
        params: &SendVirtualEmailParams,
    ) -> Result<()> {
        self.send_virtual_email_with(&LettreTransport::default(), namespace, params)
            .await
    }

    /// [`send_virtual_email`](Self::send_virtual_email) through a custom transport.
    ///
    /// The SMTP settings are fetched first; if that fails no session is
    /// opened. Once opened, the session is closed whether or not the send
    /// succeeds.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "MailiskClient::send_virtual_email",
            skip_all,
            fields(namespace = %namespace, to = %params.to)
        )
    )]
    pub async fn send_virtual_email_with<T: MailTransport>(
        &self,
        transport: &T,
        namespace: &str,
        params: &SendVirtualEmailParams,
    ) -> Result<()> {
        let settings = self.get_smtp_settings(namespace).await?.data;
        let connection = SmtpConnection::from_settings(settings);

        let session = transport.open(&connection).await?;
        let sent = session.send(params).await;
        session.close().await;
        sent?;

        #[cfg(feature = "tracing")]
        Span::current().set_status(Status::Ok);

        Ok(())
    }

    /// Get attachment metadata, including a short-lived download URL.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "MailiskClient::get_attachment",
            skip_all,
            fields(attachment_id = %attachment_id)
        )
    )]
    pub async fn get_attachment(&self, attachment_id: &AttachmentId) -> Result<GetAttachmentResponse> {
        let url = self.endpoint(&["api", "attachments", attachment_id.as_str()])?;
        self.get_plain_json(url).await
    }

    /// Download the content of an attachment.
    ///
    /// Fetches the metadata, then GETs the returned `download_url` directly.
    /// That URL is pre-signed, so the second request carries no API key.
    ///
    /// ```rust,ignore
    /// let attachment = &email.attachments[0];
    /// let bytes = client.download_attachment(&attachment.id).await?;
    /// std::fs::write(&attachment.filename, bytes)?;
    /// ```
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "MailiskClient::download_attachment",
            skip_all,
            fields(attachment_id = %attachment_id, size = tracing::field::Empty)
        )
    )]
    pub async fn download_attachment(&self, attachment_id: &AttachmentId) -> Result<Vec<u8>> {
        let attachment = self.get_attachment(attachment_id).await?.data;

        let response = request::get_following(
            |hop| self.http_client.get(hop),
            attachment.download_url,
            DEFAULT_FOLLOW_REDIRECTS,
        )
        .await?;
        let bytes = request::read_bytes(response).await?;

        #[cfg(feature = "tracing")]
        {
            Span::current()
                .record("size", bytes.len())
                .set_status(Status::Ok);
        }

        Ok(bytes)
    }
}
