//! HTTP plumbing shared by the client operations.

use crate::errors::{MailiskError, Result};
use reqwest::Response;
use reqwest::header::LOCATION;
use reqwest_middleware::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use url::Url;

#[cfg(feature = "tracing")]
use tracing::debug;

/// Redirect cap for requests that are not long-poll searches.
pub(crate) const DEFAULT_FOLLOW_REDIRECTS: usize = 10;

/// Append percent-encoded path segments to the base URL.
pub(crate) fn endpoint_url(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);

    url.path_segments_mut()
        .map_err(|_| MailiskError::InvalidBaseUrl { url: base.clone() })?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// Replace the query string with the form-encoded `query`.
pub(crate) fn set_query<Q: Serialize + ?Sized>(url: &mut Url, query: &Q) -> Result<()> {
    let encoded = serde_urlencoded::to_string(query)?;
    url.set_query((!encoded.is_empty()).then_some(encoded.as_str()));
    Ok(())
}

/// Send a GET built by `build`, following redirects up to `max_redirects`.
///
/// `build` is called once per hop with the URL of that hop, so the caller
/// decides which hops carry credentials.
pub(crate) async fn get_following<F>(
    build: F,
    mut url: Url,
    max_redirects: usize,
) -> Result<Response>
where
    F: Fn(Url) -> RequestBuilder,
{
    let mut followed = 0usize;

    loop {
        let response = build(url.clone()).send().await?;

        if !response.status().is_redirection() {
            return Ok(response);
        }
        // 304 and friends carry no Location; hand them back untouched.
        let Some(location) = response.headers().get(LOCATION) else {
            return Ok(response);
        };

        let location = location
            .to_str()
            .map_err(|_| MailiskError::InvalidRedirect {
                location: String::from_utf8_lossy(location.as_bytes()).into_owned(),
            })?;
        let next = url
            .join(location)
            .map_err(|_| MailiskError::InvalidRedirect {
                location: location.to_string(),
            })?;

        if followed >= max_redirects {
            return Err(MailiskError::TooManyRedirects { max: max_redirects });
        }
        followed += 1;

        #[cfg(feature = "tracing")]
        debug!(
            status = %response.status(),
            location = %next,
            followed,
            "Following redirect"
        );

        url = next;
    }
}

/// Bound `future` by `timeout`, when one is set.
pub(crate) async fn with_timeout<T, Fut>(timeout: Option<Duration>, future: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    match timeout {
        Some(timeout) => tokio::time::timeout(timeout, future)
            .await
            .map_err(|_| MailiskError::Timeout { timeout })?,
        None => future.await,
    }
}

/// Turn a non-success response into [`MailiskError::Status`].
pub(crate) async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().clone();
    let body = response
        .text()
        .await
        .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
    Err(MailiskError::Status { status, url, body })
}

/// Check the status and deserialize the JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let text = ensure_success(response)
        .await?
        .text()
        .await
        .map_err(MailiskError::ParseResponse)?;

    serde_json::from_str(&text).map_err(MailiskError::DeserializeJson)
}

/// Check the status and return the raw body.
pub(crate) async fn read_bytes(response: Response) -> Result<Vec<u8>> {
    let bytes = ensure_success(response)
        .await?
        .bytes()
        .await
        .map_err(MailiskError::ParseResponse)?;

    Ok(bytes.to_vec())
}
