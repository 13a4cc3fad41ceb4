//! Long-poll defaults for inbox and SMS searches.

use crate::types::{SearchInboxParams, SearchSmsMessagesParams};
use chrono::{DateTime, Utc};
use std::time::Duration;

#[cfg(feature = "tracing")]
use tracing::debug;

/// Default look-back window for searches without a start filter (15 minutes).
pub const DEFAULT_LOOKBACK: Duration = Duration::from_secs(15 * 60);
/// Default ceiling for a waiting search (5 minutes).
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(5 * 60);
/// Default redirect cap for searches; the service redirects while it waits.
pub const DEFAULT_MAX_REDIRECTS: usize = 99999;

/// Defaults applied to `search_inbox` and `search_sms_messages`.
///
/// Searches wait server-side for a matching message by default. The policy
/// decides how far back to look when the caller gives no start filter, how
/// long the client lets a waiting request run, and how many redirects it
/// follows while the service keeps the poll alive.
///
/// ```rust
/// use mailisk::LongPollPolicy;
/// use std::time::Duration;
///
/// let policy = LongPollPolicy::default()
///     .with_lookback(Duration::from_secs(60))
///     .with_max_wait(Duration::from_secs(30));
///
/// assert_eq!(policy.max_redirects, 99999);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongPollPolicy {
    /// How far back an unfiltered search looks (default: 15 minutes).
    pub lookback: Duration,
    /// Timeout for waiting searches without an explicit one (default: 5 minutes).
    pub max_wait: Duration,
    /// Redirect cap when the caller gives none (default: 99999).
    pub max_redirects: usize,
}

impl Default for LongPollPolicy {
    fn default() -> Self {
        Self {
            lookback: DEFAULT_LOOKBACK,
            max_wait: DEFAULT_MAX_WAIT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl LongPollPolicy {
    /// Set the look-back window.
    pub fn with_lookback(mut self, lookback: Duration) -> Self {
        self.lookback = lookback;
        self
    }

    /// Set the default timeout for waiting searches.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Set the default redirect cap.
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Fill in `from_timestamp` and `wait` for an inbox search.
    ///
    /// `from_timestamp` becomes `floor(now) - lookback` when unset; `wait`
    /// becomes `true` unless it is exactly `false`.
    pub fn resolve_inbox_params(
        &self,
        mut params: SearchInboxParams,
        now: DateTime<Utc>,
    ) -> SearchInboxParams {
        if params.from_timestamp.is_none() {
            params.from_timestamp = Some(now.timestamp().saturating_sub(self.lookback_secs()));
        }
        params.wait = Some(resolve_wait(params.wait));
        params
    }

    /// Fill in `from_date` and `wait` for an SMS search.
    pub fn resolve_sms_params(
        &self,
        mut params: SearchSmsMessagesParams,
        now: DateTime<Utc>,
    ) -> SearchSmsMessagesParams {
        if params.from_date.is_none() {
            let lookback =
                chrono::Duration::from_std(self.lookback).unwrap_or(chrono::Duration::MAX);
            params.from_date = Some(
                now.checked_sub_signed(lookback)
                    .unwrap_or(DateTime::<Utc>::MIN_UTC),
            );
        }
        params.wait = Some(resolve_wait(params.wait));
        params
    }

    /// Merge caller overrides with the policy for a request whose `wait`
    /// flag has already been resolved.
    ///
    /// The redirect cap always gets a value. A timeout is only injected for
    /// waiting requests.
    pub fn resolve_options(&self, wait: bool, options: RequestOptions) -> ResolvedRequestOptions {
        let max_redirects = options.max_redirects.unwrap_or(self.max_redirects);
        let timeout = match options.timeout {
            Some(timeout) => Some(timeout),
            None if wait => Some(self.max_wait),
            None => None,
        };

        #[cfg(feature = "tracing")]
        debug!(
            wait,
            max_redirects,
            timeout_ms = ?timeout.map(|t| t.as_millis()),
            "Resolved search request options"
        );

        ResolvedRequestOptions {
            timeout,
            max_redirects,
        }
    }

    fn lookback_secs(&self) -> i64 {
        i64::try_from(self.lookback.as_secs()).unwrap_or(i64::MAX)
    }
}

fn resolve_wait(wait: Option<bool>) -> bool {
    wait != Some(false)
}

/// Per-call transport overrides for search requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Timeout covering the whole request, redirects included.
    pub timeout: Option<Duration>,
    /// Maximum number of redirects to follow.
    pub max_redirects: Option<usize>,
}

impl RequestOptions {
    /// Create options that defer to the client's policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout for the whole request, redirects included.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the maximum number of redirects to follow.
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = Some(max_redirects);
        self
    }
}

/// Transport settings actually used for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRequestOptions {
    pub timeout: Option<Duration>,
    pub max_redirects: usize,
}
