//! Rate limit information from GitHub API responses.
//!
//! GitHub signals both its primary and secondary rate limits through response
//! headers. `RateLimitInfo` captures the `X-RateLimit-*` family, while
//! [`RateLimitWait`] combines it with `Retry-After` to decide how long the
//! transport must suspend before repeating a request.

use std::time::Duration;

use http::HeaderMap;
use http::header::RETRY_AFTER;

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";

/// Rate limit information extracted from GitHub API response headers.
///
/// # Example
///
/// ```
/// use prfetch::github::rate_limit::RateLimitInfo;
///
/// let info = RateLimitInfo::new(5000, 0, 1_700_000_060);
/// assert!(info.is_exhausted());
/// assert_eq!(info.seconds_until_reset(1_700_000_000), 60);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Maximum requests allowed in the current window.
    limit: u32,
    /// Remaining requests in the current window.
    remaining: u32,
    /// Unix timestamp when the rate limit resets.
    reset_at: u64,
}

impl RateLimitInfo {
    /// Creates a new rate limit info instance.
    #[must_use]
    pub const fn new(limit: u32, remaining: u32, reset_at: u64) -> Self {
        Self {
            limit,
            remaining,
            reset_at,
        }
    }

    /// Reads the `X-RateLimit-*` headers, returning `None` unless all three
    /// are present and numeric.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let limit = header_number(headers, LIMIT_HEADER)?;
        let remaining = header_number(headers, REMAINING_HEADER)?;
        let reset_at = header_number(headers, RESET_HEADER)?;
        Some(Self::new(
            u32::try_from(limit).ok()?,
            u32::try_from(remaining).ok()?,
            reset_at,
        ))
    }

    /// Returns the maximum requests allowed in the current window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the remaining requests in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Returns the Unix timestamp when the rate limit resets.
    #[must_use]
    pub const fn reset_at(&self) -> u64 {
        self.reset_at
    }

    /// Returns true if the rate limit has been exhausted.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Seconds between `now_unix` and the reset, or 0 once it has passed.
    #[must_use]
    pub const fn seconds_until_reset(&self, now_unix: u64) -> u64 {
        self.reset_at.saturating_sub(now_unix)
    }
}

/// Server hints describing how long to wait after a rate-limited response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitWait {
    retry_after: Option<Duration>,
    info: Option<RateLimitInfo>,
}

impl RateLimitWait {
    /// Collects the wait hints carried by a response's headers.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            retry_after: header_number(headers, RETRY_AFTER.as_str()).map(Duration::from_secs),
            info: RateLimitInfo::from_headers(headers),
        }
    }

    /// Builds a wait from explicit parts.
    #[must_use]
    pub const fn new(retry_after: Option<Duration>, info: Option<RateLimitInfo>) -> Self {
        Self { retry_after, info }
    }

    /// The `X-RateLimit-*` snapshot, when the response carried one.
    #[must_use]
    pub const fn info(&self) -> Option<RateLimitInfo> {
        self.info
    }

    /// True when the headers alone say the caller is rate limited.
    #[must_use]
    pub fn signals_limit(&self) -> bool {
        self.retry_after.is_some() || self.info.is_some_and(|snapshot| snapshot.is_exhausted())
    }

    /// Resolves the suspension: `Retry-After` wins, then the reset
    /// timestamp (at least one second), then `fallback`.
    #[must_use]
    pub fn duration(&self, now_unix: u64, fallback: Duration) -> Duration {
        if let Some(retry_after) = self.retry_after {
            return retry_after;
        }
        match self.info {
            Some(info) if info.is_exhausted() => {
                Duration::from_secs(info.seconds_until_reset(now_unix).max(1))
            }
            _ => fallback,
        }
    }
}

fn header_number(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}
