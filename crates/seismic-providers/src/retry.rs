//! Bounded retry on upstream throttling.
//!
//! Only HTTP 429 is retried. The wait before each retry honours a numeric
//! `Retry-After` header (capped), otherwise it backs off exponentially from
//! one second. Transport failures and every other status end the loop at once.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::ProviderResult;
use crate::provider::BoxFuture;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

/// Retry limits applied to throttled requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Upper bound for a server-provided `Retry-After`.
    pub retry_after_cap: Duration,
    /// Upper bound for the exponential backoff.
    pub backoff_cap: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            retry_after_cap: Duration::from_secs(Self::DEFAULT_RETRY_AFTER_CAP_SECS),
            backoff_cap: Duration::from_secs(Self::DEFAULT_BACKOFF_CAP_SECS),
        }
    }
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    pub const DEFAULT_RETRY_AFTER_CAP_SECS: u64 = 10;
    pub const DEFAULT_BACKOFF_CAP_SECS: u64 = 4;

    /// Returns the wait before retrying after `attempt` (0-based) was throttled.
    ///
    /// A `Retry-After` that is a non-negative integer number of seconds wins,
    /// capped at `retry_after_cap`. Anything else (absent, HTTP date, garbage)
    /// falls back to `min(2^attempt, backoff_cap)` seconds.
    pub fn delay_for(&self, attempt: u32, retry_after: Option<&str>) -> Duration {
        match retry_after.and_then(parse_retry_after) {
            Some(delay) => delay.min(self.retry_after_cap),
            None => {
                let secs = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
                Duration::from_secs(secs).min(self.backoff_cap)
            }
        }
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// Suspends the current task between retries.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()>;
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Sends `request`, retrying while the upstream answers 429.
///
/// Returns the last response received, which may itself be a 429 once the
/// attempts are exhausted. Transport errors are returned immediately.
pub async fn send_with_retry(
    transport: &dyn HttpTransport,
    sleeper: &dyn Sleeper,
    policy: &RetryPolicy,
    request: &HttpRequest,
) -> ProviderResult<HttpResponse> {
    let attempts = policy.attempts();
    let mut attempt = 0;

    loop {
        let response = transport.get(request).await?;
        debug!(attempt, status = response.status, "Upstream responded");

        if !response.is_rate_limited() || attempt + 1 >= attempts {
            return Ok(response);
        }

        let delay = policy.delay_for(attempt, response.retry_after.as_deref());
        warn!(
            attempt,
            delay_ms = delay.as_millis() as u64,
            retry_after = ?response.retry_after,
            "Upstream rate limited, retrying"
        );
        sleeper.sleep(delay).await;
        attempt += 1;
    }
}
