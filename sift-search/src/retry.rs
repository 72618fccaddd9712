//! Bounded exponential-backoff retry as data.
//!
//! A [`RetryPolicy`] describes how many attempts to make, the base delay,
//! and which failures are worth retrying. [`retry_with_backoff`] applies a
//! policy to any async operation, so call sites never hand-roll retry loops.
//!
//! # Schedule
//!
//! ```text
//! attempt 0 ──fail──► sleep(base) ──► attempt 1 ──fail──► sleep(base * 2) ──► attempt 2 …
//! ```
//!
//! There is no jitter: concurrent callers that fail together retry together.

use crate::error::{Result, SearchError};
use std::future::Future;
use std::time::Duration;

/// Retry policy consumed by [`retry_with_backoff`].
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first. `0` behaves as `1`.
    pub max_retries: u32,
    /// Delay before the second attempt; doubles for each further attempt.
    pub base_delay: Duration,
    /// Decides whether a failure should be retried.
    pub retry_if: fn(&SearchError) -> bool,
}

impl RetryPolicy {
    /// Create a policy that retries [`SearchError::is_retryable`] failures.
    pub const fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            retry_if: SearchError::is_retryable,
        }
    }

    /// Policy used for search provider calls: 3 attempts, 1s base delay.
    pub const fn search_default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }

    /// Policy used for page fetches: 2 attempts, 500ms base delay.
    pub const fn fetch_default() -> Self {
        Self::new(2, Duration::from_millis(500))
    }

    /// Replace the retry predicate.
    pub fn with_predicate(mut self, retry_if: fn(&SearchError) -> bool) -> Self {
        self.retry_if = retry_if;
        self
    }

    /// Number of attempts that will actually be made.
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Delay to sleep after the failed attempt with 0-based index `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let multiplier = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(multiplier)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::search_default()
    }
}

/// Run `operation` under `policy`.
///
/// Returns the first success. A failure the policy does not consider
/// retryable is returned immediately; otherwise the operation is retried
/// until the attempts are exhausted and the **last** failure is returned.
///
/// # Errors
///
/// Returns the error of the final attempt made.
pub async fn retry_with_backoff<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.attempts();
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let last_attempt = attempt + 1 >= attempts;
                if last_attempt || !(policy.retry_if)(&err) {
                    return Err(err);
                }

                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    attempts,
                    delay_ms = millis(delay),
                    error = %err,
                    "retrying after transient failure"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
pub(crate) fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
