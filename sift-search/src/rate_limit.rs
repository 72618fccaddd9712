//! Minimum-interval rate limiting for outbound API calls.
//!
//! Each external API class (search provider, page fetches) gets its own
//! [`RateLimiter`]. A limiter blocks the calling task until at least
//! `60 / requests_per_minute` seconds have passed since the previous call
//! was released. Waiting callers queue on an async mutex, which hands the
//! lock out in FIFO order.

use crate::error::{Result, SearchError};
use crate::retry::millis;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Minimum-interval rate limiter, shared across tasks by reference or `Arc`.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    /// When the previous caller was released. Held across the wait so the
    /// check and the update form one critical section.
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing `requests_per_minute` calls per minute.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `requests_per_minute` is zero.
    pub fn new(requests_per_minute: u32) -> Result<Self> {
        if requests_per_minute == 0 {
            return Err(SearchError::Config(
                "requests_per_minute must be greater than 0".into(),
            ));
        }
        Ok(Self::with_interval(
            Duration::from_secs(60) / requests_per_minute,
        ))
    }

    /// Create a limiter with an explicit minimum interval between calls.
    pub fn with_interval(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// The enforced minimum interval between consecutive calls.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until a call is allowed, then record it.
    pub async fn wait_if_needed(&self) {
        let mut last_call = self.last_call.lock().await;

        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::trace!(wait_ms = millis(wait), "rate limiter waiting");
                tokio::time::sleep(wait).await;
            }
        }

        *last_call = Some(Instant::now());
    }
}

/// External API classes that are rate limited independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiClass {
    /// Calls to the search provider API.
    Search,
    /// Page fetches from arbitrary sites.
    Fetch,
}

impl fmt::Display for ApiClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search => f.write_str("search"),
            Self::Fetch => f.write_str("fetch"),
        }
    }
}

/// The set of limiters for every [`ApiClass`], constructed once per process.
#[derive(Debug, Clone)]
pub struct RateLimiters {
    search: Arc<RateLimiter>,
    fetch: Arc<RateLimiter>,
}

impl RateLimiters {
    /// Build limiters from per-minute budgets.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if either budget is zero.
    pub fn new(search_per_minute: u32, fetch_per_minute: u32) -> Result<Self> {
        Ok(Self {
            search: Arc::new(RateLimiter::new(search_per_minute)?),
            fetch: Arc::new(RateLimiter::new(fetch_per_minute)?),
        })
    }

    /// The limiter guarding the given API class.
    pub fn get(&self, class: ApiClass) -> Arc<RateLimiter> {
        match class {
            ApiClass::Search => Arc::clone(&self.search),
            ApiClass::Fetch => Arc::clone(&self.fetch),
        }
    }
}
