//! # sift-search
//!
//! Citation-grade retrieval: web search ranked by source trust, page
//! fetching with main-content extraction, and verbatim quote selection.
//!
//! ## Design
//!
//! - One pooled [`HttpTransport`] with split connect/total timeouts and a
//!   bounded number of requests in flight
//! - Per-API [`RateLimiter`]s enforcing a minimum interval between calls
//! - Retry as data: a [`RetryPolicy`] applied by [`retry::retry_with_backoff`]
//! - Dates normalised to `YYYY-MM-DD` by an ordered rule table ([`date`])
//! - Sources classified into [`QualityTier`]s and ranked by (tier, recency)
//! - Gateways never fail: errors are carried in [`SearchResponse`] and
//!   [`FetchedPage`]
//!
//! ## Security
//!
//! - The provider API key is redacted from `Debug` output and never logged
//! - Only http and https URLs are fetched
//!
//! ## Example
//!
//! ```no_run
//! # async fn example() -> sift_search::Result<()> {
//! use sift_search::{Retrieval, SearchConfig, SearchRequest};
//!
//! let config = SearchConfig {
//!     api_key: Some("key".into()),
//!     ..Default::default()
//! };
//! let retrieval = Retrieval::new(&config)?;
//! let response = retrieval.search.search(&SearchRequest::new("rust ownership")).await;
//! for result in &response.results {
//!     println!("[{}] {}: {}", result.tier(), result.title, result.url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod content;
pub mod date;
pub mod error;
pub mod gateway;
pub mod http;
pub mod provider;
pub mod providers;
pub mod quality;
pub mod quotes;
pub mod rate_limit;
pub mod retry;
pub mod types;

pub use config::SearchConfig;
pub use content::{ContentExtractor, HtmlContentExtractor};
pub use error::{Result, SearchError};
pub use gateway::{PageFetcher, PageWithQuotes, SearchGateway, SearchRequest, parse_site_list};
pub use http::HttpTransport;
pub use provider::SearchProvider;
pub use quality::{DomainTiers, QualityTier};
pub use quotes::{Quote, QuoteOptions};
pub use rate_limit::{ApiClass, RateLimiter, RateLimiters};
pub use retry::RetryPolicy;
pub use types::{ExtractedContent, FetchFailure, FetchedPage, SearchResponse, SearchResult};

use std::sync::Arc;

/// The retrieval pipeline wired together over one shared transport.
pub struct Retrieval {
    pub transport: Arc<HttpTransport>,
    pub limiters: RateLimiters,
    pub search: SearchGateway,
    pub fetcher: PageFetcher,
}

impl Retrieval {
    /// Validate `config` and build the transport, limiters and gateways.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        config.validate()?;
        let transport = Arc::new(HttpTransport::new(config)?);
        let limiters = RateLimiters::new(
            config.search_requests_per_minute,
            config.fetch_requests_per_minute,
        )?;
        let search = SearchGateway::from_config(config, Arc::clone(&transport), &limiters);
        let fetcher = PageFetcher::from_config(config, Arc::clone(&transport), &limiters);

        Ok(Self {
            transport,
            limiters,
            search,
            fetcher,
        })
    }

    /// Stop the transport. In-flight requests finish; new ones fail.
    pub fn shutdown(&self) {
        self.transport.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retrieval_validates_config() {
        let config = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = Retrieval::new(&config).err().expect("invalid config");
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn retrieval_builds_without_api_key() {
        assert!(Retrieval::new(&SearchConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn search_without_key_reports_config_error() {
        let retrieval = Retrieval::new(&SearchConfig::default()).expect("valid config");
        let response = retrieval.search.search(&SearchRequest::new("test")).await;
        assert!(response.results.is_empty());
        assert!(
            response
                .error
                .as_deref()
                .is_some_and(|e| e.contains("SERPER_API_KEY"))
        );
    }

    #[tokio::test]
    async fn shutdown_stops_fetches() {
        let retrieval = Retrieval::new(&SearchConfig::default()).expect("valid config");
        retrieval.shutdown();
        let page = retrieval.fetcher.fetch("https://example.com").await;
        assert!(!page.success);
    }
}
