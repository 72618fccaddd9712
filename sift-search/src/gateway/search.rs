//! Search gateway: provider query, rate limit, retry, normalise, rank.
//!
//! # Pipeline
//!
//! 1. Clamp `max_results` to `1..=10`
//! 2. Append site filters to the query and bucket the recency window
//! 3. Check the provider is usable (API key present), before any network
//! 4. Per attempt: wait on the search rate limiter, then call the provider,
//!    retrying transient failures under the search [`RetryPolicy`]
//! 5. Map raw results: normalise dates, derive missing domains
//! 6. Truncate to `max_results` and rank by (tier, recency)
//!
//! Every failure becomes a [`SearchResponse`] with `error` set.

use crate::config::{MAX_RESULTS_CAP, SearchConfig};
use crate::date;
use crate::error::SearchError;
use crate::http::HttpTransport;
use crate::provider::{ProviderQuery, RawResult, SearchProvider};
use crate::providers::SerperProvider;
use crate::quality::{self, DomainTiers};
use crate::rate_limit::{ApiClass, RateLimiter, RateLimiters};
use crate::retry::{RetryPolicy, millis, retry_with_backoff};
use crate::types::{SearchResponse, SearchResult};
use std::sync::Arc;
use std::time::Instant;

use super::ranking::rank_with;

/// Parameters of one search call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    /// Only return results from roughly the last N days.
    pub recency_days: Option<u32>,
    /// Restrict results to these sites.
    pub sites: Vec<String>,
    /// Exclude results from these sites.
    pub blocked_sites: Vec<String>,
    /// Requested result count; the gateway default when `None`.
    pub max_results: Option<usize>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_recency_days(mut self, days: u32) -> Self {
        self.recency_days = Some(days);
        self
    }

    pub fn with_sites(mut self, sites: Vec<String>) -> Self {
        self.sites = sites;
        self
    }

    pub fn with_blocked_sites(mut self, blocked: Vec<String>) -> Self {
        self.blocked_sites = blocked;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

/// Search gateway over a [`SearchProvider`].
pub struct SearchGateway<P = SerperProvider> {
    provider: P,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
    default_max_results: usize,
    tiers: DomainTiers,
}

impl SearchGateway<SerperProvider> {
    /// Gateway over the Serper provider, sharing `transport` and `limiters`.
    pub fn from_config(
        config: &SearchConfig,
        transport: Arc<HttpTransport>,
        limiters: &RateLimiters,
    ) -> Self {
        Self::new(
            SerperProvider::new(transport, config),
            limiters.get(ApiClass::Search),
            config.search_retry,
        )
        .with_default_max_results(config.max_results)
        .with_domain_tiers(config.domain_tiers.clone())
    }
}

impl<P: SearchProvider> SearchGateway<P> {
    pub fn new(provider: P, limiter: Arc<RateLimiter>, retry: RetryPolicy) -> Self {
        Self {
            provider,
            limiter,
            retry,
            default_max_results: MAX_RESULTS_CAP,
            tiers: DomainTiers::default(),
        }
    }

    pub fn with_default_max_results(mut self, max_results: usize) -> Self {
        self.default_max_results = max_results;
        self
    }

    pub fn with_domain_tiers(mut self, tiers: DomainTiers) -> Self {
        self.tiers = tiers;
        self
    }

    /// Run a search. Never fails: errors are reported in the response.
    pub async fn search(&self, request: &SearchRequest) -> SearchResponse {
        let start = Instant::now();
        let max_results = clamp_max_results(request.max_results.unwrap_or(self.default_max_results));
        let provider_query = ProviderQuery {
            q: build_query(&request.query, &request.sites, &request.blocked_sites),
            num: max_results,
            tbs: request.recency_days.and_then(recency_filter).map(str::to_owned),
        };

        match self.run(&provider_query).await {
            Ok(raw) => {
                let results = self.finish(raw, max_results);
                tracing::info!(
                    query = %request.query,
                    provider = self.provider.name(),
                    num_results = results.len(),
                    latency_ms = millis(start.elapsed()),
                    "search completed"
                );
                SearchResponse::success(provider_query.q, results)
            }
            Err(err) => {
                let message = failure_message(&err);
                tracing::error!(
                    query = %request.query,
                    provider = self.provider.name(),
                    latency_ms = millis(start.elapsed()),
                    error = %message,
                    "search failed"
                );
                SearchResponse::failure(provider_query.q, message)
            }
        }
    }

    async fn run(&self, query: &ProviderQuery) -> Result<Vec<RawResult>, SearchError> {
        if query.q.trim().is_empty() {
            return Err(SearchError::Config("query must not be empty".into()));
        }
        self.provider.ensure_ready()?;

        let provider = &self.provider;
        let limiter = &self.limiter;
        retry_with_backoff(&self.retry, || async move {
            limiter.wait_if_needed().await;
            provider.search(query).await
        })
        .await
    }

    fn finish(&self, raw: Vec<RawResult>, max_results: usize) -> Vec<SearchResult> {
        let results = raw
            .into_iter()
            .take(max_results)
            .map(into_search_result)
            .collect();
        rank_with(results, &self.tiers)
    }
}

fn into_search_result(raw: RawResult) -> SearchResult {
    let date = date::normalize(&raw.date);
    let domain = if raw.domain.trim().is_empty() {
        quality::domain_of(&raw.link)
    } else {
        raw.domain
    };
    SearchResult {
        title: raw.title,
        url: raw.link,
        snippet: raw.snippet,
        published_date: (!date.is_empty()).then_some(date),
        domain,
    }
}

/// Clamp a requested result count to `1..=10`.
pub fn clamp_max_results(requested: usize) -> usize {
    requested.clamp(1, MAX_RESULTS_CAP)
}

/// Provider query text with inclusion and exclusion site filters appended.
///
/// `"q (site:a OR site:b) -site:x -site:y"`. Blank site entries are ignored.
pub fn build_query(query: &str, sites: &[String], blocked_sites: &[String]) -> String {
    let mut q = query.trim().to_owned();

    let sites: Vec<String> = non_blank(sites).map(|s| format!("site:{s}")).collect();
    if !sites.is_empty() {
        q.push_str(&format!(" ({})", sites.join(" OR ")));
    }

    let blocked: Vec<String> = non_blank(blocked_sites).map(|s| format!("-site:{s}")).collect();
    if !blocked.is_empty() {
        q.push(' ');
        q.push_str(&blocked.join(" "));
    }

    q
}

fn non_blank(sites: &[String]) -> impl Iterator<Item = &str> {
    sites.iter().map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Provider time-range bucket for a recency window in days.
pub fn recency_filter(days: u32) -> Option<&'static str> {
    match days {
        0..=1 => Some("qdr:d"),
        2..=7 => Some("qdr:w"),
        8..=30 => Some("qdr:m"),
        31..=365 => Some("qdr:y"),
        _ => None,
    }
}

/// Split a comma-separated site list, trimming entries and dropping blanks.
pub fn parse_site_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn failure_message(err: &SearchError) -> String {
    match err {
        SearchError::Status { code, body } => format!("Search provider error: {code} - {body}"),
        other => format!("Search failed: {other}"),
    }
}
