//! Page fetcher: one rate-limited, retrying GET plus content extraction.
//!
//! Failures are mapped to [`FetchFailure`] and returned inside a
//! [`FetchedPage`]; nothing escapes as an error.

use crate::config::SearchConfig;
use crate::content::{ContentExtractor, HtmlContentExtractor};
use crate::date;
use crate::error::SearchError;
use crate::http::{HttpResponse, HttpTransport};
use crate::quotes::{self, Quote, QuoteOptions};
use crate::rate_limit::{ApiClass, RateLimiter, RateLimiters};
use crate::retry::{RetryPolicy, millis, retry_with_backoff};
use crate::types::{FetchFailure, FetchedPage};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// A fetched page with quotes drawn from its text.
#[derive(Debug, Clone, Serialize)]
pub struct PageWithQuotes {
    pub page: FetchedPage,
    pub quotes: Vec<Quote>,
}

/// Fetches pages through the shared transport.
pub struct PageFetcher {
    transport: Arc<HttpTransport>,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
    extractor: Arc<dyn ContentExtractor>,
    quote_options: QuoteOptions,
}

impl PageFetcher {
    pub fn new(transport: Arc<HttpTransport>, limiter: Arc<RateLimiter>, retry: RetryPolicy) -> Self {
        Self {
            transport,
            limiter,
            retry,
            extractor: Arc::new(HtmlContentExtractor::default()),
            quote_options: QuoteOptions::default(),
        }
    }

    /// Fetcher sharing `transport` and the fetch limiter from `limiters`.
    pub fn from_config(
        config: &SearchConfig,
        transport: Arc<HttpTransport>,
        limiters: &RateLimiters,
    ) -> Self {
        Self::new(transport, limiters.get(ApiClass::Fetch), config.fetch_retry)
    }

    /// Replace the content extractor.
    pub fn with_extractor(mut self, extractor: Arc<dyn ContentExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_quote_options(mut self, options: QuoteOptions) -> Self {
        self.quote_options = options;
        self
    }

    /// Fetch `url` and extract its main content.
    pub async fn fetch(&self, url: &str) -> FetchedPage {
        let start = Instant::now();
        let page = match self.fetch_inner(url).await {
            Ok(page) => page,
            Err((failure, status)) => {
                let mut page = FetchedPage::failed(url, &failure);
                if let Some(status) = status {
                    page.status_code = status;
                }
                page
            }
        };

        let latency_ms = millis(start.elapsed());
        if page.success {
            tracing::info!(
                url,
                success = true,
                status_code = page.status_code,
                latency_ms,
                "url fetched"
            );
        } else {
            tracing::warn!(
                url,
                success = false,
                status_code = page.status_code,
                latency_ms,
                error = page.error_message.as_deref().unwrap_or_default(),
                "url fetched"
            );
        }
        page
    }

    /// Fetch `url` and pull quotes from it: the most relevant to `query`
    /// when one is given, else the first quotable sentences.
    pub async fn fetch_with_quotes(&self, url: &str, query: Option<&str>) -> PageWithQuotes {
        let page = self.fetch(url).await;
        let quotes = if page.success {
            quotes::attributed_quotes(
                &page.text,
                query,
                &self.quote_options,
                &page.title,
                &page.url,
                page.published_date.as_deref().unwrap_or_default(),
            )
        } else {
            Vec::new()
        };
        PageWithQuotes { page, quotes }
    }

    async fn fetch_inner(&self, url: &str) -> Result<FetchedPage, (FetchFailure, Option<u16>)> {
        check_url(url).map_err(|f| (f, None))?;

        let transport = &self.transport;
        let limiter = &self.limiter;
        let response = retry_with_backoff(&self.retry, || async move {
            limiter.wait_if_needed().await;
            transport.get(url).await
        })
        .await
        .map_err(|err| (classify_error(&err), None))?;

        self.extract(url, response)
    }

    fn extract(
        &self,
        url: &str,
        response: HttpResponse,
    ) -> Result<FetchedPage, (FetchFailure, Option<u16>)> {
        check_content_type(response.content_type.as_deref())
            .map_err(|f| (f, Some(response.status)))?;

        let mut content = self
            .extractor
            .extract(&response.body, &response.final_url)
            .map_err(|err| (FetchFailure::Other(err.to_string()), Some(response.status)))?;

        content.date = content.date.map(|raw| {
            let normalized = date::normalize(&raw);
            if normalized.is_empty() { raw } else { normalized }
        });

        Ok(FetchedPage::fetched(url, response.status, content))
    }
}

fn check_url(url: &str) -> Result<(), FetchFailure> {
    match Url::parse(url.trim()) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(parsed) => Err(FetchFailure::Other(format!(
            "unsupported URL scheme '{}'; only http and https are allowed",
            parsed.scheme()
        ))),
        Err(e) => Err(FetchFailure::Other(format!("invalid URL: {e}"))),
    }
}

/// Media types the extractor reads. A missing header is treated as HTML.
const TEXT_MEDIA_TYPES: &[&str] = &["text/html", "application/xhtml+xml", "text/plain"];

fn check_content_type(content_type: Option<&str>) -> Result<(), FetchFailure> {
    let Some(raw) = content_type else {
        return Ok(());
    };
    let media_type = raw
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if TEXT_MEDIA_TYPES.contains(&media_type.as_str()) {
        Ok(())
    } else {
        Err(FetchFailure::Other(format!(
            "unsupported content type '{media_type}'; use analyze_document"
        )))
    }
}

fn classify_error(err: &SearchError) -> FetchFailure {
    match err {
        SearchError::Status { code, .. } => FetchFailure::from_status(*code),
        SearchError::Timeout(_) => FetchFailure::Timeout,
        other => FetchFailure::Other(other.to_string()),
    }
}
