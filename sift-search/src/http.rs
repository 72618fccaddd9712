//! Pooled HTTP transport shared by the search gateway and page fetcher.
//!
//! Wraps a keep-alive [`reqwest::Client`] with browser-like headers, split
//! connect and total timeouts, and a bounded number of requests in flight.
//! When every slot is taken, callers wait for one to free up rather than
//! failing. [`HttpTransport::shutdown`] stops new requests while letting
//! in-flight ones finish.

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use rand::seq::SliceRandom;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Browser User-Agent strings; one is picked per transport when none is configured.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// Longest error body kept in a [`SearchError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 500;

/// A fully read HTTP response with a success status.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// URL after redirects.
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// Shared HTTP transport. Construct once and share by `Arc`.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    permits: Semaphore,
    max_connections: usize,
}

impl HttpTransport {
    /// Build a transport from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid or
    /// the client cannot be constructed.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        config.validate()?;

        let ua = match config.user_agent {
            Some(ref custom) => custom.clone(),
            None => random_user_agent().to_owned(),
        };

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .user_agent(ua)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| SearchError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            permits: Semaphore::new(config.max_connections),
            max_connections: config.max_connections,
        })
    }

    /// GET `url`.
    ///
    /// # Errors
    ///
    /// See [`HttpTransport::send`].
    pub async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.send(self.client.get(url)).await
    }

    /// POST `body` as JSON to `url` with extra `headers`.
    ///
    /// # Errors
    ///
    /// See [`HttpTransport::send`].
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &T,
    ) -> Result<HttpResponse> {
        let request = headers
            .iter()
            .fold(self.client.post(url), |req, (name, value)| {
                req.header(*name, *value)
            })
            .json(body);
        self.send(request).await
    }

    /// Send `request` once, waiting for a free slot first.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Closed`] after [`HttpTransport::shutdown`]
    /// - [`SearchError::Timeout`] / [`SearchError::Network`] for transport failures
    /// - [`SearchError::Status`] for non-success responses, with the body truncated
    pub async fn send(&self, request: reqwest::RequestBuilder) -> Result<HttpResponse> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| SearchError::Closed)?;

        let response = request
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest(&e))?;

        let status = response.status();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest(&e))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), url = %final_url, "non-success response");
            return Err(SearchError::Status {
                code: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        Ok(HttpResponse {
            status: status.as_u16(),
            final_url,
            content_type,
            body,
        })
    }

    /// Stop accepting requests. In-flight requests complete; later sends
    /// fail with [`SearchError::Closed`].
    pub fn shutdown(&self) {
        self.permits.close();
        tracing::debug!("HTTP transport shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.permits.is_closed()
    }

    /// Requests that may start right now without waiting.
    pub fn available_slots(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn max_connections(&self) -> usize {
        self.max_connections
    }
}

/// Select a random User-Agent string from the built-in list.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        .unwrap_or(USER_AGENTS[0])
}
