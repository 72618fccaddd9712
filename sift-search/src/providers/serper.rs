//! Serper-compatible JSON search API.
//!
//! Requests are `POST {endpoint}` with a JSON body `{q, num, gl, hl, tbs?}`
//! and the key in `X-API-KEY`. Results come back under `organic[]`.

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::http::HttpTransport;
use crate::provider::{ProviderQuery, RawResult, SearchProvider};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: usize,
    gl: &'a str,
    hl: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tbs: Option<&'a str>,
}

#[derive(Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<RawResult>,
}

/// Search provider speaking the Serper wire format.
pub struct SerperProvider {
    transport: Arc<HttpTransport>,
    endpoint: String,
    api_key: Option<String>,
    country: String,
    language: String,
}

impl SerperProvider {
    /// Build a provider from `config`, sending requests through `transport`.
    ///
    /// A missing API key is accepted here and reported by
    /// [`SearchProvider::ensure_ready`].
    pub fn new(transport: Arc<HttpTransport>, config: &SearchConfig) -> Self {
        Self {
            transport,
            endpoint: config.endpoint.clone(),
            api_key: config.require_api_key().ok().map(str::to_owned),
            country: config.country.clone(),
            language: config.language.clone(),
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            SearchError::Config(
                "SERPER_API_KEY is not set; add it to the environment or config file".into(),
            )
        })
    }
}

impl fmt::Debug for SerperProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerperProvider")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("country", &self.country)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl SearchProvider for SerperProvider {
    async fn search(&self, query: &ProviderQuery) -> Result<Vec<RawResult>> {
        let api_key = self.api_key()?;
        let body = SerperRequest {
            q: &query.q,
            num: query.num,
            gl: &self.country,
            hl: &self.language,
            tbs: query.tbs.as_deref(),
        };

        let response = self
            .transport
            .post_json(&self.endpoint, &[("X-API-KEY", api_key)], &body)
            .await?;

        tracing::trace!(bytes = response.body.len(), "provider response received");
        parse_serper_json(&response.body)
    }

    fn ensure_ready(&self) -> Result<()> {
        self.api_key().map(|_| ())
    }

    fn name(&self) -> &'static str {
        "serper"
    }
}

/// Decode a Serper response body into raw results.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] if the body is not a JSON object.
pub fn parse_serper_json(body: &str) -> Result<Vec<RawResult>> {
    serde_json::from_str::<SerperResponse>(body)
        .map(|r| r.organic)
        .map_err(|e| SearchError::Parse(format!("invalid provider response: {e}")))
}
