//! Trait definition for pluggable search providers.
//!
//! A provider turns a [`ProviderQuery`] into raw organic results. It owns
//! only the wire mapping; rate limiting, retries, date normalisation and
//! ranking happen in the search gateway.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// A query as sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderQuery {
    /// Query text, including any site filter operators.
    pub q: String,
    /// Number of results requested.
    pub num: usize,
    /// Provider time-range filter (`qdr:d`, `qdr:w`, `qdr:m`, `qdr:y`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tbs: Option<String>,
}

/// One organic result as the provider reports it.
///
/// Missing fields decode as empty strings; `date` is not normalised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub date: String,
    pub domain: String,
}

/// A pluggable search backend.
///
/// Implementations must be `Send + Sync`; one instance serves every
/// concurrent search.
pub trait SearchProvider: Send + Sync {
    /// Run one search attempt.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SearchError`] if the request fails or the payload
    /// cannot be decoded. Implementations do not retry.
    fn search(&self, query: &ProviderQuery) -> impl Future<Output = Result<Vec<RawResult>>> + Send;

    /// Check that the provider can be called at all (credentials present).
    ///
    /// Called once per search, before rate limiting and network access.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SearchError::Config`] if the provider is unusable.
    fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    /// Provider name used in logs.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;

    struct MockProvider {
        results: Vec<RawResult>,
    }

    impl SearchProvider for MockProvider {
        async fn search(&self, _query: &ProviderQuery) -> Result<Vec<RawResult>> {
            if self.results.is_empty() {
                return Err(SearchError::Parse("mock provider failure".into()));
            }
            Ok(self.results.clone())
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }

    fn query() -> ProviderQuery {
        ProviderQuery {
            q: "rust".into(),
            num: 10,
            tbs: None,
        }
    }

    #[test]
    fn mock_provider_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MockProvider>();
    }

    #[tokio::test]
    async fn mock_provider_returns_results() {
        let provider = MockProvider {
            results: vec![RawResult {
                title: "Test".into(),
                link: "https://test.com".into(),
                ..Default::default()
            }],
        };
        let results = provider.search(&query()).await.expect("should succeed");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Test");
        assert!(provider.ensure_ready().is_ok());
    }

    #[tokio::test]
    async fn mock_provider_propagates_errors() {
        let provider = MockProvider { results: vec![] };
        let err = provider.search(&query()).await.expect_err("should fail");
        assert!(err.to_string().contains("mock provider failure"));
    }

    #[test]
    fn raw_result_defaults_missing_fields() {
        let raw: RawResult =
            serde_json::from_str(r#"{"title": "Only title"}"#).expect("deserialize");
        assert_eq!(raw.title, "Only title");
        assert_eq!(raw.link, "");
        assert_eq!(raw.date, "");
        assert_eq!(raw.domain, "");
    }

    #[test]
    fn query_omits_missing_time_filter() {
        let json = serde_json::to_value(query()).expect("serialize");
        assert!(json.get("tbs").is_none());
        assert_eq!(json["num"], 10);
    }
}
