//! Retrieval configuration with sensible defaults.
//!
//! [`SearchConfig`] controls the search provider, HTTP pool limits and
//! timeouts, retry policies, rate limits, and the domain tables used for
//! source quality classification. The defaults favour failing fast.

use crate::error::SearchError;
use crate::quality::DomainTiers;
use crate::retry::RetryPolicy;
use std::fmt;

/// Default search provider endpoint (Serper-compatible JSON API).
pub const DEFAULT_ENDPOINT: &str = "https://google.serper.dev/search";

/// Hard upper bound on results per search call.
pub const MAX_RESULTS_CAP: usize = 10;

/// Configuration for the retrieval pipeline.
///
/// Use [`Default::default()`] and override fields as needed.
#[derive(Clone)]
pub struct SearchConfig {
    /// Provider API key, sent as `X-API-KEY`. Required for searches only.
    pub api_key: Option<String>,
    /// Provider endpoint URL.
    pub endpoint: String,
    /// Geographic location hint sent to the provider (`gl`).
    pub country: String,
    /// Interface language hint sent to the provider (`hl`).
    pub language: String,
    /// Default number of results per search, clamped to [`MAX_RESULTS_CAP`].
    pub max_results: usize,
    /// Total per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Connect timeout in seconds. Must be shorter than the total timeout.
    pub connect_timeout_seconds: u64,
    /// Maximum requests in flight through the transport at once. Further
    /// requests wait for a free slot; they never fail because of it.
    pub max_connections: usize,
    /// Maximum idle keep-alive connections retained per host.
    pub max_idle_per_host: usize,
    /// Retry policy for search provider calls.
    pub search_retry: RetryPolicy,
    /// Retry policy for page fetches.
    pub fetch_retry: RetryPolicy,
    /// Search provider budget in requests per minute.
    pub search_requests_per_minute: u32,
    /// Page fetch budget in requests per minute.
    pub fetch_requests_per_minute: u32,
    /// Custom User-Agent string. If `None`, one of a built-in list of
    /// browser User-Agents is chosen when the transport is built.
    pub user_agent: Option<String>,
    /// Domain tables for source quality classification.
    pub domain_tiers: DomainTiers,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            country: "us".to_owned(),
            language: "en".to_owned(),
            max_results: MAX_RESULTS_CAP,
            timeout_seconds: 20,
            connect_timeout_seconds: 10,
            max_connections: 20,
            max_idle_per_host: 10,
            search_retry: RetryPolicy::search_default(),
            fetch_retry: RetryPolicy::fetch_default(),
            search_requests_per_minute: 60,
            fetch_requests_per_minute: 60,
            user_agent: None,
            domain_tiers: DomainTiers::default(),
        }
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("country", &self.country)
            .field("language", &self.language)
            .field("max_results", &self.max_results)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .field("max_connections", &self.max_connections)
            .field("max_idle_per_host", &self.max_idle_per_host)
            .field("search_retry", &self.search_retry)
            .field("fetch_retry", &self.fetch_retry)
            .field("search_requests_per_minute", &self.search_requests_per_minute)
            .field("fetch_requests_per_minute", &self.fetch_requests_per_minute)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_results`, `timeout_seconds`, `connect_timeout_seconds` and
    ///   `max_connections` must be greater than 0
    /// - `connect_timeout_seconds` must be less than `timeout_seconds`
    /// - both rate limits must be greater than 0
    /// - `endpoint` must be an http(s) URL
    ///
    /// A missing API key is not a validation error: it only matters for
    /// searches and is reported by [`SearchConfig::require_api_key`].
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.connect_timeout_seconds == 0 {
            return Err(SearchError::Config(
                "connect_timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.connect_timeout_seconds >= self.timeout_seconds {
            return Err(SearchError::Config(
                "connect_timeout_seconds must be less than timeout_seconds".into(),
            ));
        }
        if self.max_connections == 0 {
            return Err(SearchError::Config(
                "max_connections must be greater than 0".into(),
            ));
        }
        if self.search_requests_per_minute == 0 || self.fetch_requests_per_minute == 0 {
            return Err(SearchError::Config(
                "requests_per_minute must be greater than 0".into(),
            ));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(SearchError::Config(
                "endpoint must start with http:// or https://".into(),
            ));
        }
        Ok(())
    }

    /// The provider API key.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if no non-empty key is configured.
    pub fn require_api_key(&self) -> Result<&str, SearchError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(SearchError::Config(
                "SERPER_API_KEY is not set; add it to the environment or config file".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_config_has_sensible_values() {
        let config = SearchConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.country, "us");
        assert_eq!(config.language, "en");
        assert_eq!(config.max_results, 10);
        assert_eq!(config.timeout_seconds, 20);
        assert_eq!(config.connect_timeout_seconds, 10);
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.max_idle_per_host, 10);
        assert_eq!(config.search_requests_per_minute, 60);
        assert_eq!(config.fetch_requests_per_minute, 60);
        assert_eq!(config.search_retry.max_retries, 3);
        assert_eq!(config.fetch_retry.base_delay, Duration::from_millis(500));
        assert!(config.api_key.is_none());
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_max_results_rejected() {
        let config = SearchConfig {
            max_results: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_results"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn connect_timeout_must_be_shorter_than_total() {
        let config = SearchConfig {
            connect_timeout_seconds: 20,
            timeout_seconds: 20,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("connect_timeout_seconds"));
    }

    #[test]
    fn zero_connections_rejected() {
        let config = SearchConfig {
            max_connections: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_connections"));
    }

    #[test]
    fn zero_rate_limit_rejected() {
        let config = SearchConfig {
            fetch_requests_per_minute: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("requests_per_minute"));
    }

    #[test]
    fn non_http_endpoint_rejected() {
        let config = SearchConfig {
            endpoint: "ftp://search.example".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("endpoint"));
    }

    #[test]
    fn missing_api_key_is_config_error() {
        let config = SearchConfig::default();
        let err = config.require_api_key().unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
        assert!(err.to_string().contains("SERPER_API_KEY"));
    }

    #[test]
    fn blank_api_key_is_config_error() {
        let config = SearchConfig {
            api_key: Some("   ".into()),
            ..Default::default()
        };
        assert!(config.require_api_key().is_err());
    }

    #[test]
    fn present_api_key_is_returned() {
        let config = SearchConfig {
            api_key: Some("secret-key".into()),
            ..Default::default()
        };
        assert_eq!(config.require_api_key().ok(), Some("secret-key"));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = SearchConfig {
            api_key: Some("secret-key".into()),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }
}
