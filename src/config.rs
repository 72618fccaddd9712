//! Configuration for the sift tools.
//!
//! [`SiftConfig`] is loaded from TOML and converted into the retrieval
//! pipeline's [`SearchConfig`]. Every section has defaults, so an empty
//! file (or no file at all) is a valid configuration.

use crate::error::{Result, SiftError};
use serde::{Deserialize, Serialize};
use sift_search::{DomainTiers, QuoteOptions, RetryPolicy, SearchConfig};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the search provider API key.
pub const API_KEY_ENV: &str = "SERPER_API_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftConfig {
    /// Search provider settings.
    pub search: SearchSection,
    /// Page fetch settings.
    pub fetch: FetchSection,
    /// Shared HTTP transport settings.
    pub http: HttpSection,
    /// Quote extraction bounds.
    pub quotes: QuoteOptions,
    /// Tool output settings.
    pub tools: ToolsSection,
}

/// Search provider configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// Provider API key. `SERPER_API_KEY` takes precedence when set.
    pub api_key: Option<String>,
    /// Provider endpoint URL.
    pub endpoint: String,
    /// Geographic location hint (`gl`).
    pub country: String,
    /// Interface language hint (`hl`).
    pub language: String,
    /// Default results per search (1-10).
    pub max_results: usize,
    /// Provider budget in requests per minute.
    pub requests_per_minute: u32,
    /// Total attempts per search call.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    pub base_delay_ms: u64,
    /// Domain tables for source quality ranking.
    pub domain_tiers: DomainTiers,
}

impl Default for SearchSection {
    fn default() -> Self {
        let defaults = SearchConfig::default();
        let retry = RetryPolicy::search_default();
        Self {
            api_key: None,
            endpoint: defaults.endpoint,
            country: defaults.country,
            language: defaults.language,
            max_results: defaults.max_results,
            requests_per_minute: defaults.search_requests_per_minute,
            max_retries: retry.max_retries,
            base_delay_ms: duration_ms(retry.base_delay),
            domain_tiers: DomainTiers::default(),
        }
    }
}

impl fmt::Debug for SearchSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchSection")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("country", &self.country)
            .field("language", &self.language)
            .field("max_results", &self.max_results)
            .field("requests_per_minute", &self.requests_per_minute)
            .field("max_retries", &self.max_retries)
            .field("base_delay_ms", &self.base_delay_ms)
            .finish_non_exhaustive()
    }
}

/// Page fetch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSection {
    /// Fetch budget in requests per minute.
    pub requests_per_minute: u32,
    /// Total attempts per fetch.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    pub base_delay_ms: u64,
}

impl Default for FetchSection {
    fn default() -> Self {
        let retry = RetryPolicy::fetch_default();
        Self {
            requests_per_minute: SearchConfig::default().fetch_requests_per_minute,
            max_retries: retry.max_retries,
            base_delay_ms: duration_ms(retry.base_delay),
        }
    }
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    /// Total per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_seconds: u64,
    /// Maximum requests in flight. Extra requests wait for a free slot.
    pub max_connections: usize,
    /// Idle keep-alive connections kept per host.
    pub max_idle_per_host: usize,
    /// Fixed User-Agent. A browser User-Agent is chosen when unset.
    pub user_agent: Option<String>,
}

impl Default for HttpSection {
    fn default() -> Self {
        let defaults = SearchConfig::default();
        Self {
            timeout_seconds: defaults.timeout_seconds,
            connect_timeout_seconds: defaults.connect_timeout_seconds,
            max_connections: defaults.max_connections,
            max_idle_per_host: defaults.max_idle_per_host,
            user_agent: None,
        }
    }
}

/// Tool output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsSection {
    /// Largest tool output in bytes before it is truncated.
    pub max_output_bytes: usize,
    /// Characters of page text included in `fetch_url` output.
    pub max_page_chars: usize,
    /// Document understanding service. `analyze_document` is only offered
    /// when this is set or an analyzer is injected.
    pub document_endpoint: Option<String>,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            max_output_bytes: crate::tools::DEFAULT_MAX_BYTES,
            max_page_chars: 20_000,
            document_endpoint: None,
        }
    }
}

impl SiftConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| SiftError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SiftError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load `path` when given, else defaults, then apply environment
    /// overrides. A `.env` file in the working directory is honoured.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // A missing .env is normal.
        let _ = dotenvy::dotenv();
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_key(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Override the file's API key with a non-blank environment value.
    pub fn apply_env_key(&mut self, env_key: Option<String>) {
        if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
            self.search.api_key = Some(key);
        }
    }

    /// Convert into the retrieval pipeline's configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Config`] if the resulting configuration is invalid.
    pub fn to_search_config(&self) -> Result<SearchConfig> {
        let config = SearchConfig {
            api_key: self.search.api_key.clone().filter(|k| !k.trim().is_empty()),
            endpoint: self.search.endpoint.clone(),
            country: self.search.country.clone(),
            language: self.search.language.clone(),
            max_results: self.search.max_results,
            timeout_seconds: self.http.timeout_seconds,
            connect_timeout_seconds: self.http.connect_timeout_seconds,
            max_connections: self.http.max_connections,
            max_idle_per_host: self.http.max_idle_per_host,
            search_retry: RetryPolicy::new(
                self.search.max_retries,
                Duration::from_millis(self.search.base_delay_ms),
            ),
            fetch_retry: RetryPolicy::new(
                self.fetch.max_retries,
                Duration::from_millis(self.fetch.base_delay_ms),
            ),
            search_requests_per_minute: self.search.requests_per_minute,
            fetch_requests_per_minute: self.fetch.requests_per_minute,
            user_agent: self.http.user_agent.clone(),
            domain_tiers: self.search.domain_tiers.clone(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns the default config file path: `~/.config/sift/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("sift").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("sift")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/sift-config/config.toml")
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
