//! Core types for search results, fetched pages, and extracted content.

use crate::quality::{self, QualityTier};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single ranked search result.
///
/// Serialises with the provider-neutral field names `title`, `link`,
/// `snippet`, `date` and `domain`; an unknown date is an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result page.
    pub title: String,
    /// The URL of the result.
    #[serde(rename = "link")]
    pub url: String,
    /// A text snippet summarising the page content.
    pub snippet: String,
    /// Canonical `YYYY-MM-DD` publication date, if known.
    #[serde(
        rename = "date",
        default,
        serialize_with = "serialize_date",
        deserialize_with = "deserialize_date"
    )]
    pub published_date: Option<String>,
    /// Display domain (lowercase, no `www.`).
    #[serde(default)]
    pub domain: String,
}

impl SearchResult {
    /// Whether the result carries a publication date.
    pub fn has_date(&self) -> bool {
        self.published_date.as_deref().is_some_and(|d| !d.is_empty())
    }

    /// Quality tier of this result under the default domain tables.
    pub fn tier(&self) -> QualityTier {
        quality::classify(&self.url, self.has_date())
    }
}

fn serialize_date<S: serde::Serializer>(date: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(date.as_deref().unwrap_or_default())
}

fn deserialize_date<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(raw.filter(|s| !s.is_empty()))
}

/// Uniform outcome of a search call.
///
/// Failures never escape as errors: they produce an empty result list with
/// `error` set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    /// The query sent to the provider, with site filters appended.
    pub query_executed: String,
    pub num_results: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    /// A successful response. `num_results` is taken from `results`.
    pub fn success(query_executed: impl Into<String>, results: Vec<SearchResult>) -> Self {
        Self {
            num_results: results.len(),
            results,
            query_executed: query_executed.into(),
            error: None,
        }
    }

    /// A failed response with no results.
    pub fn failure(query_executed: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            query_executed: query_executed.into(),
            num_results: 0,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Main content pulled out of a page body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractedContent {
    /// Readable text with boilerplate removed.
    pub text: String,
    pub title: Option<String>,
    /// Publication date as found in the page, not yet normalised.
    pub date: Option<String>,
    pub author: Option<String>,
}

/// Why a page fetch failed, as shown to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// HTTP 403.
    Forbidden,
    /// HTTP 404.
    NotFound,
    /// HTTP 429.
    RateLimited,
    /// HTTP 5xx.
    ServerError(u16),
    /// Any other non-success status.
    Http(u16),
    /// No response before the deadline.
    Timeout,
    /// Everything else: bad URL, network errors, extraction failures.
    Other(String),
}

impl FetchFailure {
    /// Classify a non-success HTTP status code.
    pub fn from_status(code: u16) -> Self {
        match code {
            403 => Self::Forbidden,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError(code),
            _ => Self::Http(code),
        }
    }

    /// The HTTP status that caused the failure, or 0 if none was received.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::RateLimited => 429,
            Self::ServerError(code) | Self::Http(code) => *code,
            Self::Timeout | Self::Other(_) => 0,
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forbidden => f.write_str("Access forbidden (possibly paywall or blocked)"),
            Self::NotFound => f.write_str("Page not found"),
            Self::RateLimited => f.write_str("Rate limited"),
            Self::ServerError(code) => write!(f, "Server error ({code})"),
            Self::Http(code) => write!(f, "HTTP error {code}"),
            Self::Timeout => f.write_str("Request timeout"),
            Self::Other(msg) => write!(f, "Fetch failed: {msg}"),
        }
    }
}

/// A fetched and extracted web page.
///
/// A failed fetch has `success == false`, empty `text`, and `error_message`
/// set. A successful fetch never carries an error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedPage {
    pub url: String,
    pub title: String,
    pub text: String,
    /// Canonical date when it could be normalised, else the raw page value.
    pub published_date: Option<String>,
    pub author: Option<String>,
    pub success: bool,
    /// HTTP status of the final response, 0 when none was received.
    pub status_code: u16,
    pub error_message: Option<String>,
}

impl FetchedPage {
    /// A successful fetch.
    pub fn fetched(url: impl Into<String>, status_code: u16, content: ExtractedContent) -> Self {
        Self {
            url: url.into(),
            title: content.title.unwrap_or_default(),
            text: content.text,
            published_date: content.date,
            author: content.author,
            success: true,
            status_code,
            error_message: None,
        }
    }

    /// A failed fetch.
    pub fn failed(url: impl Into<String>, failure: &FetchFailure) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            text: String::new(),
            published_date: None,
            author: None,
            success: false,
            status_code: failure.status_code(),
            error_message: Some(failure.to_string()),
        }
    }
}
