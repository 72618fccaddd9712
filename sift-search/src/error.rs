//! Error types for the sift-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. API keys never appear in error messages.

/// Errors that can occur while searching or fetching.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Invalid or missing configuration (e.g. no provider API key).
    ///
    /// Raised before any network attempt.
    #[error("config error: {0}")]
    Config(String),

    /// A request timed out (connect or total deadline).
    #[error("request timed out: {0}")]
    Timeout(String),

    /// A network-level failure: connection refused, reset, or broken mid-body.
    #[error("network error: {0}")]
    Network(String),

    /// The remote answered with a non-success HTTP status.
    #[error("HTTP status {code}: {body}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Response body (truncated).
        body: String,
    },

    /// Failed to parse a provider payload.
    #[error("parse error: {0}")]
    Parse(String),

    /// The transport has been shut down and accepts no further requests.
    #[error("HTTP transport is shut down")]
    Closed,
}

impl SearchError {
    /// Returns `true` if the failure is transient and the call may be retried.
    ///
    /// Timeouts and network errors are retryable, as are 5xx responses and
    /// 429 (rate limited). Every other 4xx fails immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Network(_) => true,
            Self::Status { code, .. } => *code == 429 || (500..600).contains(code),
            Self::Config(_) | Self::Parse(_) | Self::Closed => false,
        }
    }

    /// HTTP status code carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Classify a [`reqwest::Error`] into the crate taxonomy.
    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                code: status.as_u16(),
                body: String::new(),
            }
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Convenience type alias for sift-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_config() {
        let err = SearchError::Config("SERPER_API_KEY is not set".into());
        assert_eq!(err.to_string(), "config error: SERPER_API_KEY is not set");
    }

    #[test]
    fn display_status() {
        let err = SearchError::Status {
            code: 503,
            body: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "HTTP status 503: unavailable");
    }

    #[test]
    fn display_closed() {
        assert_eq!(SearchError::Closed.to_string(), "HTTP transport is shut down");
    }

    #[test]
    fn transient_errors_are_retryable() {
        assert!(SearchError::Timeout("20s".into()).is_retryable());
        assert!(SearchError::Network("connection reset".into()).is_retryable());
    }

    #[test]
    fn server_errors_and_429_are_retryable() {
        for code in [429, 500, 502, 503, 599] {
            let err = SearchError::Status {
                code,
                body: String::new(),
            };
            assert!(err.is_retryable(), "{code} should be retryable");
        }
    }

    #[test]
    fn client_errors_are_not_retryable() {
        for code in [400, 401, 403, 404, 410, 451] {
            let err = SearchError::Status {
                code,
                body: String::new(),
            };
            assert!(!err.is_retryable(), "{code} should not be retryable");
        }
    }

    #[test]
    fn config_parse_and_closed_are_not_retryable() {
        assert!(!SearchError::Config("x".into()).is_retryable());
        assert!(!SearchError::Parse("x".into()).is_retryable());
        assert!(!SearchError::Closed.is_retryable());
    }

    #[test]
    fn status_code_accessor() {
        let err = SearchError::Status {
            code: 404,
            body: String::new(),
        };
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(SearchError::Closed.status_code(), None);
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
