//! Error types for the sift tool layer.
//!
//! Each error variant carries a stable error code (SCREAMING_SNAKE_CASE)
//! that is included in the Display output and accessible via [`SiftError::code()`].

/// Stable error codes for programmatic error handling.
pub mod error_codes {
    /// Invalid or missing configuration.
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

    /// Tool arguments failed validation.
    pub const TOOL_VALIDATION: &str = "TOOL_VALIDATION";

    /// Tool execution failed.
    pub const TOOL_FAILED: &str = "TOOL_FAILED";

    /// The document analyzer could not produce an answer.
    pub const DOCUMENT_FAILED: &str = "DOCUMENT_FAILED";

    /// Filesystem read or write failed.
    pub const IO_ERROR: &str = "IO_ERROR";
}

/// Errors produced by the sift tool layer.
///
/// The Display impl formats as `[CODE] message`.
#[derive(Debug, thiserror::Error)]
pub enum SiftError {
    /// Invalid or missing configuration.
    #[error("[{}] {}", error_codes::CONFIG_INVALID, .0)]
    Config(String),

    /// Tool arguments failed validation.
    #[error("[{}] {}", error_codes::TOOL_VALIDATION, .0)]
    ToolValidation(String),

    /// Tool execution failed.
    #[error("[{}] {}", error_codes::TOOL_FAILED, .0)]
    Tool(String),

    /// The document analyzer could not produce an answer.
    #[error("[{}] {}", error_codes::DOCUMENT_FAILED, .0)]
    Document(String),

    /// Filesystem read or write failed.
    #[error("[{}] {}", error_codes::IO_ERROR, .0)]
    Io(String),
}

impl SiftError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => error_codes::CONFIG_INVALID,
            Self::ToolValidation(_) => error_codes::TOOL_VALIDATION,
            Self::Tool(_) => error_codes::TOOL_FAILED,
            Self::Document(_) => error_codes::DOCUMENT_FAILED,
            Self::Io(_) => error_codes::IO_ERROR,
        }
    }

    /// Returns the inner message without the code prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Config(m)
            | Self::ToolValidation(m)
            | Self::Tool(m)
            | Self::Document(m)
            | Self::Io(m) => m,
        }
    }
}

impl From<std::io::Error> for SiftError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<sift_search::SearchError> for SiftError {
    fn from(e: sift_search::SearchError) -> Self {
        match e {
            sift_search::SearchError::Config(m) => Self::Config(m),
            other => Self::Tool(other.to_string()),
        }
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, SiftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_prefix() {
        let err = SiftError::ToolValidation("missing 'query'".into());
        assert_eq!(err.to_string(), "[TOOL_VALIDATION] missing 'query'");
        assert_eq!(err.code(), "TOOL_VALIDATION");
        assert_eq!(err.message(), "missing 'query'");
    }

    #[test]
    fn every_variant_has_a_distinct_code() {
        let errors = [
            SiftError::Config(String::new()),
            SiftError::ToolValidation(String::new()),
            SiftError::Tool(String::new()),
            SiftError::Document(String::new()),
            SiftError::Io(String::new()),
        ];
        let mut codes: Vec<_> = errors.iter().map(SiftError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn search_config_errors_keep_their_category() {
        let err: SiftError = sift_search::SearchError::Config("bad timeout".into()).into();
        assert_eq!(err.code(), error_codes::CONFIG_INVALID);
        assert_eq!(err.message(), "bad timeout");

        let err: SiftError = sift_search::SearchError::Closed.into();
        assert_eq!(err.code(), error_codes::TOOL_FAILED);
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: SiftError = io.into();
        assert_eq!(err.code(), error_codes::IO_ERROR);
        assert!(err.message().contains("gone"));
    }
}
