//! Tools exposed to the external reasoning component.
//!
//! Each tool takes JSON arguments and returns a bounded [`ToolResult`]
//! whose content is pretty JSON (or markdown where asked for).
//!
//! | Tool | Wraps |
//! |------|-------|
//! | `web_search` | [`sift_search::SearchGateway::search`] |
//! | `fetch_url` | [`sift_search::PageFetcher::fetch_with_quotes`] |
//! | `extract_quotes` | [`sift_search::quotes`] |
//! | `compose_answer` | answer normalization, no I/O |
//! | `analyze_document` | an injected [`crate::document::DocumentAnalyzer`] |

pub mod analyze_document;
pub mod compose_answer;
pub mod extract_quotes;
pub mod fetch_url;
pub mod registry;
pub mod types;
pub mod web_search;

pub use analyze_document::AnalyzeDocumentTool;
pub use compose_answer::{
    AnswerQuote, AnswerSource, ComposeAnswerTool, ComposedAnswer, Confidence, SearchMethod,
    compose_answer, format_markdown,
};
pub use extract_quotes::ExtractQuotesTool;
pub use fetch_url::FetchUrlTool;
pub use registry::ToolRegistry;
pub use types::{DEFAULT_MAX_BYTES, Tool, ToolResult, truncate_output};
pub use web_search::WebSearchTool;

use crate::error::{Result, SiftError};
use serde_json::Value;

/// A required, non-blank string argument.
pub(crate) fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    let value = args
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| SiftError::ToolValidation(format!("missing required argument: {key}")))?;
    if value.trim().is_empty() {
        return Err(SiftError::ToolValidation(format!("{key} must not be empty")));
    }
    Ok(value)
}

/// An optional string argument; blank strings count as absent.
pub(crate) fn optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// An optional non-negative integer argument.
pub(crate) fn optional_u64(args: &Value, key: &str) -> Result<Option<u64>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v.as_u64().map(Some).ok_or_else(|| {
            SiftError::ToolValidation(format!("{key} must be a non-negative integer"))
        }),
    }
}

/// A site list given either as `"a.com, b.org"` or `["a.com", "b.org"]`.
pub(crate) fn site_list(args: &Value, key: &str) -> Result<Vec<String>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(sift_search::parse_site_list(s)),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::trim).map(str::to_owned).ok_or_else(|| {
                    SiftError::ToolValidation(format!("{key} entries must be strings"))
                })
            })
            .filter(|site| !matches!(site, Ok(s) if s.is_empty()))
            .collect(),
        Some(_) => Err(SiftError::ToolValidation(format!(
            "{key} must be a comma-separated string or a list of strings"
        ))),
    }
}
