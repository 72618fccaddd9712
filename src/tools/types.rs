//! Core tool types.
//!
//! Defines the [`Tool`] trait that all tools implement and [`ToolResult`]
//! for capturing bounded execution output.

use crate::error::{Result, SiftError};
use async_trait::async_trait;
use serde::Serialize;

/// Default maximum output size (100 KB).
pub const DEFAULT_MAX_BYTES: usize = 100 * 1024;

/// Result of a tool execution.
///
/// Contains the output content (bounded to `max_bytes`), success/error status,
/// and a flag indicating whether output was truncated.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    /// Whether the tool execution succeeded.
    pub success: bool,
    /// Output content, usually JSON.
    pub content: String,
    /// Error message if the tool execution failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Whether the output was truncated to fit within max_bytes.
    pub truncated: bool,
}

impl ToolResult {
    /// Create a successful tool result.
    pub fn success(content: String) -> Self {
        Self {
            success: true,
            content,
            error: None,
            truncated: false,
        }
    }

    /// Create a failed tool result with an error message.
    ///
    /// `content` may still carry a structured body describing the failure.
    pub fn failure(error: String, content: String) -> Self {
        Self {
            success: false,
            content,
            error: Some(error),
            truncated: false,
        }
    }

    /// Bound `content` to `max_bytes`, marking the result when cut.
    pub fn bounded(mut self, max_bytes: usize) -> Self {
        let (content, truncated) = truncate_output(&self.content, max_bytes);
        self.content = content;
        self.truncated |= truncated;
        self
    }
}

/// Truncate a string to at most `max_bytes`, respecting UTF-8 boundaries.
///
/// Returns `(truncated_string, was_truncated)`.
pub fn truncate_output(s: &str, max_bytes: usize) -> (String, bool) {
    if s.len() <= max_bytes {
        return (s.to_string(), false);
    }

    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    let truncated = &s[..end];
    (
        format!("{truncated}\n\n[output truncated at {max_bytes} bytes]"),
        true,
    )
}

/// Pretty JSON for tool output.
pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| SiftError::Tool(e.to_string()))
}

/// A tool an external reasoning component can call with JSON arguments.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool name (e.g. "web_search", "fetch_url").
    fn name(&self) -> &str;

    /// Returns a human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// Returns the JSON Schema for the tool's arguments.
    fn schema(&self) -> serde_json::Value;

    /// Execute the tool with the given JSON arguments.
    ///
    /// Retrieval failures are reported in the returned [`ToolResult`].
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::ToolValidation`] for malformed arguments and
    /// other [`SiftError`]s for failures outside the retrieval pipeline.
    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_result_success() {
        let result = ToolResult::success("hello world".to_string());
        assert!(result.success);
        assert_eq!(result.content, "hello world");
        assert!(result.error.is_none());
        assert!(!result.truncated);
    }

    #[test]
    fn tool_result_failure_keeps_body() {
        let result = ToolResult::failure("Page not found".to_string(), "{}".to_string());
        assert!(!result.success);
        assert_eq!(result.content, "{}");
        assert_eq!(result.error.as_deref(), Some("Page not found"));
        assert!(!result.truncated);
    }

    #[test]
    fn bounded_marks_truncation() {
        let result = ToolResult::success("x".repeat(50)).bounded(10);
        assert!(result.truncated);
        assert!(result.content.starts_with("xxxxxxxxxx\n\n[output truncated"));

        let result = ToolResult::success("short".into()).bounded(10);
        assert!(!result.truncated);
        assert_eq!(result.content, "short");
    }

    #[test]
    fn truncate_output_exact_boundary() {
        let (output, truncated) = truncate_output("hello", 5);
        assert_eq!(output, "hello");
        assert!(!truncated);
    }

    #[test]
    fn truncate_output_respects_utf8() {
        // "é" is two bytes; cutting at 1 must back off to 0.
        let (output, truncated) = truncate_output("é", 1);
        assert!(truncated);
        assert!(output.starts_with("\n\n[output truncated at 1 bytes]"));
    }

    #[test]
    fn serializes_without_empty_error() {
        let json = serde_json::to_value(ToolResult::success("ok".into())).expect("serialize");
        assert_eq!(json["success"], true);
        assert!(json.get("error").is_none());
    }
}
