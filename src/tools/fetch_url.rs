//! Fetch URL tool: readable page text plus attributed quotes.

use std::sync::Arc;

use async_trait::async_trait;
use sift_search::{PageWithQuotes, Retrieval};

use crate::error::Result;

use super::types::{Tool, ToolResult, to_json};
use super::{optional_str, required_str};

/// Tool that fetches a web page and extracts its main content.
///
/// Navigation, headers, footers and scripts are stripped. When a `query`
/// is given the quotes are the sentences most relevant to it.
///
/// # Arguments (JSON)
///
/// - `url` (string, required): the http(s) URL to fetch
/// - `query` (string, optional): rank quotes by relevance to this text
pub struct FetchUrlTool {
    retrieval: Arc<Retrieval>,
    max_page_chars: usize,
}

impl FetchUrlTool {
    /// `max_page_chars` bounds the page text included in the output.
    pub fn new(retrieval: Arc<Retrieval>, max_page_chars: usize) -> Self {
        Self {
            retrieval,
            max_page_chars,
        }
    }
}

/// Cut the page text to `max_chars` characters.
fn clip_text(result: &mut PageWithQuotes, max_chars: usize) {
    if let Some((idx, _)) = result.page.text.char_indices().nth(max_chars) {
        result.page.text.truncate(idx);
    }
}

#[async_trait]
impl Tool for FetchUrlTool {
    fn name(&self) -> &str {
        "fetch_url"
    }

    fn description(&self) -> &str {
        "Fetch a web page and return its main text, title, publication date, author \
         and verbatim quotes (at most 120 characters each) suitable for citation."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL to fetch (must start with http:// or https://)"
                },
                "query": {
                    "type": "string",
                    "description": "Optional question used to pick the most relevant quotes"
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult> {
        let url = required_str(&args, "url")?;
        let query = optional_str(&args, "query");

        let mut result = self.retrieval.fetcher.fetch_with_quotes(url, query).await;
        clip_text(&mut result, self.max_page_chars);
        let body = to_json(&result)?;

        Ok(match result.page.error_message {
            Some(error) => ToolResult::failure(error, body),
            None => ToolResult::success(body),
        })
    }
}
