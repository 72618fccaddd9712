//! Web search tool: trust-ranked results from the search gateway.

use std::sync::Arc;

use async_trait::async_trait;
use sift_search::{Retrieval, SearchRequest};

use crate::error::{Result, SiftError};

use super::types::{Tool, ToolResult, to_json};
use super::{optional_u64, required_str, site_list};

/// Tool that searches the web and ranks results by source quality.
///
/// Results come back ordered by quality tier (primary sources, then top
/// journalism, then everything else, undated last) and recency.
///
/// # Arguments (JSON)
///
/// - `query` (string, required): the search query
/// - `recency_days` (integer, optional): restrict to the last N days
/// - `sites` (string or list, optional): only search these domains
/// - `blocked_sites` (string or list, optional): exclude these domains
/// - `max_results` (integer, optional): 1 to 10, default from config
pub struct WebSearchTool {
    retrieval: Arc<Retrieval>,
}

impl WebSearchTool {
    pub fn new(retrieval: Arc<Retrieval>) -> Self {
        Self { retrieval }
    }
}

/// Build a [`SearchRequest`] from tool arguments.
fn parse_request(args: &serde_json::Value) -> Result<SearchRequest> {
    let query = required_str(args, "query")?;
    let mut request = SearchRequest::new(query)
        .with_sites(site_list(args, "sites")?)
        .with_blocked_sites(site_list(args, "blocked_sites")?);

    if let Some(days) = optional_u64(args, "recency_days")? {
        let days = u32::try_from(days)
            .map_err(|_| SiftError::ToolValidation("recency_days is too large".into()))?;
        request = request.with_recency_days(days);
    }
    if let Some(max) = optional_u64(args, "max_results")? {
        request = request.with_max_results(usize::try_from(max).unwrap_or(usize::MAX));
    }
    Ok(request)
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web. Returns titles, links, snippets, dates and domains ranked by \
         source trustworthiness (official sources first, undated sources last)."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "recency_days": {
                    "type": "integer",
                    "description": "Only return results from the last N days"
                },
                "sites": {
                    "type": "string",
                    "description": "Comma-separated domains to search within (e.g. 'europa.eu,gov.uk')"
                },
                "blocked_sites": {
                    "type": "string",
                    "description": "Comma-separated domains to exclude"
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of results (1-10)"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult> {
        let request = parse_request(&args)?;
        let response = self.retrieval.search.search(&request).await;
        let body = to_json(&response)?;

        Ok(match response.error {
            Some(error) => ToolResult::failure(error, body),
            None => ToolResult::success(body),
        })
    }
}
