//! Tool registry.
//!
//! The [`ToolRegistry`] holds registered tools, provides lookup by name,
//! dispatches calls, and exports JSON schemas for the calling component.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Result, SiftError};

use super::types::{Tool, ToolResult};

/// Registry of available tools.
///
/// Every result passing through [`execute()`](Self::execute) is bounded to
/// the registry's output limit.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    max_output_bytes: usize,
}

impl ToolRegistry {
    /// Create a new empty registry bounding output to `max_output_bytes`.
    pub fn new(max_output_bytes: usize) -> Self {
        Self {
            tools: HashMap::new(),
            max_output_bytes,
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool exists in the registry.
    pub fn exists(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// List names of all registered tools, sorted.
    pub fn list_available(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.values().map(|t| t.name()).collect();
        names.sort_unstable();
        names
    }

    /// Export JSON schemas for all tools, sorted by name.
    ///
    /// Each entry contains `name`, `description`, and `parameters` (the schema).
    pub fn schemas_for_api(&self) -> Vec<serde_json::Value> {
        let mut schemas: Vec<(String, serde_json::Value)> = self
            .tools
            .values()
            .map(|t| {
                let entry = serde_json::json!({
                    "name": t.name(),
                    "description": t.description(),
                    "parameters": t.schema(),
                });
                (t.name().to_string(), entry)
            })
            .collect();
        schemas.sort_by(|a, b| a.0.cmp(&b.0));
        schemas.into_iter().map(|(_, v)| v).collect()
    }

    /// Run the tool called `name` with `args`.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::ToolValidation`] for an unknown tool, or the
    /// tool's own error.
    pub async fn execute(&self, name: &str, args: serde_json::Value) -> Result<ToolResult> {
        let tool = self
            .get(name)
            .ok_or_else(|| SiftError::ToolValidation(format!("unknown tool '{name}'")))?;
        tracing::debug!(tool = name, "executing tool");
        let result = tool.execute(args).await?;
        Ok(result.bounded(self.max_output_bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echo the arguments"
        }
        fn schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object"})
        }
        async fn execute(&self, args: serde_json::Value) -> Result<ToolResult> {
            Ok(ToolResult::success(args.to_string()))
        }
    }

    struct NamedTool(&'static str);

    #[async_trait]
    impl Tool for NamedTool {
        fn name(&self) -> &str {
            self.0
        }
        fn description(&self) -> &str {
            "named"
        }
        fn schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object", "properties": {}})
        }
        async fn execute(&self, _args: serde_json::Value) -> Result<ToolResult> {
            Ok(ToolResult::success(String::new()))
        }
    }

    #[test]
    fn list_and_schemas_are_sorted() {
        let mut registry = ToolRegistry::new(1024);
        registry.register(Arc::new(NamedTool("web_search")));
        registry.register(Arc::new(NamedTool("compose_answer")));
        registry.register(Arc::new(NamedTool("fetch_url")));

        assert_eq!(
            registry.list_available(),
            vec!["compose_answer", "fetch_url", "web_search"]
        );
        let names: Vec<_> = registry
            .schemas_for_api()
            .iter()
            .map(|s| s["name"].as_str().unwrap_or_default().to_owned())
            .collect();
        assert_eq!(names, vec!["compose_answer", "fetch_url", "web_search"]);
        assert_eq!(registry.schemas_for_api()[0]["description"], "named");
    }

    #[test]
    fn register_replaces_same_name() {
        let mut registry = ToolRegistry::new(1024);
        registry.register(Arc::new(NamedTool("echo")));
        registry.register(Arc::new(EchoTool));
        assert_eq!(registry.list_available().len(), 1);
        assert_eq!(
            registry.get("echo").map(|t| t.description().to_owned()),
            Some("Echo the arguments".to_owned())
        );
    }

    #[tokio::test]
    async fn execute_dispatches_and_bounds_output() {
        let mut registry = ToolRegistry::new(8);
        registry.register(Arc::new(EchoTool));

        let result = registry
            .execute("echo", serde_json::json!({"text": "a long argument"}))
            .await
            .expect("echo runs");
        assert!(result.success);
        assert!(result.truncated);
        assert!(result.content.contains("[output truncated at 8 bytes]"));
    }

    #[tokio::test]
    async fn unknown_tool_is_a_validation_error() {
        let registry = ToolRegistry::new(1024);
        let err = registry
            .execute("missing", serde_json::json!({}))
            .await
            .err()
            .expect("unknown tool");
        assert_eq!(err.code(), "TOOL_VALIDATION");
        assert!(!registry.exists("missing"));
    }
}
