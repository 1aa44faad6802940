//! Tool schema conversion port.
//!
//! Separates "which tools exist" (domain) from "how to describe them to an
//! agent" (infrastructure JSON Schema export).

use scout_domain::tool::entities::{ToolDefinition, ToolSpec};

/// Port for converting tool definitions to JSON Schema.
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single tool definition to JSON Schema, including its safety tag.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// Convert all tools to JSON Schema array (sorted by name).
    fn all_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value>;

    /// Convert read-only tools only to JSON Schema array (sorted by name).
    fn safe_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value>;
}
