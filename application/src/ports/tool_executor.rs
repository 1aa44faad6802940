//! Tool Executor port
//!
//! Defines the interface the invoking framework uses to run tools by name.

use async_trait::async_trait;
use scout_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolSpec},
    value_objects::ToolResult,
};
use tokio_util::sync::CancellationToken;

/// Port for tool execution
///
/// This port defines how the application layer executes tools.
/// Implementations (adapters) live in the infrastructure layer.
///
/// Every method returns a [`ToolResult`]; unknown tools, rejected arguments,
/// timeouts and cancellation are all reported through its failure arm.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().get(name).is_some()
    }

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get(name)
    }

    /// Get names of all available tools
    fn available_tools(&self) -> Vec<&str> {
        self.tool_spec().names().collect()
    }

    /// Execute a tool call asynchronously
    async fn execute(&self, call: &ToolCall) -> ToolResult {
        self.execute_with_cancellation(call, &CancellationToken::new())
            .await
    }

    /// Execute a tool call that ends early with `cancelled` once `token` fires
    async fn execute_with_cancellation(
        &self,
        call: &ToolCall,
        token: &CancellationToken,
    ) -> ToolResult;

    /// Execute a tool call synchronously (blocking)
    fn execute_sync(&self, call: &ToolCall) -> ToolResult;
}
