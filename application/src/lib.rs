//! Application layer for source-scout
//!
//! This crate contains port definitions (transport gateway, adapter contract,
//! tool executor, schema export, approval), the immutable adapter settings and
//! the batch invocation use case. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::AdapterSettings;
pub use ports::{
    adapter::{Adapter, AdapterContext},
    approval::{ApprovalDecision, ApprovalPort, AutoApprove, AutoReject},
    http_gateway::HttpGateway,
    tool_executor::ToolExecutorPort,
    tool_schema::ToolSchemaPort,
};
pub use use_cases::run_tools::{RunToolsInput, RunToolsOutput, RunToolsUseCase};
