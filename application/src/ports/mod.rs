//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod adapter;
pub mod approval;
pub mod http_gateway;
pub mod tool_executor;
pub mod tool_schema;
