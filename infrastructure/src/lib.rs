//! Infrastructure layer for source-scout
//!
//! This crate contains the adapters that implement the ports defined in the
//! application layer: the reqwest transport gateway, one adapter per
//! knowledge source, the adapter registry, JSON Schema export, and
//! configuration file loading.

pub mod config;
pub mod http;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoadError, ConfigLoader, FileConfig};
pub use http::{GatewayError, ReqwestGateway};
pub use tools::{
    AdapterRegistry, JsonSchemaToolConverter, default_adapters, default_registry,
    default_tool_spec,
};
