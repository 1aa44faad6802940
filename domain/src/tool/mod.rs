//! Tool domain module
//!
//! Defines how an agent sees an external knowledge source: a
//! [`ToolDefinition`] (name, parameters, safety tag), invoked through a
//! [`ToolCall`], answered with a [`ToolResult`].
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult               │
//! │ (catalog)    │    │ (invocation) │    │ payload XOR error        │
//! └──────────────┘    └──────────────┘    └──────────────────────────┘
//! ```
//!
//! # Safety
//!
//! | Safety | Examples | Confirmation |
//! |--------|----------|--------------|
//! | **ReadOnly** | `wikipedia_search`, `fetch_url`, `github_repo` | No (auto-approved) |
//! | **SideEffecting** | none in the default catalog | Yes |
//!
//! # Architecture
//!
//! - **Domain** (this module): pure definitions, no I/O
//! - **Application** (`ToolExecutorPort`, `Adapter`): port traits
//! - **Infrastructure** (`AdapterRegistry`): concrete adapters over HTTP

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{Safety, ToolCall, ToolDefinition, ToolSpec};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{Failure, FailureKind, Payload, ToolResult};
