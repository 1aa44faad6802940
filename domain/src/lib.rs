//! Domain layer for source-scout
//!
//! This crate contains the pure, I/O-free core of the adapter layer:
//! tool definitions and their safety tags, the result envelope every adapter
//! returns, the size bounder, and the request/response value objects that
//! cross the transport boundary.
//!
//! # Core Concepts
//!
//! ## Result Envelope
//!
//! Every adapter call ends in a [`ToolResult`] carrying either a
//! [`Payload`] or a [`Failure`]. Failures are ordinary values; nothing in
//! the adapter layer aborts its caller.
//!
//! ## Bounds
//!
//! [`Limits`] caps list lengths and text lengths so the consuming agent's
//! context grows predictably regardless of upstream response size.
//!
//! ## Safety
//!
//! Each [`ToolDefinition`] carries a static [`Safety`] tag that the invoking
//! framework reads before running the tool to decide on auto-approval.

pub mod bounds;
pub mod config;
pub mod http;
pub mod tool;

// Re-export commonly used types
pub use bounds::{BoundedText, Limits, bound_items, bound_text};
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use http::{RawResponse, RequestSpec};
pub use tool::{
    entities::{Safety, ToolCall, ToolDefinition, ToolParameter, ToolSpec},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{
        Failure, FailureKind, Item, ItemList, Outcome, Payload, ToolResult, ToolResultMetadata,
    },
};
