//! Application-level configuration.
//!
//! [`AdapterSettings`] is built once at startup (see the infrastructure
//! config loader) and handed to the registry. Nothing mutates it afterwards.

mod adapter_settings;

pub use adapter_settings::{AdapterSettings, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
