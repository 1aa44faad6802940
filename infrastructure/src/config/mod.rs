//! Configuration file loading for source-scout
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SCOUT_*` environment variables (`SCOUT_HTTP__TIMEOUT_SECONDS=10`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./scout.toml` or `./.scout.toml`
//! 4. Global: `$XDG_CONFIG_HOME/source-scout/config.toml`
//! 5. Default values
//!
//! The result is validated and converted once into the immutable
//! [`AdapterSettings`](scout_application::AdapterSettings).

mod file_config;
mod loader;

pub use file_config::{FileConfig, FileHttpConfig, FileLimitsConfig};
pub use loader::{ConfigLoadError, ConfigLoader};
