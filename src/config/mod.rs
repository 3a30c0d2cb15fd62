//! Configuration module
//!
//! Resolution order (highest priority first):
//! 1. CLI flags
//! 2. Environment variables (PLUGIN_SDK_*)
//! 3. `[configs.<name>]` in config.toml
//! 4. `[configs.default]` in config.toml
//! 5. Built-in defaults

mod loader;
mod types;

pub use loader::{env_overrides, ConfigWarning};
pub use types::{
    ConfigFile, HostConfig, HostRef, Options, PartialOptions, PathRewriteConfig, ResolvedHost,
    DEFAULT_LAYER,
};
