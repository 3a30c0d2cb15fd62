//! plugin-sdk - local development workflow for CMS plugin skins
//!
//! Watches a plugin checkout, recompiles the skin stylesheet, commits changed
//! files to Subversion, mirrors them to the remote plugin tree and asks the
//! remote server to drop its plugin cache.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod paths;

pub use error::{SdkError, SdkResult};
