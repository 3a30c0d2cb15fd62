//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `vcs/` - Subversion client
//! - `sync/` - rsync mirror
//! - `http/` - plugin reload endpoint and live-reload notifier
//! - `sass` - stylesheet compiler CLI
//! - `watch` - OS file watching
//! - `fs` - atomic writes

pub mod fs;
pub mod http;
pub mod sass;
pub mod sync;
pub mod vcs;
pub mod watch;

pub use http::{HttpPluginApi, LiveReloadNotifier};
pub use sass::SassCli;
pub use sync::RsyncMirror;
pub use vcs::SvnClient;
