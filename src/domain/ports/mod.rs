//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod clock;
pub mod compiler;
pub mod live_reload;
pub mod mirror;
pub mod plugin_api;
pub mod vcs;

pub use clock::{Clock, SystemClock};
pub use compiler::StylesheetCompiler;
pub use live_reload::LiveReload;
pub use mirror::{Mirror, MirrorReport, MirrorRequest};
pub use plugin_api::PluginApi;
pub use vcs::{escape_peg_revision, VersionControl};
