//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod path_rewrite;
mod reload_category;
mod watch_event;

pub use path_rewrite::PathRewrite;
pub use reload_category::{path_glob, ReloadCategory};
pub use watch_event::{ChangeKind, WatchEvent};
