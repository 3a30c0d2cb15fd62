//! HTTP collaborators (blocking `reqwest`)

mod live_reload;
mod plugin_api;

pub use live_reload::LiveReloadNotifier;
pub use plugin_api::{parse_reload_response, HttpPluginApi};
