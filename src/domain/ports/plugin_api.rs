//! Plugin API Port
//!
//! Remote endpoint that clears plugin caches on the application server.

use crate::domain::value_objects::ReloadCategory;
use crate::error::SdkResult;

pub trait PluginApi: Send + Sync {
    /// Ask the server to reload `category`. Returns what the server reports
    /// as reloaded.
    fn reload(&self, category: ReloadCategory) -> SdkResult<serde_json::Value>;
}
