//! Remote plugin cache invalidation

use std::path::Path;
use std::sync::Arc;

use crate::domain::ports::PluginApi;
use crate::domain::value_objects::ReloadCategory;
use crate::error::SdkResult;

/// Acknowledged reload
#[derive(Debug, Clone, PartialEq)]
pub struct Invalidation {
    pub category: ReloadCategory,
    /// What the server reports as reloaded
    pub reloaded: serde_json::Value,
}

pub struct CacheInvalidator {
    api: Arc<dyn PluginApi>,
}

impl CacheInvalidator {
    pub fn new(api: Arc<dyn PluginApi>) -> Self {
        Self { api }
    }

    /// Clear the remote cache the changed `path` belongs to.
    pub fn invalidate(&self, path: &Path) -> SdkResult<Invalidation> {
        let category = ReloadCategory::classify(path);
        tracing::debug!(path = %path.display(), %category, "reloading plugin cache");
        let reloaded = self.api.reload(category)?;
        Ok(Invalidation { category, reloaded })
    }
}
