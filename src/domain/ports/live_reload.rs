//! Live Reload Port

use std::path::Path;

use crate::error::SdkResult;

/// Notifies connected browsers that `path` changed.
pub trait LiveReload: Send + Sync {
    fn changed(&self, path: &Path) -> SdkResult<()>;
}
