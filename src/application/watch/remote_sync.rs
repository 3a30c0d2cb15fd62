//! Push a changed plugin file to the remote plugin tree

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::ports::{Mirror, MirrorRequest};
use crate::domain::value_objects::PathRewrite;
use crate::error::{SdkError, SdkResult};
use crate::paths::slash;

/// Where one local file goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    /// Local source after path rewrites
    pub source: String,
    /// Remote directory receiving the file
    pub destination: String,
}

pub struct RemoteSync {
    plugin_segment: String,
    remote_base: String,
    rewrites: Vec<PathRewrite>,
    mirror: Arc<dyn Mirror>,
}

impl RemoteSync {
    /// `plugin_segment` locates the plugin root inside local paths;
    /// `remote_base` is the remote directory mapped onto it.
    pub fn new(
        plugin_segment: impl Into<String>,
        remote_base: impl Into<String>,
        rewrites: Vec<PathRewrite>,
        mirror: Arc<dyn Mirror>,
    ) -> Self {
        Self {
            plugin_segment: plugin_segment.into(),
            remote_base: remote_base.into(),
            rewrites,
            mirror,
        }
    }

    /// Compute source and destination for `path` without transferring.
    pub fn plan(&self, path: &Path) -> SdkResult<SyncTarget> {
        let normalized = slash(path);

        let (_, relative) = normalized
            .split_once(self.plugin_segment.as_str())
            .ok_or_else(|| invalid(path, format!(
                "unable to find {} in {}",
                self.plugin_segment, normalized
            )))?;

        let parts: Vec<&str> = relative.split('/').filter(|p| !p.is_empty()).collect();
        if parts.len() < 2 {
            return Err(invalid(
                path,
                format!("file path parts: {}", parts.join(",")),
            ));
        }
        let parent = parts[..parts.len() - 1].join("/");

        Ok(SyncTarget {
            source: PathRewrite::apply_all(&self.rewrites, &path.to_string_lossy()),
            destination: format!("{}/{}", self.remote_base.trim_end_matches('/'), parent),
        })
    }

    /// Mirror `path` into its remote directory. Returns the target, whose
    /// `source` is the rewritten path for the following stages.
    pub fn sync_to_remote(&self, path: &Path) -> SdkResult<SyncTarget> {
        let target = self.plan(path)?;
        tracing::debug!(
            transport = self.mirror.name(),
            source = %target.source,
            destination = %target.destination,
            "syncing file to remote"
        );

        self.mirror
            .mirror(&MirrorRequest::new(&target.source, &target.destination))?;
        Ok(target)
    }
}

fn invalid(path: &Path, reason: String) -> SdkError {
    SdkError::InvalidPath {
        path: PathBuf::from(path),
        reason,
    }
}
