//! Mirror Port
//!
//! One-way file-tree replication between local and remote hosts.

use crate::error::SdkResult;

/// One mirror invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorRequest {
    pub source: String,
    pub destination: String,
    /// Include filters, evaluated before `exclude`
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl MirrorRequest {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            ..Self::default()
        }
    }
}

/// Result of a mirror invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorReport {
    /// Files reported as transferred by the progress stream
    pub transferred: usize,
}

pub trait Mirror: Send + Sync {
    /// Get the name of this transport (for logging)
    fn name(&self) -> &'static str;

    fn mirror(&self, request: &MirrorRequest) -> SdkResult<MirrorReport>;
}
