//! Stylesheet Compiler Port

use std::path::{Path, PathBuf};

use crate::error::SdkResult;

pub trait StylesheetCompiler: Send + Sync {
    /// Compile `source`, resolving imports against `include_paths`.
    fn compile(&self, source: &Path, include_paths: &[PathBuf]) -> SdkResult<String>;
}
