//! Skin stylesheet compilation

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::ports::StylesheetCompiler;
use crate::error::SdkResult;
use crate::infrastructure::fs::write_atomic;
use crate::paths::Paths;

/// Compiles the skin entry point into the tmp styles directory.
pub struct StylesheetBuilder {
    compiler: Arc<dyn StylesheetCompiler>,
    entry: PathBuf,
    include_paths: Vec<PathBuf>,
    output: PathBuf,
}

impl StylesheetBuilder {
    pub fn new(
        compiler: Arc<dyn StylesheetCompiler>,
        entry: impl Into<PathBuf>,
        include_paths: Vec<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            compiler,
            entry: entry.into(),
            include_paths,
            output: output.into(),
        }
    }

    pub fn from_paths(
        compiler: Arc<dyn StylesheetCompiler>,
        paths: &Paths,
        compiled_skin_name: &str,
    ) -> Self {
        Self::new(
            compiler,
            &paths.skin_entry,
            paths.include_paths(),
            paths.compiled_stylesheet(compiled_skin_name),
        )
    }

    pub fn entry(&self) -> &Path {
        &self.entry
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Compile and write the stylesheet. Returns the output path.
    pub fn build(&self) -> SdkResult<PathBuf> {
        tracing::debug!(
            entry = %self.entry.display(),
            includes = self.include_paths.len(),
            "compiling stylesheet"
        );
        let css = self.compiler.compile(&self.entry, &self.include_paths)?;
        write_atomic(&self.output, css.as_bytes())?;
        Ok(self.output.clone())
    }
}
