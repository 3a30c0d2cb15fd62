//! Path rewrite value object

use regex::Regex;

use crate::error::{SdkError, SdkResult};

/// Regex replacement applied to a local path before it is handed to the mirror.
///
/// Every match is replaced, in order of configuration.
#[derive(Debug, Clone)]
pub struct PathRewrite {
    pattern: Regex,
    replace_with: String,
}

impl PathRewrite {
    pub fn new(pattern: &str, replace_with: impl Into<String>) -> SdkResult<Self> {
        let pattern = Regex::new(pattern).map_err(|e| {
            SdkError::config(format!("invalid convert_local_sync_path regex '{}': {}", pattern, e))
        })?;
        Ok(Self {
            pattern,
            replace_with: replace_with.into(),
        })
    }

    pub fn apply(&self, path: &str) -> String {
        self.pattern
            .replace_all(path, self.replace_with.as_str())
            .into_owned()
    }

    /// Apply a chain of rewrites
    pub fn apply_all(rewrites: &[PathRewrite], path: &str) -> String {
        rewrites
            .iter()
            .fold(path.to_string(), |acc, rewrite| rewrite.apply(&acc))
    }
}
