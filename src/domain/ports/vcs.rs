//! Version Control Port
//!
//! Abstracts the working-copy client used for auto-commit. The client is not
//! safe to run concurrently against one working copy; callers serialize.

use std::path::Path;

use crate::error::SdkResult;

pub trait VersionControl: Send + Sync {
    /// Whether `path` is under version control
    fn is_tracked(&self, path: &str) -> SdkResult<bool>;

    /// Commit a single path with `message`
    fn commit(&self, path: &str, message: &str) -> SdkResult<()>;
}

/// Argument form of `path` for the VCS client.
///
/// Paths containing `@` get a trailing `@` so the client does not read the
/// suffix as a peg revision.
pub fn escape_peg_revision(path: &Path) -> String {
    let path = path.to_string_lossy();
    if path.contains('@') {
        format!("{}@", path)
    } else {
        path.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_are_unchanged() {
        assert_eq!(escape_peg_revision(Path::new("/a/b.js")), "/a/b.js");
    }

    #[test]
    fn at_sign_gets_trailing_at() {
        assert_eq!(
            escape_peg_revision(Path::new("/a/logo@2x.png")),
            "/a/logo@2x.png@"
        );
    }
}
