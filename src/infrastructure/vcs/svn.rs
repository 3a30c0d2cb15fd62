//! Subversion client
//!
//! Shells out to `svn`. The caller serializes invocations.

use std::process::{Command, Output};

use crate::domain::ports::VersionControl;
use crate::error::{SdkError, SdkResult};

/// svn error codes meaning "not a versioned path"
const NOT_VERSIONED: &[&str] = &["W155010", "E155007", "E155010", "E200009"];

#[derive(Debug, Clone)]
pub struct SvnClient {
    program: String,
}

impl Default for SvnClient {
    fn default() -> Self {
        Self::new("svn")
    }
}

impl SvnClient {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, command: &str, args: &[&str]) -> SdkResult<Output> {
        tracing::trace!(program = %self.program, command, ?args, "running svn");
        Command::new(&self.program)
            .arg(command)
            .args(args)
            .output()
            .map_err(|e| SdkError::Vcs {
                command: command.to_string(),
                stderr: e.to_string(),
            })
    }
}

impl VersionControl for SvnClient {
    fn is_tracked(&self, path: &str) -> SdkResult<bool> {
        let output = self.run("info", &[path])?;
        if output.status.success() {
            return Ok(true);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if is_not_versioned(&stderr) {
            Ok(false)
        } else {
            Err(SdkError::Vcs {
                command: "info".to_string(),
                stderr: stderr.trim().to_string(),
            })
        }
    }

    fn commit(&self, path: &str, message: &str) -> SdkResult<()> {
        let output = self.run("ci", &[path, "-m", message])?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            tracing::debug!(target: "svn", "{}", line);
        }
        if output.status.success() {
            Ok(())
        } else {
            Err(SdkError::Vcs {
                command: "ci".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

fn is_not_versioned(stderr: &str) -> bool {
    NOT_VERSIONED.iter().any(|code| stderr.contains(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_unversioned_warnings() {
        assert!(is_not_versioned(
            "svn: warning: W155010: The node '/p/new.js' was not found."
        ));
        assert!(is_not_versioned(
            "svn: E155007: '/tmp/x' is not a working copy"
        ));
        assert!(!is_not_versioned("svn: E170013: Unable to connect"));
    }

    #[test]
    fn missing_program_is_a_vcs_error() {
        let client = SvnClient::new("definitely-not-svn-binary");
        let err = client.is_tracked("/tmp").unwrap_err();
        assert!(matches!(err, SdkError::Vcs { ref command, .. } if command == "info"));
    }
}
