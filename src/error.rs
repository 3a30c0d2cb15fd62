//! Error types for the plugin SDK
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;

/// Main error type for SDK operations
#[derive(Error, Debug)]
pub enum SdkError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stylesheet compiler failure
    #[error("failed to compile {file}: {message}")]
    Compile { file: PathBuf, message: String },

    /// Version control subprocess exited non-zero
    #[error("svn {command} failed: {stderr}")]
    Vcs { command: String, stderr: String },

    /// Local path cannot be mapped onto the remote plugin tree
    #[error("file path to sync is invalid: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    /// Remote application server could not be reached
    #[error("failed to reload plugin: {0}")]
    RemoteUnavailable(String),

    /// Remote answered without acknowledging the reload
    #[error("unable to reload plugin ({status}), please make sure you have enabled the enable.ExperimentalApi in the app config")]
    UnexpectedResponse { status: u16 },

    /// Mirror (rsync) subprocess failure
    #[error("sync of {source_path} to {destination} failed: {message}")]
    Transport {
        source_path: String,
        destination: String,
        message: String,
    },

    /// Invalid or incomplete configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// File watcher could not be set up
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),
}

impl SdkError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
