//! Mirror implementations

mod rsync;

pub use rsync::{RsyncMirror, DEFAULT_RSYNC_PATH};
