//! Watch pipelines
//!
//! Debounced change detection feeding two pipelines:
//! - stylesheet sources: commit, recompile the skin, live reload
//! - plugin assets: commit, sync to the remote, clear the remote plugin
//!   cache, live reload
//!
//! ## Architecture
//!
//! - `WatchDebouncer` - coalesces raw events per watched glob set
//! - `ChangeDetector` - drops events whose content did not change
//! - `CommitSerializer` - one VCS commit at a time, FIFO
//! - `RemoteSync` - maps a local file onto the remote plugin tree
//! - `CacheInvalidator` - clears the remote cache for the file's category
//! - `Pipelines` - runs the stages for a settled event
//! - `WatchSession` - ties the OS watcher to the debouncer and pipelines

mod change_detector;
mod commit;
mod debounce;
mod event;
mod invalidate;
mod pipeline;
mod remote_sync;
mod use_case;


pub use change_detector::{ChangeDetector, CONTENT_CACHE_IDLE};
pub use commit::{commit_message, CommitOutcome, CommitSerializer, CommitTicket};
pub use debounce::{WatchDebouncer, WatchRoute};
pub use event::{discard_events, EventSink, PipelineEvent, PipelineKind, Severity, Stage};
pub use invalidate::{CacheInvalidator, Invalidation};
pub use pipeline::{PipelineOutcome, Pipelines};
pub use remote_sync::{RemoteSync, SyncTarget};
pub use use_case::WatchSession;
