//! Application Layer
//!
//! Use cases that orchestrate the workflow.
//! This layer:
//! - Depends on Domain layer (ports, value objects)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `SkinPull` - Mirror remote core/theme skins into the tmp tree
//! - `StylesheetBuilder` - Compile the plugin skin
//! - `WatchSession` - Debounced watch pipelines (commit, sync, reload)

pub mod build;
pub mod pull;
pub mod watch;

pub use build::StylesheetBuilder;
pub use pull::{PullKind, PullReport, SkinPull};
pub use watch::{
    CacheInvalidator, ChangeDetector, CommitSerializer, EventSink, PipelineEvent, PipelineKind,
    Pipelines, RemoteSync, Severity, WatchRoute, WatchSession,
};
