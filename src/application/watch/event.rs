//! Watch pipeline events
//!
//! Every terminal outcome of a pipeline stage is reported as a
//! `PipelineEvent` through an [`EventSink`]. The CLI renders them; tests
//! collect them.

use std::sync::Arc;

use serde::Serialize;

/// Callback receiving pipeline events. Called from worker threads.
pub type EventSink = Arc<dyn Fn(PipelineEvent) + Send + Sync>;

/// Sink that drops everything
pub fn discard_events() -> EventSink {
    Arc::new(|_| {})
}

/// Which watch pipeline a settled event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineKind {
    Stylesheet,
    Asset,
}

/// Pipeline stage a failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Detect,
    Compile,
    Sync,
    Invalidate,
}

/// How loudly an event is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    /// Completed remote-visible work (commit, sync, reload)
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    WatchStarted {
        watching: Vec<String>,
        ignoring: Vec<String>,
    },
    FileChanged {
        path: String,
        pipeline: PipelineKind,
    },
    Unchanged {
        path: String,
    },
    CommitQueued {
        path: String,
    },
    CommitDequeued {
        path: String,
    },
    CommitSucceeded {
        path: String,
        message: String,
    },
    CommitSkipped {
        path: String,
        reason: String,
    },
    CommitFailed {
        path: String,
        message: String,
    },
    Synced {
        source: String,
        destination: String,
    },
    CacheInvalidated {
        host: String,
        category: String,
        reloaded: serde_json::Value,
    },
    LiveReloadTriggered {
        path: String,
    },
    StylesheetCompiled {
        output: String,
    },
    StageFailed {
        stage: Stage,
        path: String,
        message: String,
    },
    ContentCacheCleared {
        entries: usize,
    },
    Shutdown,
}

impl PipelineEvent {
    pub fn severity(&self) -> Severity {
        match self {
            PipelineEvent::Unchanged { .. }
            | PipelineEvent::ContentCacheCleared { .. }
            | PipelineEvent::WatchStarted { .. } => Severity::Debug,
            PipelineEvent::FileChanged { .. }
            | PipelineEvent::CommitQueued { .. }
            | PipelineEvent::CommitDequeued { .. }
            | PipelineEvent::LiveReloadTriggered { .. }
            | PipelineEvent::StylesheetCompiled { .. }
            | PipelineEvent::Shutdown => Severity::Info,
            PipelineEvent::CommitSucceeded { .. }
            | PipelineEvent::Synced { .. }
            | PipelineEvent::CacheInvalidated { .. } => Severity::Success,
            PipelineEvent::CommitSkipped { .. } => Severity::Warning,
            PipelineEvent::CommitFailed { .. } | PipelineEvent::StageFailed { .. } => {
                Severity::Error
            }
        }
    }

    /// NDJSON line with a `"command": "watch"` field
    pub fn to_json(&self) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("watch"));
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }
}
