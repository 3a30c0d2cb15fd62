//! The two watch pipelines
//!
//! Stylesheet: detect → commit (fire-and-forget) → recompile → live reload.
//! Asset: detect → commit → sync → invalidate → live reload.
//!
//! Each stage returns a `Result`; failures are reported as
//! [`PipelineEvent::StageFailed`] here and the event is dropped.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::build::StylesheetBuilder;
use crate::domain::ports::LiveReload;
use crate::domain::value_objects::WatchEvent;

use super::change_detector::ChangeDetector;
use super::commit::CommitSerializer;
use super::event::{EventSink, PipelineEvent, PipelineKind, Stage};
use super::invalidate::CacheInvalidator;
use super::remote_sync::RemoteSync;

/// How far a settled event got
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Content identical to the last observation
    Unchanged,
    Completed,
    Dropped(Stage),
}

pub struct Pipelines {
    host: String,
    invalidator: CacheInvalidator,
    on_event: EventSink,
    detector: Option<ChangeDetector>,
    commits: Option<CommitSerializer>,
    stylesheet: Option<StylesheetBuilder>,
    remote_sync: Option<RemoteSync>,
    live_reload: Option<Arc<dyn LiveReload>>,
}

impl Pipelines {
    /// Minimal pipelines: every settled asset event invalidates `host`'s cache.
    pub fn new(host: impl Into<String>, invalidator: CacheInvalidator, on_event: EventSink) -> Self {
        Self {
            host: host.into(),
            invalidator,
            on_event,
            detector: None,
            commits: None,
            stylesheet: None,
            remote_sync: None,
            live_reload: None,
        }
    }

    /// Skip events whose content did not change
    pub fn with_change_detector(mut self, detector: ChangeDetector) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Auto-commit changed files
    pub fn with_commits(mut self, commits: CommitSerializer) -> Self {
        self.commits = Some(commits);
        self
    }

    /// Recompile the skin on stylesheet changes
    pub fn with_stylesheet(mut self, builder: StylesheetBuilder) -> Self {
        self.stylesheet = Some(builder);
        self
    }

    /// Mirror changed assets to the remote plugin tree
    pub fn with_remote_sync(mut self, remote_sync: RemoteSync) -> Self {
        self.remote_sync = Some(remote_sync);
        self
    }

    pub fn with_live_reload(mut self, live_reload: Arc<dyn LiveReload>) -> Self {
        self.live_reload = Some(live_reload);
        self
    }

    pub fn emit(&self, event: PipelineEvent) {
        (self.on_event)(event)
    }

    pub fn dispatch(&self, kind: PipelineKind, event: &WatchEvent) -> PipelineOutcome {
        match kind {
            PipelineKind::Stylesheet => self.on_stylesheet_settled(event),
            PipelineKind::Asset => self.on_asset_settled(event),
        }
    }

    pub fn on_stylesheet_settled(&self, event: &WatchEvent) -> PipelineOutcome {
        let path = &event.path;
        if let Some(outcome) = self.detect(path, PipelineKind::Stylesheet) {
            return outcome;
        }

        if let Some(commits) = &self.commits {
            // not awaited: recompiling does not depend on the commit
            drop(commits.submit(path));
        }

        let Some(builder) = &self.stylesheet else {
            return PipelineOutcome::Completed;
        };
        match builder.build() {
            Ok(output) => {
                self.emit(PipelineEvent::StylesheetCompiled {
                    output: output.display().to_string(),
                });
                self.notify_live_reload(&output);
                PipelineOutcome::Completed
            }
            Err(e) => self.fail(Stage::Compile, path, e),
        }
    }

    pub fn on_asset_settled(&self, event: &WatchEvent) -> PipelineOutcome {
        let path = &event.path;
        if let Some(outcome) = self.detect(path, PipelineKind::Asset) {
            return outcome;
        }

        if let Some(commits) = &self.commits {
            // outcome is reported by the serializer; failure does not halt
            commits.submit(path).wait();
        }

        let source = match &self.remote_sync {
            Some(remote_sync) => match remote_sync.sync_to_remote(path) {
                Ok(target) => {
                    self.emit(PipelineEvent::Synced {
                        source: target.source.clone(),
                        destination: target.destination,
                    });
                    PathBuf::from(target.source)
                }
                Err(e) => return self.fail(Stage::Sync, path, e),
            },
            None => path.clone(),
        };

        match self.invalidator.invalidate(&source) {
            Ok(invalidation) => self.emit(PipelineEvent::CacheInvalidated {
                host: self.host.clone(),
                category: invalidation.category.to_string(),
                reloaded: invalidation.reloaded,
            }),
            Err(e) => return self.fail(Stage::Invalidate, &source, e),
        }

        self.notify_live_reload(&source);
        PipelineOutcome::Completed
    }

    /// Clear the content cache when nothing has happened for a while.
    pub fn sweep(&self) {
        let Some(detector) = &self.detector else {
            return;
        };
        let busy = self.commits.as_ref().is_some_and(|c| c.is_busy());
        if let Some(entries) = detector.sweep_if_idle(busy) {
            self.emit(PipelineEvent::ContentCacheCleared { entries });
        }
    }

    /// `Some` when the pipeline stops here
    fn detect(&self, path: &Path, kind: PipelineKind) -> Option<PipelineOutcome> {
        if let Some(detector) = &self.detector {
            match detector.has_changed(path) {
                Ok(true) => {}
                Ok(false) => {
                    self.emit(PipelineEvent::Unchanged {
                        path: path.display().to_string(),
                    });
                    return Some(PipelineOutcome::Unchanged);
                }
                Err(e) => return Some(self.fail(Stage::Detect, path, e)),
            }
        }

        self.emit(PipelineEvent::FileChanged {
            path: path.display().to_string(),
            pipeline: kind,
        });
        None
    }

    fn notify_live_reload(&self, path: &Path) {
        let Some(live_reload) = &self.live_reload else {
            return;
        };
        match live_reload.changed(path) {
            Ok(()) => self.emit(PipelineEvent::LiveReloadTriggered {
                path: path.display().to_string(),
            }),
            Err(e) => tracing::debug!(path = %path.display(), error = %e, "live reload not notified"),
        }
    }

    fn fail(&self, stage: Stage, path: &Path, error: impl std::fmt::Display) -> PipelineOutcome {
        self.emit(PipelineEvent::StageFailed {
            stage,
            path: path.display().to_string(),
            message: error.to_string(),
        });
        PipelineOutcome::Dropped(stage)
    }
}
