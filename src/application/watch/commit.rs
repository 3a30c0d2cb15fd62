//! Serialized auto-commit
//!
//! The VCS client cannot run concurrently against one working copy, so all
//! commits go through a single worker thread fed by a FIFO channel. The
//! in-flight counter is the commit lock: it is non-zero from the moment a
//! request is submitted until the queue has drained.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::domain::ports::{escape_peg_revision, VersionControl};
use crate::error::SdkResult;

use super::event::{EventSink, PipelineEvent};

/// Result of one commit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed { message: String },
    /// Path is not under version control; nothing was committed
    Untracked,
    Failed(String),
}

/// Completion signal for a submitted commit. Dropping it is fire-and-forget.
#[derive(Debug)]
pub struct CommitTicket {
    done: Receiver<CommitOutcome>,
}

impl CommitTicket {
    /// Block until the commit attempt for this path has finished.
    pub fn wait(self) -> CommitOutcome {
        self.done
            .recv()
            .unwrap_or_else(|_| CommitOutcome::Failed("commit worker stopped".to_string()))
    }
}

struct CommitRequest {
    path: PathBuf,
    queued: bool,
    done: Sender<CommitOutcome>,
}

pub struct CommitSerializer {
    queue: Option<Sender<CommitRequest>>,
    in_flight: Arc<AtomicUsize>,
    worker: Option<JoinHandle<()>>,
    on_event: EventSink,
}

/// `"{ticket}: Changed the {file_name} from the plugin."`
pub fn commit_message(ticket: Option<&str>, file_name: &str) -> String {
    match ticket {
        Some(ticket) if !ticket.is_empty() => {
            format!("{}: Changed the {} from the plugin.", ticket, file_name)
        }
        _ => format!("Changed the {} from the plugin.", file_name),
    }
}

impl CommitSerializer {
    /// Start the commit worker.
    pub fn spawn(
        vcs: Arc<dyn VersionControl>,
        ticket: Option<String>,
        on_event: EventSink,
    ) -> SdkResult<Self> {
        let (tx, rx) = channel::<CommitRequest>();
        let in_flight = Arc::new(AtomicUsize::new(0));

        let worker = std::thread::Builder::new()
            .name("commit-serializer".to_string())
            .spawn({
                let in_flight = in_flight.clone();
                let on_event = on_event.clone();
                move || {
                    for request in rx {
                        let path = request.path.display().to_string();
                        if request.queued {
                            on_event(PipelineEvent::CommitDequeued { path: path.clone() });
                        }

                        let outcome = attempt(vcs.as_ref(), ticket.as_deref(), &request.path);
                        on_event(match &outcome {
                            CommitOutcome::Committed { message } => {
                                PipelineEvent::CommitSucceeded {
                                    path,
                                    message: message.clone(),
                                }
                            }
                            CommitOutcome::Untracked => PipelineEvent::CommitSkipped {
                                path,
                                reason: "not under version control".to_string(),
                            },
                            CommitOutcome::Failed(message) => PipelineEvent::CommitFailed {
                                path,
                                message: message.clone(),
                            },
                        });

                        in_flight.fetch_sub(1, Ordering::SeqCst);
                        let _ = request.done.send(outcome);
                    }
                }
            })?;

        Ok(Self {
            queue: Some(tx),
            in_flight,
            worker: Some(worker),
            on_event,
        })
    }

    /// Queue a commit for `path`.
    ///
    /// Never blocks. The returned ticket resolves once this path's attempt
    /// has completed, successfully or not.
    pub fn submit(&self, path: &Path) -> CommitTicket {
        let (done_tx, done_rx) = channel();
        let queued = self.in_flight.fetch_add(1, Ordering::SeqCst) > 0;
        if queued {
            (self.on_event)(PipelineEvent::CommitQueued {
                path: path.display().to_string(),
            });
        }

        let request = CommitRequest {
            path: path.to_path_buf(),
            queued,
            done: done_tx,
        };
        let sent = self
            .queue
            .as_ref()
            .map(|queue| queue.send(request).is_ok())
            .unwrap_or(false);
        if !sent {
            // the ticket resolves to Failed once done_tx is dropped
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        CommitTicket { done: done_rx }
    }

    /// Whether a commit is running or queued
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}

impl Drop for CommitSerializer {
    fn drop(&mut self) {
        // closing the queue lets the worker drain and exit
        self.queue.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn attempt(vcs: &dyn VersionControl, ticket: Option<&str>, path: &Path) -> CommitOutcome {
    let target = escape_peg_revision(path);

    match vcs.is_tracked(&target) {
        Ok(true) => {}
        Ok(false) => return CommitOutcome::Untracked,
        Err(e) => return CommitOutcome::Failed(e.to_string()),
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let message = commit_message(ticket, &file_name);

    match vcs.commit(&target, &message) {
        Ok(()) => CommitOutcome::Committed { message },
        Err(e) => CommitOutcome::Failed(e.to_string()),
    }
}
