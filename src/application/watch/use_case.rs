//! Watch session: OS events in, pipelines out

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::error::SdkResult;
use crate::infrastructure::watch::spawn_watcher;

use super::debounce::{WatchDebouncer, WatchRoute};
use super::event::PipelineEvent;
use super::pipeline::Pipelines;

/// Events notify replays when a watch is first registered are drained for
/// this long.
const STARTUP_COOLDOWN: Duration = Duration::from_millis(500);

pub struct WatchSession {
    pipelines: Arc<Pipelines>,
    routes: Vec<WatchRoute>,
    quiet_period: Duration,
    roots: Vec<PathBuf>,
}

impl WatchSession {
    pub fn new(
        pipelines: Pipelines,
        routes: Vec<WatchRoute>,
        quiet_period: Duration,
        roots: Vec<PathBuf>,
    ) -> Self {
        Self {
            pipelines: Arc::new(pipelines),
            routes,
            quiet_period,
            roots,
        }
    }

    /// Watch until `running` is cleared (blocking).
    ///
    /// Each settled event runs its pipeline on its own thread; the session
    /// waits for those threads before returning.
    pub fn start(self, running: Arc<AtomicBool>) -> SdkResult<()> {
        let (tx, rx) = channel();
        let _watcher = spawn_watcher(&self.roots, tx)?;

        self.pipelines.emit(PipelineEvent::WatchStarted {
            watching: self
                .routes
                .iter()
                .flat_map(|r| r.patterns().iter().cloned())
                .collect(),
            ignoring: self
                .routes
                .iter()
                .flat_map(|r| r.ignored().iter().cloned())
                .collect(),
        });

        let cooldown_end = Instant::now() + STARTUP_COOLDOWN;
        while Instant::now() < cooldown_end {
            let _ = rx.recv_timeout(Duration::from_millis(50));
        }

        let debouncer = WatchDebouncer::new(self.routes, self.quiet_period);
        let mut workers: Vec<JoinHandle<()>> = Vec::new();
        let pipelines = &self.pipelines;

        debouncer.run(
            rx,
            &running,
            || pipelines.sweep(),
            |kind, event| {
                workers.retain(|w| !w.is_finished());
                let pipelines = pipelines.clone();
                workers.push(std::thread::spawn(move || {
                    let outcome = pipelines.dispatch(kind, &event);
                    tracing::debug!(path = %event.path.display(), ?outcome, "pipeline finished");
                }));
            },
        );

        for worker in workers {
            let _ = worker.join();
        }
        self.pipelines.emit(PipelineEvent::Shutdown);
        Ok(())
    }
}
