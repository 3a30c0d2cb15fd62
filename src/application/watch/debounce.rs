//! Per-glob debouncing of raw file-system events
//!
//! Each [`WatchRoute`] owns at most one [`DebounceWindow`]. A new event for a
//! route replaces the pending event and pushes the deadline out by the quiet
//! period; when a deadline passes uninterrupted the last event settles and
//! the window is discarded.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use globset::{GlobSet, GlobSetBuilder};

use crate::domain::value_objects::{path_glob, WatchEvent};
use crate::error::{SdkError, SdkResult};

use super::event::PipelineKind;

/// Upper bound on how long the loop blocks before re-checking `running`
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A set of globs feeding one pipeline
#[derive(Debug, Clone)]
pub struct WatchRoute {
    kind: PipelineKind,
    include: GlobSet,
    exclude: GlobSet,
    patterns: Vec<String>,
    ignored: Vec<String>,
}

impl WatchRoute {
    pub fn new(kind: PipelineKind, include: &[String], exclude: &[String]) -> SdkResult<Self> {
        Ok(Self {
            kind,
            include: build_set(include)?,
            exclude: build_set(exclude)?,
            patterns: include.to_vec(),
            ignored: exclude.to_vec(),
        })
    }

    pub fn kind(&self) -> PipelineKind {
        self.kind
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }

    pub fn matches(&self, path: &Path) -> bool {
        let normalized = path.to_string_lossy().replace('\\', "/");
        self.include.is_match(&normalized) && !self.exclude.is_match(&normalized)
    }
}

fn build_set(patterns: &[String]) -> SdkResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = path_glob(pattern)
            .map_err(|e| SdkError::config(format!("invalid watch glob '{}': {}", pattern, e)))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| SdkError::config(format!("invalid watch globs: {}", e)))
}

/// Pending state for one route
#[derive(Debug)]
struct DebounceWindow {
    pending: WatchEvent,
    deadline: Instant,
}

/// Debouncer state machine, driven with explicit instants.
#[derive(Debug)]
pub struct WatchDebouncer {
    routes: Vec<WatchRoute>,
    quiet_period: Duration,
    windows: HashMap<usize, DebounceWindow>,
}

impl WatchDebouncer {
    pub fn new(routes: Vec<WatchRoute>, quiet_period: Duration) -> Self {
        Self {
            routes,
            quiet_period,
            windows: HashMap::new(),
        }
    }

    pub fn routes(&self) -> &[WatchRoute] {
        &self.routes
    }

    /// Record `event` for every route it matches. Returns how many matched.
    pub fn observe(&mut self, event: WatchEvent, now: Instant) -> usize {
        let deadline = now + self.quiet_period;
        let mut matched = 0;
        for (index, route) in self.routes.iter().enumerate() {
            if !route.matches(&event.path) {
                continue;
            }
            matched += 1;
            self.windows.insert(
                index,
                DebounceWindow {
                    pending: event.clone(),
                    deadline,
                },
            );
        }
        matched
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.windows.values().map(|w| w.deadline).min()
    }

    /// Number of open windows
    pub fn pending(&self) -> usize {
        self.windows.len()
    }

    /// Remove and return every window whose deadline has passed, oldest first.
    pub fn take_settled(&mut self, now: Instant) -> Vec<(PipelineKind, WatchEvent)> {
        let mut due: Vec<usize> = self
            .windows
            .iter()
            .filter(|(_, w)| w.deadline <= now)
            .map(|(index, _)| *index)
            .collect();
        due.sort_by_key(|index| (self.windows[index].deadline, *index));

        due.into_iter()
            .filter_map(|index| {
                self.windows
                    .remove(&index)
                    .map(|w| (self.routes[index].kind(), w.pending))
            })
            .collect()
    }

    /// Settle every open window now, oldest deadline first.
    pub fn drain(&mut self) -> Vec<(PipelineKind, WatchEvent)> {
        match self.windows.values().map(|w| w.deadline).max() {
            Some(last) => self.take_settled(last),
            None => Vec::new(),
        }
    }

    /// Drive the debouncer from a channel until `running` is cleared or the
    /// sender side disconnects. On disconnect, open windows settle at once.
    ///
    /// `on_settled` must not block; long work belongs on another thread.
    /// `on_tick` runs after every wake-up.
    pub fn run(
        mut self,
        rx: Receiver<WatchEvent>,
        running: &AtomicBool,
        mut on_tick: impl FnMut(),
        mut on_settled: impl FnMut(PipelineKind, WatchEvent),
    ) {
        while running.load(Ordering::SeqCst) {
            let timeout = self
                .next_deadline()
                .map(|deadline| deadline.saturating_duration_since(Instant::now()))
                .map_or(POLL_INTERVAL, |wait| wait.min(POLL_INTERVAL));

            match rx.recv_timeout(timeout) {
                Ok(event) => {
                    if self.observe(event.clone(), Instant::now()) == 0 {
                        tracing::trace!(path = %event.path.display(), "event outside watched globs");
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    for (kind, event) in self.drain() {
                        on_settled(kind, event);
                    }
                    break;
                }
            }

            for (kind, event) in self.take_settled(Instant::now()) {
                on_settled(kind, event);
            }
            on_tick();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::mpsc::channel;
    use std::sync::Arc;

    const QUIET: Duration = Duration::from_millis(250);

    fn debouncer() -> WatchDebouncer {
        let stylesheets = WatchRoute::new(
            PipelineKind::Stylesheet,
            &["/p/res/skins/peak/sass/**/*.scss".to_string()],
            &[],
        )
        .unwrap();
        let assets = WatchRoute::new(
            PipelineKind::Asset,
            &["/p/{res,web}/**/*.*".to_string()],
            &["**/*.scss".to_string(), "/p/res/compiledskin/**".to_string()],
        )
        .unwrap();
        WatchDebouncer::new(vec![stylesheets, assets], QUIET)
    }

    #[test]
    fn routes_match_globs_and_excludes() {
        let d = debouncer();
        let assets = &d.routes()[1];
        assert!(assets.matches(Path::new("/p/web/js/app.js")));
        assert!(!assets.matches(Path::new("/p/res/skins/peak/sass/skin.scss")));
        assert!(!assets.matches(Path::new("/p/res/compiledskin/peak.css")));
        assert!(d.routes()[0].matches(Path::new("/p/res/skins/peak/sass/parts/_x.scss")));
    }

    #[test]
    fn burst_settles_once_with_last_event() {
        let mut d = debouncer();
        let t0 = Instant::now();
        d.observe(WatchEvent::modified("/p/web/a.js"), t0);
        d.observe(WatchEvent::modified("/p/web/b.js"), t0 + Duration::from_millis(100));
        d.observe(WatchEvent::modified("/p/web/c.js"), t0 + Duration::from_millis(200));

        assert!(d.take_settled(t0 + Duration::from_millis(400)).is_empty());

        let settled = d.take_settled(t0 + Duration::from_millis(450));
        assert_eq!(
            settled,
            vec![(PipelineKind::Asset, WatchEvent::modified("/p/web/c.js"))]
        );
        assert_eq!(d.pending(), 0);
    }

    #[test]
    fn routes_debounce_independently() {
        let mut d = debouncer();
        let t0 = Instant::now();
        d.observe(WatchEvent::modified("/p/res/skins/peak/sass/skin.scss"), t0);
        d.observe(
            WatchEvent::modified("/p/web/a.js"),
            t0 + Duration::from_millis(100),
        );

        let first = d.take_settled(t0 + QUIET);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].0, PipelineKind::Stylesheet);

        let second = d.take_settled(t0 + Duration::from_millis(350));
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].0, PipelineKind::Asset);
    }

    #[test]
    fn unmatched_events_open_no_window() {
        let mut d = debouncer();
        assert_eq!(d.observe(WatchEvent::modified("/elsewhere/x.js"), Instant::now()), 0);
        assert!(d.next_deadline().is_none());
    }

    proptest! {
        #[test]
        fn events_within_quiet_period_collapse(gaps in prop::collection::vec(0u64..250, 1..20)) {
            let mut d = debouncer();
            let t0 = Instant::now();
            let mut now = t0;
            let mut settled = Vec::new();
            let mut last = None;
            for (i, gap) in gaps.iter().enumerate() {
                now += Duration::from_millis(*gap);
                settled.extend(d.take_settled(now - Duration::from_nanos(1)));
                let event = WatchEvent::modified(format!("/p/web/f{}.js", i));
                d.observe(event.clone(), now);
                last = Some(event);
            }
            settled.extend(d.take_settled(now + QUIET));

            prop_assert_eq!(settled.len(), 1);
            prop_assert_eq!(Some(settled[0].1.clone()), last);
        }

        #[test]
        fn events_spaced_beyond_quiet_period_each_settle(count in 1usize..15, extra in 1u64..500) {
            let mut d = debouncer();
            let mut now = Instant::now();
            let mut settled = Vec::new();
            for i in 0..count {
                d.observe(WatchEvent::modified(format!("/p/web/f{}.js", i)), now);
                now += QUIET + Duration::from_millis(extra);
                settled.extend(d.take_settled(now));
            }

            prop_assert_eq!(settled.len(), count);
            for (i, (_, event)) in settled.iter().enumerate() {
                let expected = format!("/p/web/f{}.js", i);
                prop_assert_eq!(event.path.to_string_lossy(), expected.as_str());
            }
        }
    }

    #[test]
    fn drain_settles_open_windows_in_deadline_order() {
        let mut d = debouncer();
        let t0 = Instant::now();
        d.observe(WatchEvent::modified("/p/res/skins/peak/sass/skin.scss"), t0);
        d.observe(
            WatchEvent::modified("/p/web/a.js"),
            t0 + Duration::from_millis(100),
        );

        let drained = d.drain();
        assert_eq!(
            drained,
            vec![
                (
                    PipelineKind::Stylesheet,
                    WatchEvent::modified("/p/res/skins/peak/sass/skin.scss")
                ),
                (PipelineKind::Asset, WatchEvent::modified("/p/web/a.js")),
            ]
        );
        assert_eq!(d.pending(), 0);
        assert!(d.drain().is_empty());
    }

    #[test]
    fn disconnect_settles_pending_window() {
        let d = WatchDebouncer::new(debouncer().routes, Duration::from_secs(60));
        let (tx, rx) = channel();
        let running = AtomicBool::new(true);

        tx.send(WatchEvent::modified("/p/web/a.js")).unwrap();
        drop(tx);

        let mut seen = Vec::new();
        d.run(rx, &running, || {}, |kind, event| seen.push((kind, event)));
        assert_eq!(
            seen,
            vec![(PipelineKind::Asset, WatchEvent::modified("/p/web/a.js"))]
        );
    }

    #[test]
    fn run_loop_delivers_settled_events_and_stops_on_disconnect() {
        let d = WatchDebouncer::new(debouncer().routes, Duration::from_millis(30));
        let (tx, rx) = channel();
        let running = Arc::new(AtomicBool::new(true));

        tx.send(WatchEvent::modified("/p/web/a.js")).unwrap();
        tx.send(WatchEvent::modified("/p/web/b.js")).unwrap();

        let handle = std::thread::spawn({
            let running = running.clone();
            move || {
                let mut seen = Vec::new();
                d.run(rx, &running, || {}, |kind, event| seen.push((kind, event)));
                seen
            }
        });

        std::thread::sleep(Duration::from_millis(200));
        drop(tx);
        let seen = handle.join().unwrap();
        assert_eq!(
            seen,
            vec![(PipelineKind::Asset, WatchEvent::modified("/p/web/b.js"))]
        );
    }
}
