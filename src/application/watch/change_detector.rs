//! Content-based change detection
//!
//! Filters editor save noise: a settled event only proceeds when the file's
//! bytes differ from what was seen last time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::domain::ports::Clock;
use crate::error::SdkResult;

/// Idle time after which the whole content cache is dropped
pub const CONTENT_CACHE_IDLE: Duration = Duration::from_millis(600_000);

#[derive(Debug, Default)]
struct ContentCache {
    contents: HashMap<PathBuf, Vec<u8>>,
    /// Start of the current idle window; `None` while disarmed
    armed_at: Option<Instant>,
}

pub struct ChangeDetector {
    clock: Arc<dyn Clock>,
    idle_window: Duration,
    state: Mutex<ContentCache>,
}

impl ChangeDetector {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_idle_window(clock, CONTENT_CACHE_IDLE)
    }

    pub fn with_idle_window(clock: Arc<dyn Clock>, idle_window: Duration) -> Self {
        Self {
            clock,
            idle_window,
            state: Mutex::new(ContentCache::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, ContentCache> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Read `path` and report whether it differs from the cached content.
    ///
    /// Unseen paths count as changed. The cache always ends up holding the
    /// content just read. A read failure leaves the cache untouched.
    pub fn has_changed(&self, path: &Path) -> SdkResult<bool> {
        let content = std::fs::read(path)?;

        let mut state = self.state();
        if state.armed_at.is_none() {
            state.armed_at = Some(self.clock.now());
        }
        let changed = match state.contents.get(path) {
            Some(previous) => *previous != content,
            None => true,
        };
        state.contents.insert(path.to_path_buf(), content);
        Ok(changed)
    }

    /// Drop the whole cache once the idle window has elapsed.
    ///
    /// Commit activity restarts the window. Returns the number of entries
    /// dropped when a sweep happened; the detector is then disarmed until the
    /// next check.
    pub fn sweep_if_idle(&self, commit_busy: bool) -> Option<usize> {
        let now = self.clock.now();
        let mut state = self.state();
        let armed_at = state.armed_at?;

        if commit_busy {
            state.armed_at = Some(now);
            return None;
        }
        if now.saturating_duration_since(armed_at) < self.idle_window {
            return None;
        }

        let entries = state.contents.len();
        state.contents.clear();
        state.armed_at = None;
        Some(entries)
    }

    pub fn clear(&self) {
        let mut state = self.state();
        state.contents.clear();
        state.armed_at = None;
    }

    pub fn len(&self) -> usize {
        self.state().contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_armed(&self) -> bool {
        self.state().armed_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    /// Clock advanced by hand
    struct ManualClock {
        origin: Instant,
        offset: Mutex<Duration>,
    }

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                origin: Instant::now(),
                offset: Mutex::new(Duration::ZERO),
            })
        }

        fn advance(&self, by: Duration) {
            *self.offset.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.origin + *self.offset.lock().unwrap()
        }
    }

    #[test]
    fn first_observation_is_a_change() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.js");
        fs::write(&file, "one").unwrap();

        let detector = ChangeDetector::new(ManualClock::new());
        assert!(detector.has_changed(&file).unwrap());
        assert_eq!(detector.len(), 1);
    }

    #[test]
    fn identical_content_is_not_a_change() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.js");
        fs::write(&file, "one").unwrap();

        let detector = ChangeDetector::new(ManualClock::new());
        assert!(detector.has_changed(&file).unwrap());
        assert!(!detector.has_changed(&file).unwrap());

        fs::write(&file, "two").unwrap();
        assert!(detector.has_changed(&file).unwrap());
        assert!(!detector.has_changed(&file).unwrap());

        // back to an older version still differs from the latest cached one
        fs::write(&file, "one").unwrap();
        assert!(detector.has_changed(&file).unwrap());
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = tempdir().unwrap();
        let detector = ChangeDetector::new(ManualClock::new());

        let result = detector.has_changed(&dir.path().join("missing.js"));
        assert!(result.is_err());
        assert!(detector.is_empty());
        assert!(!detector.is_armed());
    }

    #[test]
    fn sweep_clears_after_idle_window_and_disarms() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.js");
        fs::write(&file, "one").unwrap();

        let clock = ManualClock::new();
        let detector = ChangeDetector::new(clock.clone());
        assert_eq!(detector.sweep_if_idle(false), None);

        detector.has_changed(&file).unwrap();
        assert!(detector.is_armed());

        clock.advance(CONTENT_CACHE_IDLE - Duration::from_millis(1));
        assert_eq!(detector.sweep_if_idle(false), None);

        clock.advance(Duration::from_millis(1));
        assert_eq!(detector.sweep_if_idle(false), Some(1));
        assert!(!detector.is_armed());
        assert!(detector.is_empty());

        // re-armed on the next check, and unseen again
        assert!(detector.has_changed(&file).unwrap());
        assert!(detector.is_armed());
    }

    #[test]
    fn commit_activity_postpones_sweep() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.js");
        fs::write(&file, "one").unwrap();

        let clock = ManualClock::new();
        let detector = ChangeDetector::new(clock.clone());
        detector.has_changed(&file).unwrap();

        clock.advance(CONTENT_CACHE_IDLE);
        assert_eq!(detector.sweep_if_idle(true), None);

        clock.advance(CONTENT_CACHE_IDLE / 2);
        assert_eq!(detector.sweep_if_idle(false), None);

        clock.advance(CONTENT_CACHE_IDLE / 2);
        assert_eq!(detector.sweep_if_idle(false), Some(1));
    }

    #[test]
    fn clear_drops_everything() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.js");
        fs::write(&file, "one").unwrap();

        let detector = ChangeDetector::new(ManualClock::new());
        detector.has_changed(&file).unwrap();
        detector.clear();
        assert!(detector.is_empty());
        assert!(detector.has_changed(&file).unwrap());
    }
}
