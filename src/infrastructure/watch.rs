//! OS file watching via `notify`

use std::path::PathBuf;
use std::sync::mpsc::Sender;

use notify::event::{EventKind, ModifyKind, RenameMode};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::domain::value_objects::{ChangeKind, WatchEvent};
use crate::error::SdkResult;

/// Translate a notify event into zero or more watch events.
pub fn watch_events(event: Event) -> Vec<WatchEvent> {
    let kind = match event.kind {
        EventKind::Create(_) => ChangeKind::Created,
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => ChangeKind::Deleted,
        EventKind::Modify(ModifyKind::Metadata(_)) => return Vec::new(),
        EventKind::Modify(_) => ChangeKind::Modified,
        EventKind::Remove(_) => ChangeKind::Deleted,
        EventKind::Access(_) | EventKind::Any | EventKind::Other => return Vec::new(),
    };
    event
        .paths
        .into_iter()
        .map(|path| WatchEvent::new(path, kind))
        .collect()
}

/// Watch `roots` recursively, forwarding events to `tx`.
///
/// Watching stops when the returned watcher is dropped.
pub fn spawn_watcher(roots: &[PathBuf], tx: Sender<WatchEvent>) -> SdkResult<RecommendedWatcher> {
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                for event in watch_events(event) {
                    let _ = tx.send(event);
                }
            }
            Err(e) => tracing::warn!(error = %e, "file watcher error"),
        },
        Config::default(),
    )?;

    for root in roots {
        watcher.watch(root, RecursiveMode::Recursive)?;
    }
    Ok(watcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind, RemoveKind};

    fn event(kind: EventKind) -> Event {
        Event::new(kind).add_path(PathBuf::from("/p/web/app.js"))
    }

    #[test]
    fn maps_create_modify_remove() {
        assert_eq!(
            watch_events(event(EventKind::Create(CreateKind::File))),
            vec![WatchEvent::new("/p/web/app.js", ChangeKind::Created)]
        );
        assert_eq!(
            watch_events(event(EventKind::Modify(ModifyKind::Data(DataChange::Content)))),
            vec![WatchEvent::modified("/p/web/app.js")]
        );
        assert_eq!(
            watch_events(event(EventKind::Remove(RemoveKind::File))),
            vec![WatchEvent::new("/p/web/app.js", ChangeKind::Deleted)]
        );
    }

    #[test]
    fn ignores_access_and_metadata_noise() {
        assert!(watch_events(event(EventKind::Access(AccessKind::Any))).is_empty());
        assert!(watch_events(event(EventKind::Modify(ModifyKind::Metadata(
            MetadataKind::WriteTime
        ))))
        .is_empty());
    }

    #[test]
    fn rename_source_counts_as_deleted() {
        assert_eq!(
            watch_events(event(EventKind::Modify(ModifyKind::Name(RenameMode::From)))),
            vec![WatchEvent::new("/p/web/app.js", ChangeKind::Deleted)]
        );
    }
}
