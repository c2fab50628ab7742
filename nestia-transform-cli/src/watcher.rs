//! Snapshot watcher for development mode.
//!
//! Re-runs are triggered by debounced changes to `*.nestia.json` files.
//! Paths under the ignored directory (normally the output directory) never
//! trigger, so writing results cannot retrigger the run that wrote them.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};
use tracing::trace;

use crate::error::{CliResult, WatchError};
use crate::scanner::is_snapshot;

/// Event types for snapshot changes.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// A snapshot was created or modified.
    Modified(PathBuf),
    /// A snapshot was deleted.
    Deleted(PathBuf),
    /// An error occurred.
    Error(String),
}

/// File watcher for snapshot directories.
pub struct FileWatcher {
    /// Root directory to watch.
    root: PathBuf,
    /// Directory whose changes are ignored.
    ignored: Option<PathBuf>,
    /// Debounce duration in milliseconds.
    debounce_ms: u64,
}

impl FileWatcher {
    /// Create a new file watcher for the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignored: None,
            debounce_ms: 500,
        }
    }

    /// Set the debounce duration in milliseconds.
    pub fn with_debounce(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Ignore changes below `dir`.
    pub fn ignoring(mut self, dir: impl Into<PathBuf>) -> Self {
        self.ignored = Some(dir.into());
        self
    }

    /// Start watching for snapshot changes.
    ///
    /// The debouncer must be kept alive for events to arrive.
    pub fn watch(&self) -> CliResult<(Debouncer<RecommendedWatcher>, Receiver<WatchEvent>)> {
        let (tx, rx) = channel::<WatchEvent>();
        let ignored = self.ignored.as_deref().map(absolute);

        let mut debouncer = new_debouncer(
            Duration::from_millis(self.debounce_ms),
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    for event in events {
                        let path = event.path;
                        if !is_relevant(&path, ignored.as_deref()) {
                            trace!(path = %path.display(), "Ignoring change");
                            continue;
                        }
                        let watch_event = if path.exists() {
                            WatchEvent::Modified(path)
                        } else {
                            WatchEvent::Deleted(path)
                        };
                        let _ = tx.send(watch_event);
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatchEvent::Error(e.to_string()));
                }
            },
        )
        .map_err(|e| WatchError::Init(e.to_string()))?;

        debouncer
            .watcher()
            .watch(&self.root, RecursiveMode::Recursive)
            .map_err(|e| WatchError::Notify(e.to_string()))?;

        Ok((debouncer, rx))
    }

    /// Get the root directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Whether a change to `path` should trigger a run.
fn is_relevant(path: &Path, ignored: Option<&Path>) -> bool {
    is_snapshot(path) && !ignored.is_some_and(|dir| path.starts_with(dir))
}

/// Event paths are absolute; make the ignored directory comparable.
fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::env::current_dir().map(|cwd| cwd.join(path)))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl WatchEvent {
    /// Get the path associated with this event.
    pub fn path(&self) -> Option<&Path> {
        match self {
            WatchEvent::Modified(p) | WatchEvent::Deleted(p) => Some(p),
            WatchEvent::Error(_) => None,
        }
    }

    /// Get the error message if this is an error event.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            WatchEvent::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_event_path() {
        let path = PathBuf::from("/snapshots/A.nestia.json");

        assert_eq!(
            WatchEvent::Modified(path.clone()).path(),
            Some(path.as_path())
        );
        assert_eq!(WatchEvent::Deleted(path.clone()).path(), Some(path.as_path()));
        assert_eq!(WatchEvent::Error("boom".to_string()).path(), None);
    }

    #[test]
    fn test_watch_event_error_message() {
        assert_eq!(
            WatchEvent::Modified(PathBuf::from("/a")).error_message(),
            None
        );
        assert_eq!(
            WatchEvent::Error("boom".to_string()).error_message(),
            Some("boom")
        );
    }

    #[test]
    fn test_relevance() {
        let out = Path::new("/project/transformed");
        assert!(is_relevant(Path::new("/project/A.nestia.json"), Some(out)));
        assert!(!is_relevant(
            Path::new("/project/transformed/A.nestia.json"),
            Some(out)
        ));
        assert!(!is_relevant(Path::new("/project/A.ts"), None));
    }

    #[test]
    fn test_file_watcher_builder() {
        let watcher = FileWatcher::new("/snapshots")
            .with_debounce(1000)
            .ignoring("/snapshots/out");
        assert_eq!(watcher.root(), Path::new("/snapshots"));
        assert_eq!(watcher.debounce_ms, 1000);
        assert_eq!(watcher.ignored, Some(PathBuf::from("/snapshots/out")));
    }
}
