//! Filesystem content source.
//!
//! Provides [`FsSource`], which serves documents from a directory on the local
//! filesystem and reports changes through `notify`.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;

use glob::Pattern;
use notify::{RecursiveMode, Watcher};

use crate::debouncer::EventDebouncer;
use crate::event::{SourceEvent, SourceEventKind, SourceEventReceiver, WatchHandle};
use crate::source::{ContentSource, EntryKind, SourceEntry, SourceError, SourceErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Quiet window before a change is reported.
const DEBOUNCE: Duration = Duration::from_millis(100);

/// How often the drain thread checks the debouncer.
const DRAIN_INTERVAL: Duration = Duration::from_millis(50);

/// Filesystem content source rooted at a directory.
///
/// Hidden entries (names starting with `.`) are never listed. Symbolic links
/// are followed, so a link to a directory is reported as a directory; the
/// index scanner caps recursion depth to survive link cycles.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use kb_source::{ContentSource, FsSource};
///
/// let source = FsSource::new(PathBuf::from("content"));
/// let body = source.read_entry("01_go/01_basics/questions.md")?;
/// ```
pub struct FsSource {
    root: PathBuf,
    watch_patterns: Vec<Pattern>,
}

impl FsSource {
    /// Create a filesystem source that reports changes to every visible path.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            watch_patterns: Vec::new(),
        }
    }

    /// Restrict change notification to paths matching any of the glob patterns.
    ///
    /// Invalid patterns are logged and ignored.
    #[must_use]
    pub fn with_watch_patterns(mut self, patterns: &[String]) -> Self {
        self.watch_patterns = patterns
            .iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!(pattern = %p, error = %e, "Ignoring invalid watch pattern");
                    None
                }
            })
            .collect();
        self
    }

    /// Root directory of this source.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path against the root, rejecting traversal.
    fn resolve(&self, path: &str) -> Result<PathBuf, SourceError> {
        let rel = Path::new(path);
        let escapes = rel
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));

        if escapes {
            return Err(SourceError::new(SourceErrorKind::InvalidPath)
                .with_path(rel)
                .with_backend(BACKEND));
        }
        Ok(self.root.join(rel))
    }

    fn is_hidden(name: &str) -> bool {
        name.starts_with('.')
    }
}

impl ContentSource for FsSource {
    fn list_entries(&self, path: &str) -> Result<Vec<SourceEntry>, SourceError> {
        let dir = self.resolve(path)?;
        let read_dir = fs::read_dir(&dir)
            .map_err(|e| SourceError::io(e, Some(dir.clone())).with_backend(BACKEND))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            if Self::is_hidden(&name) {
                continue;
            }

            // fs::metadata follows symlinks, unlike DirEntry::file_type.
            let kind = match fs::metadata(entry.path()) {
                Ok(meta) if meta.is_dir() => EntryKind::Directory,
                Ok(_) => EntryKind::File,
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), error = %e, "Skipping dangling entry");
                    continue;
                }
            };

            entries.push(SourceEntry { name, kind });
        }

        Ok(entries)
    }

    fn read_entry(&self, path: &str) -> Result<String, SourceError> {
        let full_path = self.resolve(path)?;
        fs::read_to_string(&full_path)
            .map_err(|e| SourceError::io(e, Some(full_path.clone())).with_backend(BACKEND))
    }

    fn watch(&self) -> Result<(SourceEventReceiver, WatchHandle), SourceError> {
        let (event_tx, event_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let debouncer = Arc::new(EventDebouncer::new(DEBOUNCE));
        let debouncer_for_watcher = Arc::clone(&debouncer);
        let root = self.root.clone();
        let patterns = self.watch_patterns.clone();

        let mut watcher =
            notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
                let Ok(event) = res else {
                    return;
                };
                let kind = match event.kind {
                    notify::EventKind::Create(_) => SourceEventKind::Created,
                    notify::EventKind::Modify(_) => SourceEventKind::Modified,
                    notify::EventKind::Remove(_) => SourceEventKind::Removed,
                    _ => return,
                };

                for path in event.paths {
                    let Ok(rel_path) = path.strip_prefix(&root) else {
                        continue;
                    };
                    let hidden = rel_path
                        .components()
                        .any(|c| c.as_os_str().to_string_lossy().starts_with('.'));
                    if hidden {
                        continue;
                    }
                    let matches = patterns.is_empty()
                        || patterns.iter().any(|p| p.matches_path(rel_path));
                    if matches {
                        debouncer_for_watcher.record(path, kind);
                    }
                }
            })
            .map_err(|e| {
                SourceError::new(SourceErrorKind::Other)
                    .with_backend(BACKEND)
                    .with_source(e)
            })?;

        watcher
            .watch(&self.root, RecursiveMode::Recursive)
            .map_err(|e| {
                SourceError::new(SourceErrorKind::Other)
                    .with_path(self.root.clone())
                    .with_backend(BACKEND)
                    .with_source(e)
            })?;

        let watcher = Arc::new(Mutex::new(watcher));
        let root = self.root.clone();

        std::thread::spawn(move || {
            // Watcher lives as long as this thread.
            let _watcher_guard = watcher;

            loop {
                match shutdown_rx.recv_timeout(DRAIN_INTERVAL) {
                    Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                    Err(mpsc::RecvTimeoutError::Timeout) => {}
                }

                for event in debouncer.drain_ready() {
                    let Ok(rel_path) = event.path.strip_prefix(&root) else {
                        continue;
                    };
                    let path = rel_path
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy())
                        .collect::<Vec<_>>()
                        .join("/");

                    tracing::debug!(path = %path, kind = ?event.kind, "Content changed");
                    if event_tx
                        .send(SourceEvent {
                            path,
                            kind: event.kind,
                        })
                        .is_err()
                    {
                        return;
                    }
                }
            }
        });

        Ok((SourceEventReceiver::new(event_rx), WatchHandle::new(shutdown_tx)))
    }
}
