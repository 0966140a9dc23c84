//! Mock content source for testing.
//!
//! Provides [`MockSource`] for exercising the index engine without filesystem access.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, mpsc};

use crate::event::{SourceEvent, SourceEventKind, SourceEventReceiver, WatchHandle};
use crate::source::{ContentSource, SourceEntry, SourceError, SourceErrorKind};

const BACKEND: &str = "Mock";

/// In-memory content source.
///
/// Directories are implied by file paths. Listings return children in the
/// order they were first added, which lets tests feed the scanner a scrambled
/// discovery order.
///
/// # Example
///
/// ```ignore
/// use kb_source::{ContentSource, MockSource};
///
/// let source = MockSource::new()
///     .with_file("01_go/01_basics/questions.md", "# Basics")
///     .with_unreadable("01_go/02_broken");
///
/// let entries = source.list_entries("01_go")?;
/// ```
#[derive(Debug, Default)]
pub struct MockSource {
    /// Every known path (files and directories) in insertion order.
    paths: RwLock<Vec<String>>,
    dirs: RwLock<HashSet<String>>,
    files: RwLock<HashMap<String, String>>,
    unreadable: RwLock<HashSet<String>>,
    reads: RwLock<Vec<String>>,
    event_sender: RwLock<Option<mpsc::Sender<SourceEvent>>>,
}

impl MockSource {
    /// Create an empty mock source (the root directory exists).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn register_dirs(&self, path: &str) {
        let mut dirs = self.dirs.write().unwrap();
        let mut paths = self.paths.write().unwrap();
        let mut prefix = String::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            if dirs.insert(prefix.clone()) {
                paths.push(prefix.clone());
            }
        }
    }

    /// Add a file; parent directories are created implicitly.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        if let Some((parent, _)) = path.rsplit_once('/') {
            self.register_dirs(parent);
        }
        let previous = self
            .files
            .write()
            .unwrap()
            .insert(path.clone(), content.into());
        if previous.is_none() {
            self.paths.write().unwrap().push(path);
        }
        self
    }

    /// Add an (initially empty) directory.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    #[must_use]
    pub fn with_dir(self, path: impl Into<String>) -> Self {
        self.register_dirs(&path.into());
        self
    }

    /// Make a path fail with `PermissionDenied` on listing or reading.
    ///
    /// The path still appears in its parent's listing. Use `""` for the root.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    #[must_use]
    pub fn with_unreadable(self, path: impl Into<String>) -> Self {
        self.unreadable.write().unwrap().insert(path.into());
        self
    }

    /// Paths passed to `read_entry`, in call order.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    #[must_use]
    pub fn reads(&self) -> Vec<String> {
        self.reads.read().unwrap().clone()
    }

    /// Emit a change event. Only delivered after `watch()` was called.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub fn emit(&self, path: impl Into<String>, kind: SourceEventKind) {
        if let Some(sender) = self.event_sender.read().unwrap().as_ref() {
            let _ = sender.send(SourceEvent {
                path: path.into(),
                kind,
            });
        }
    }

    /// Emit a `Modified` event.
    pub fn emit_modified(&self, path: impl Into<String>) {
        self.emit(path, SourceEventKind::Modified);
    }

    fn check_readable(&self, path: &str) -> Result<(), SourceError> {
        if self.unreadable.read().unwrap().contains(path) {
            return Err(SourceError::new(SourceErrorKind::PermissionDenied)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(())
    }
}

impl ContentSource for MockSource {
    fn list_entries(&self, path: &str) -> Result<Vec<SourceEntry>, SourceError> {
        self.check_readable(path)?;

        let dirs = self.dirs.read().unwrap();
        if !path.is_empty() && !dirs.contains(path) {
            let kind = if self.files.read().unwrap().contains_key(path) {
                SourceErrorKind::NotADirectory
            } else {
                SourceErrorKind::NotFound
            };
            return Err(SourceError::new(kind).with_path(path).with_backend(BACKEND));
        }

        let entries = self
            .paths
            .read()
            .unwrap()
            .iter()
            .filter_map(|p| {
                let name = if path.is_empty() {
                    p.as_str()
                } else {
                    p.strip_prefix(path)?.strip_prefix('/')?
                };
                if name.contains('/') {
                    return None;
                }
                Some(if dirs.contains(p) {
                    SourceEntry::directory(name)
                } else {
                    SourceEntry::file(name)
                })
            })
            .collect();

        Ok(entries)
    }

    fn read_entry(&self, path: &str) -> Result<String, SourceError> {
        self.reads.write().unwrap().push(path.to_owned());
        self.check_readable(path)?;

        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::not_found(path).with_backend(BACKEND))
    }

    fn watch(&self) -> Result<(SourceEventReceiver, WatchHandle), SourceError> {
        let (tx, rx) = mpsc::channel();
        *self.event_sender.write().unwrap() = Some(tx);
        Ok((SourceEventReceiver::new(rx), WatchHandle::no_op()))
    }
}
