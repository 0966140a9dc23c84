//! Content source trait and error types.
//!
//! Provides the core [`ContentSource`] trait for listing and reading documents,
//! along with [`SourceError`] for unified error handling across backends.
//!
//! # Path Convention
//!
//! All path parameters are `/`-separated paths relative to the content root:
//! - `""` - the content root itself
//! - `"01_javascript"` - a top-level directory
//! - `"01_javascript/01_fundamentals/questions.md"` - a document file
//!
//! Backends map these paths to their internal storage format.

use std::path::PathBuf;

use crate::event::{SourceEventReceiver, WatchHandle};

/// Kind of a directory entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntryKind {
    /// A regular file (document candidate).
    File,
    /// A directory (category or topic candidate).
    Directory,
}

/// One immediate child of a listed directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceEntry {
    /// Raw entry name as stored (e.g., "07_go", "questions.md").
    pub name: String,
    /// Whether the entry is a file or a directory.
    pub kind: EntryKind,
}

impl SourceEntry {
    /// Create a file entry.
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    /// Create a directory entry.
    #[must_use]
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }

    /// True if the entry is a directory.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Join a parent path and a child name using the `/` convention.
///
/// ```
/// assert_eq!(kb_source::join_path("", "a"), "a");
/// assert_eq!(kb_source::join_path("a", "b.md"), "a/b.md");
/// ```
#[must_use]
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_owned()
    } else {
        format!("{parent}/{name}")
    }
}

/// Semantic error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceErrorKind {
    /// Entry does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid path (e.g., contains `..`).
    InvalidPath,
    /// A directory operation was requested on a file.
    NotADirectory,
    /// Other/unknown error category.
    Other,
}

/// Content source error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct SourceError {
    kind: SourceErrorKind,
    path: Option<PathBuf>,
    backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    /// Create a new source error.
    #[must_use]
    pub fn new(kind: SourceErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Semantic error category.
    #[must_use]
    pub fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    /// Path context, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }

    /// Backend identifier, if any.
    #[must_use]
    pub fn backend(&self) -> Option<&'static str> {
        self.backend
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(SourceErrorKind::NotFound).with_path(path)
    }

    /// Create a source error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => SourceErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => SourceErrorKind::PermissionDenied,
            std::io::ErrorKind::NotADirectory => SourceErrorKind::NotADirectory,
            _ => SourceErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            SourceErrorKind::NotFound => "Not found",
            SourceErrorKind::PermissionDenied => "Permission denied",
            SourceErrorKind::InvalidPath => "Invalid path",
            SourceErrorKind::NotADirectory => "Not a directory",
            SourceErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Capability for listing and reading knowledge-base documents.
///
/// The index engine is written against this trait only, so the content root is an
/// injected dependency rather than ambient filesystem state.
pub trait ContentSource: Send + Sync {
    /// List the immediate children of a directory.
    ///
    /// The order of returned entries is unspecified; consumers must sort.
    ///
    /// # Arguments
    ///
    /// * `path` - Directory path relative to the content root (`""` for the root)
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the directory doesn't exist or can't be listed.
    fn list_entries(&self, path: &str) -> Result<Vec<SourceEntry>, SourceError>;

    /// Read the full text of a file.
    ///
    /// # Arguments
    ///
    /// * `path` - File path relative to the content root
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file doesn't exist or can't be read.
    fn read_entry(&self, path: &str) -> Result<String, SourceError>;

    /// Start watching for content changes.
    ///
    /// Returns a receiver for events and a handle to stop watching.
    /// Default implementation returns a no-op receiver for backends
    /// that don't support change notification.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if watching cannot be started.
    fn watch(&self) -> Result<(SourceEventReceiver, WatchHandle), SourceError> {
        Ok((SourceEventReceiver::no_op(), WatchHandle::no_op()))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    static_assertions::assert_impl_all!(SourceError: Send, Sync);

    #[test]
    fn test_join_path_root() {
        assert_eq!(join_path("", "01_go"), "01_go");
    }

    #[test]
    fn test_join_path_nested() {
        assert_eq!(join_path("01_go/02_slices", "q.md"), "01_go/02_slices/q.md");
    }

    #[test]
    fn test_source_entry_constructors() {
        assert!(SourceEntry::directory("01_go").is_directory());
        assert!(!SourceEntry::file("q.md").is_directory());
    }

    #[test]
    fn test_source_error_new() {
        let err = SourceError::new(SourceErrorKind::NotFound);

        assert_eq!(err.kind(), SourceErrorKind::NotFound);
        assert!(err.path().is_none());
        assert!(err.backend().is_none());
    }

    #[test]
    fn test_source_error_not_found() {
        let err = SourceError::not_found("a/b.md");

        assert_eq!(err.kind(), SourceErrorKind::NotFound);
        assert_eq!(err.path(), Some(Path::new("a/b.md")));
    }

    #[test]
    fn test_source_error_io_permission_denied() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = SourceError::io(io_err, None);

        assert_eq!(err.kind(), SourceErrorKind::PermissionDenied);
    }

    #[test]
    fn test_source_error_io_other() {
        let io_err = std::io::Error::other("boom");
        let err = SourceError::io(io_err, Some(PathBuf::from("x")));

        assert_eq!(err.kind(), SourceErrorKind::Other);
        assert_eq!(err.path(), Some(Path::new("x")));
    }

    #[test]
    fn test_source_error_display_simple() {
        let err = SourceError::new(SourceErrorKind::InvalidPath);

        assert_eq!(err.to_string(), "Invalid path");
    }

    #[test]
    fn test_source_error_display_full() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = SourceError::new(SourceErrorKind::NotFound)
            .with_backend("Fs")
            .with_path("/content/a.md")
            .with_source(io_err);

        assert_eq!(
            err.to_string(),
            "[Fs] Not found: file not found (path: /content/a.md)"
        );
    }

    #[test]
    fn test_source_error_exposes_source() {
        let io_err = std::io::Error::other("inner");
        let err = SourceError::new(SourceErrorKind::Other).with_source(io_err);

        assert!(std::error::Error::source(&err).is_some());
    }
}
