//! Content source abstraction for the knowledge-base index.
//!
//! This crate provides a [`ContentSource`] trait that hides where the question/answer
//! documents live. The index engine only ever sees directory listings and file
//! bodies addressed by `/`-separated paths relative to the content root, which
//! enables:
//!
//! - **Unit testing** against an in-memory fixture instead of real disk
//! - **Explicit dependencies**: the content root is passed in, never a hidden global
//! - **Change notification** for watch-enabled development servers
//!
//! # Architecture
//!
//! The crate provides:
//! - [`ContentSource`] trait with `list_entries()`, `read_entry()`, and `watch()` methods
//! - [`FsSource`] implementation backed by a directory on the local filesystem
//! - [`MockSource`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use kb_source::{ContentSource, FsSource};
//!
//! let source = FsSource::new(PathBuf::from("content"));
//! for entry in source.list_entries("")? {
//!     println!("{} ({:?})", entry.name, entry.kind);
//! }
//! ```

mod debouncer;
mod event;
mod fs;
#[cfg(feature = "mock")]
mod mock;
mod source;

pub use event::{SourceEvent, SourceEventKind, SourceEventReceiver, WatchHandle};
pub use fs::FsSource;
#[cfg(feature = "mock")]
pub use mock::MockSource;
pub use source::{
    ContentSource, EntryKind, SourceEntry, SourceError, SourceErrorKind, join_path,
};
