//! Change events delivered by [`ContentSource::watch`](crate::ContentSource::watch).

use std::sync::mpsc;

/// Kind of content change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceEventKind {
    /// Entry was created.
    Created,
    /// Entry was modified.
    Modified,
    /// Entry was removed.
    Removed,
}

/// A content change event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceEvent {
    /// Path relative to the content root (e.g., "01_go/01_basics/questions.md").
    pub path: String,
    /// Kind of change.
    pub kind: SourceEventKind,
}

/// Receiver for content change events.
///
/// Wraps a [`std::sync::mpsc::Receiver`]; iterate with [`iter()`](Self::iter)
/// or poll with [`try_recv()`](Self::try_recv).
pub struct SourceEventReceiver {
    rx: mpsc::Receiver<SourceEvent>,
}

impl SourceEventReceiver {
    pub(crate) fn new(rx: mpsc::Receiver<SourceEvent>) -> Self {
        Self { rx }
    }

    /// Wait for the next event (blocking).
    ///
    /// Returns `None` when the sender is dropped.
    #[must_use]
    pub fn recv(&self) -> Option<SourceEvent> {
        self.rx.recv().ok()
    }

    /// Try to receive an event without blocking.
    #[must_use]
    pub fn try_recv(&self) -> Option<SourceEvent> {
        self.rx.try_recv().ok()
    }

    /// Blocking iterator over events. Ends when the sender is dropped.
    pub fn iter(&self) -> impl Iterator<Item = SourceEvent> + '_ {
        self.rx.iter()
    }

    /// Receiver that never yields events.
    pub(crate) fn no_op() -> Self {
        let (_tx, rx) = mpsc::channel();
        Self { rx }
    }
}

/// Handle to stop watching for changes.
///
/// Dropping the handle stops watching: the watcher thread observes the
/// shutdown channel disconnecting.
pub struct WatchHandle {
    _shutdown: Option<mpsc::Sender<()>>,
}

impl WatchHandle {
    pub(crate) fn new(shutdown: mpsc::Sender<()>) -> Self {
        Self {
            _shutdown: Some(shutdown),
        }
    }

    /// Stop watching immediately.
    pub fn stop(mut self) {
        self._shutdown.take();
    }

    /// Handle that does nothing on drop.
    pub(crate) fn no_op() -> Self {
        Self { _shutdown: None }
    }
}
