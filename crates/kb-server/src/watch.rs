//! Watch-mode invalidation.
//!
//! Drains [`ContentSource::watch`](kb_source::ContentSource::watch) events on a
//! background thread and marks the index stale. The next request rebuilds it.

use std::sync::Arc;
use std::thread;

use kb_index::KnowledgeBase;
use kb_source::{SourceError, SourceEventReceiver, WatchHandle};

/// Running invalidator.
///
/// Dropping it stops the source watcher; the drain thread exits once the
/// source closes its event channel.
pub(crate) struct ContentWatcher {
    _handle: WatchHandle,
}

impl ContentWatcher {
    /// Start watching the knowledge base's source.
    ///
    /// # Errors
    ///
    /// Returns the source error if the watcher cannot be started.
    pub(crate) fn start(kb: Arc<KnowledgeBase>) -> Result<Self, SourceError> {
        let (events, handle) = kb.source().watch()?;
        thread::Builder::new()
            .name("kb-watch".to_owned())
            .spawn(move || drain(&kb, &events))
            .map_err(|e| SourceError::io(e, None))?;

        Ok(Self { _handle: handle })
    }
}

/// Invalidate on every event until the sender goes away.
fn drain(kb: &KnowledgeBase, events: &SourceEventReceiver) {
    for event in events.iter() {
        tracing::debug!(path = %event.path, kind = ?event.kind, "Content changed");
        if kb.invalidate() {
            tracing::info!(path = %event.path, "Index invalidated");
        }
    }
    tracing::debug!("Watch channel closed");
}
