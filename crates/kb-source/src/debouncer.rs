//! Event debouncing for change notification.
//!
//! Editors often emit several raw events per save (write temp file, rename,
//! touch). The debouncer coalesces them into at most one event per path once
//! the path has been quiet for the debounce window.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::event::SourceEventKind;

/// A coalesced event, still carrying the absolute filesystem path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DebouncedEvent {
    pub path: PathBuf,
    pub kind: SourceEventKind,
}

struct Pending {
    kind: SourceEventKind,
    deadline: Instant,
}

/// Thread-safe event debouncer.
pub(crate) struct EventDebouncer {
    pending: Mutex<HashMap<PathBuf, Pending>>,
    window: Duration,
}

impl EventDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            window,
        }
    }

    /// Record a raw event, restarting the quiet window for its path.
    pub fn record(&self, path: PathBuf, kind: SourceEventKind) {
        let mut pending = self.pending.lock().unwrap();
        let deadline = Instant::now() + self.window;

        match pending.entry(path) {
            Entry::Vacant(entry) => {
                entry.insert(Pending { kind, deadline });
            }
            Entry::Occupied(mut entry) => match coalesce(entry.get().kind, kind) {
                Some(kind) => {
                    let slot = entry.get_mut();
                    slot.kind = kind;
                    slot.deadline = deadline;
                }
                // Created then removed inside one window: nothing happened.
                None => {
                    entry.remove();
                }
            },
        }
    }

    /// Remove and return every event whose quiet window has elapsed.
    pub fn drain_ready(&self) -> Vec<DebouncedEvent> {
        let mut pending = self.pending.lock().unwrap();
        let now = Instant::now();
        let mut ready = Vec::new();

        pending.retain(|path, event| {
            if event.deadline <= now {
                ready.push(DebouncedEvent {
                    path: path.clone(),
                    kind: event.kind,
                });
                false
            } else {
                true
            }
        });

        ready
    }
}

/// Merge a new event kind into a pending one. `None` discards both.
#[allow(clippy::match_same_arms)]
fn coalesce(existing: SourceEventKind, new: SourceEventKind) -> Option<SourceEventKind> {
    use SourceEventKind::{Created, Modified, Removed};

    match (existing, new) {
        (Created, Created | Modified) => Some(Created),
        (Created, Removed) => None,
        (Modified, Created) => Some(Created),
        (Modified, Modified) => Some(Modified),
        (Modified, Removed) => Some(Removed),
        (Removed, Created) => Some(Modified),
        (Removed, Modified | Removed) => Some(Removed),
    }
}
