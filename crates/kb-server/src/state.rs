//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use kb_index::KnowledgeBase;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Index and content lookup.
    pub(crate) kb: Arc<KnowledgeBase>,
    /// Application version for `ETag` computation.
    pub(crate) version: String,
}
