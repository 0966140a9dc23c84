//! Error taxonomy for indexing and resolution.
//!
//! Per-entry build errors are recovered: the offending entry is skipped, the
//! error is logged, and it is kept in the index diagnostics. Only an unreadable
//! content root aborts a build. Resolution errors are returned to the caller
//! for a single request and never affect the published index.

use kb_source::SourceError;

use crate::variant::Variant;

/// Indexing or resolution error.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// A file or directory name could not be turned into a slug.
    #[error("Malformed name {name:?} in {}: {reason}", display_dir(.parent))]
    MalformedName {
        /// Raw parent path.
        parent: String,
        /// Raw entry name.
        name: String,
        /// Why the name was rejected.
        reason: String,
    },

    /// Two siblings produced the same slug; the later one was renamed.
    #[error("Duplicate slug {slug:?} in {}: {name:?} renamed to {renamed:?}", display_dir(.parent))]
    DuplicateSlug {
        /// Raw parent path.
        parent: String,
        /// Colliding slug.
        slug: String,
        /// Raw name of the renamed entry.
        name: String,
        /// Slug assigned instead.
        renamed: String,
    },

    /// Two documents of one topic classified as the same variant.
    #[error("Duplicate {variant} document for {topic}: {ignored} ignored")]
    DuplicateVariant {
        /// Raw topic path.
        topic: String,
        /// Variant both documents claimed.
        variant: Variant,
        /// Path of the document that was dropped.
        ignored: String,
    },

    /// A topic ended up without any readable document.
    #[error("Topic {path} has no readable documents")]
    EmptyTopic {
        /// Raw topic path.
        path: String,
    },

    /// A category ended up without children.
    #[error("Category {path} is empty")]
    EmptyCategory {
        /// Raw category path.
        path: String,
    },

    /// A directory was nested deeper than the configured limit.
    #[error("Directory {path} exceeds maximum depth {max_depth}")]
    DepthLimit {
        /// Raw directory path.
        path: String,
        /// Configured limit.
        max_depth: usize,
    },

    /// A file or directory below the root could not be read.
    #[error("Cannot read {path}: {source}")]
    ScanIo {
        /// Raw path of the entry.
        path: String,
        /// Underlying source error.
        #[source]
        source: SourceError,
    },

    /// The content root itself could not be listed. Fatal for the build.
    #[error("Content root is unreadable: {0}")]
    RootUnreadable(#[source] SourceError),

    /// No node matches the requested route.
    #[error("Not found: /{0}")]
    NotFound(String),

    /// The route addresses a category, which has no content of its own.
    #[error("Not a topic: /{0}")]
    NotATopic(String),

    /// The topic exists but lacks the requested variant.
    #[error("Variant {requested} is unavailable for /{path}")]
    VariantUnavailable {
        /// Route of the topic.
        path: String,
        /// Variant that was asked for.
        requested: Variant,
        /// Variant the caller should use instead.
        fallback: Variant,
    },

    /// A variant name did not match any known variant.
    #[error("Unknown variant: {0:?}")]
    UnknownVariant(String),

    /// The document behind a resolved topic could not be read.
    #[error("Cannot read document {path}: {source}")]
    ContentRead {
        /// Storage location of the document.
        path: String,
        /// Underlying source error.
        #[source]
        source: SourceError,
    },
}

impl IndexError {
    /// True for errors that are recovered during a build (skip and log).
    #[must_use]
    pub fn is_recovered(&self) -> bool {
        matches!(
            self,
            Self::MalformedName { .. }
                | Self::DuplicateSlug { .. }
                | Self::DuplicateVariant { .. }
                | Self::EmptyTopic { .. }
                | Self::EmptyCategory { .. }
                | Self::DepthLimit { .. }
                | Self::ScanIo { .. }
        )
    }
}

/// Log a recovered error and keep it in the diagnostics list.
pub(crate) fn record(diagnostics: &mut Vec<IndexError>, err: IndexError) {
    tracing::warn!("{err}");
    diagnostics.push(err);
}

fn display_dir(path: &str) -> &str {
    if path.is_empty() { "<root>" } else { path }
}
