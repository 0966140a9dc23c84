//! Entry point for the presentation layer.
//!
//! [`KnowledgeBase`] ties an [`IndexCache`] to a [`ContentResolver`]: the UI
//! asks for the navigation tree and for route content and never touches the
//! content source directly.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use kb_index::{CacheMode, IndexOptions, KnowledgeBase};
//! use kb_source::FsSource;
//!
//! let source = Arc::new(FsSource::new(PathBuf::from("content")));
//! let kb = KnowledgeBase::new(source, IndexOptions::default(), CacheMode::Static);
//!
//! let root = kb.navigation()?;
//! let page = kb.resolve_content(&["javascript", "fundamentals"], Some("qa"))?;
//! ```

use std::sync::Arc;

use kb_source::ContentSource;

use crate::error::IndexError;
use crate::index_cache::{CacheMode, IndexCache};
use crate::options::IndexOptions;
use crate::resolver::{ContentResolver, ResolvedContent};
use crate::tree::{NavigationIndex, NavigationNode};
use crate::variant::Variant;

/// Navigation and content lookup over one content source.
pub struct KnowledgeBase {
    cache: IndexCache,
}

impl KnowledgeBase {
    /// Create a knowledge base. The index is built on first use.
    #[must_use]
    pub fn new(source: Arc<dyn ContentSource>, options: IndexOptions, mode: CacheMode) -> Self {
        Self {
            cache: IndexCache::new(source, options, mode),
        }
    }

    /// Root of the navigation tree.
    ///
    /// Without an intervening rebuild, repeated calls return the same `Arc`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::RootUnreadable`] if the index cannot be built.
    pub fn navigation(&self) -> Result<Arc<NavigationNode>, IndexError> {
        Ok(Arc::clone(self.cache.get()?.root()))
    }

    /// Current index.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::RootUnreadable`] if the index cannot be built.
    pub fn index(&self) -> Result<Arc<NavigationIndex>, IndexError> {
        self.cache.get()
    }

    /// Resolve a route with an optional variant name.
    ///
    /// Accepted names: `questionsOnly`, `questions-only`, `questions`, `q`,
    /// `questionsAndAnswers`, `questions-and-answers`, `answers`, `qa`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::UnknownVariant`] for any other name, plus every
    /// error of [`KnowledgeBase::resolve`].
    pub fn resolve_content<S: AsRef<str>>(
        &self,
        segments: &[S],
        variant: Option<&str>,
    ) -> Result<ResolvedContent, IndexError> {
        let variant = variant.map(str::parse::<Variant>).transpose()?;
        self.resolve(segments, variant)
    }

    /// Resolve a route with a typed variant.
    ///
    /// # Errors
    ///
    /// Returns the index build error or any resolution error of
    /// [`ContentResolver::resolve`].
    pub fn resolve<S: AsRef<str>>(
        &self,
        segments: &[S],
        variant: Option<Variant>,
    ) -> Result<ResolvedContent, IndexError> {
        let index = self.cache.get()?;
        ContentResolver::new(&index, self.cache.source().as_ref()).resolve(segments, variant)
    }

    /// Mark the index stale. Returns `false` in [`CacheMode::Static`].
    pub fn invalidate(&self) -> bool {
        self.cache.invalidate()
    }

    /// Rebuild policy.
    #[must_use]
    pub fn mode(&self) -> CacheMode {
        self.cache.mode()
    }

    /// Generation of the last published index.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.cache.generation()
    }

    /// Content source the knowledge base reads from.
    #[must_use]
    pub fn source(&self) -> &Arc<dyn ContentSource> {
        self.cache.source()
    }
}

#[cfg(test)]
mod tests {
    use kb_source::MockSource;
    use pretty_assertions::assert_eq;

    use super::*;

    static_assertions::assert_impl_all!(KnowledgeBase: Send, Sync);

    fn knowledge_base() -> KnowledgeBase {
        let source = MockSource::new()
            .with_file("01_go/01_basics/questions.md", "# Basics")
            .with_file("01_go/01_basics/answers.md", "# Basics\n\nQuestion: a\nAnswer: b");
        KnowledgeBase::new(Arc::new(source), IndexOptions::default(), CacheMode::Static)
    }

    #[test]
    fn test_navigation_is_reference_identical() {
        let kb = knowledge_base();

        let first = kb.navigation().unwrap();
        let second = kb.navigation().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_resolve_content_with_alias() {
        let kb = knowledge_base();

        let resolved = kb.resolve_content(&["go", "basics"], Some("q")).unwrap();

        assert_eq!(resolved.variant, Variant::QuestionsOnly);
        assert_eq!(resolved.content, "# Basics");
    }

    #[test]
    fn test_resolve_content_unknown_variant() {
        let kb = knowledge_base();

        let err = kb.resolve_content(&["go", "basics"], Some("solutions")).unwrap_err();

        assert!(matches!(err, IndexError::UnknownVariant(v) if v == "solutions"));
    }

    #[test]
    fn test_resolve_content_default() {
        let kb = knowledge_base();

        let resolved = kb.resolve_content(&["go", "basics"], None).unwrap();

        assert_eq!(resolved.variant, Variant::QuestionsAndAnswers);
        assert_eq!(kb.generation(), 1);
    }
}
