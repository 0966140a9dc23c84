//! Route resolution.
//!
//! Maps a slug path plus an optional variant to document content and the
//! node's navigation context. Document bodies are read from the source on
//! every call; only the tree is cached.

use kb_source::ContentSource;
use serde::Serialize;

use crate::error::IndexError;
use crate::markdown;
use crate::tree::{NavigationIndex, Node};
use crate::variant::Variant;

/// Content of a topic plus its navigation context.
#[derive(Clone, Debug, Serialize)]
pub struct ResolvedContent {
    /// Matched topic.
    pub node: Node,
    /// Variant served.
    pub variant: Variant,
    /// Every variant the topic offers.
    pub variants: Vec<Variant>,
    /// First heading of the document, else the node title.
    pub title: String,
    /// Second-level headings of the document, in order.
    pub headings: Vec<String>,
    /// Raw markdown of the served variant.
    pub content: String,
    /// Root to node, inclusive.
    pub breadcrumb: Vec<Node>,
    /// Other children of the node's parent, in order.
    pub siblings: Vec<Node>,
    /// Nearest preceding sibling topic.
    pub previous: Option<Node>,
    /// Nearest following sibling topic.
    pub next: Option<Node>,
    /// Generation of the index the result came from.
    pub generation: u64,
}

/// Normalize route segments into a lookup key.
///
/// Segments may themselves contain `/`; empty segments are dropped, so
/// `["javascript/", "", "fundamentals"]` and `["javascript/fundamentals"]`
/// both yield `"javascript/fundamentals"`.
#[must_use]
pub fn route_key<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .flat_map(|s| s.as_ref().split('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Resolves routes against one published index.
pub struct ContentResolver<'a> {
    index: &'a NavigationIndex,
    source: &'a dyn ContentSource,
}

impl<'a> ContentResolver<'a> {
    /// Create a resolver over an index and the source it was built from.
    #[must_use]
    pub fn new(index: &'a NavigationIndex, source: &'a dyn ContentSource) -> Self {
        Self { index, source }
    }

    /// Resolve a route to content.
    ///
    /// Without a requested variant, answers are served if present.
    ///
    /// # Errors
    ///
    /// - [`IndexError::NotFound`] if no node matches
    /// - [`IndexError::NotATopic`] if the route names a category
    /// - [`IndexError::VariantUnavailable`] if the topic lacks `variant`
    /// - [`IndexError::ContentRead`] if the document cannot be read
    pub fn resolve<S: AsRef<str>>(
        &self,
        segments: &[S],
        variant: Option<Variant>,
    ) -> Result<ResolvedContent, IndexError> {
        let route = route_key(segments);
        let Some(idx) = self.index.lookup(&route) else {
            return Err(IndexError::NotFound(route));
        };
        let node = self.index.node(idx);

        let fallback = match Variant::preferred(&node.variants) {
            Some(preferred) if node.is_topic() => preferred,
            _ => return Err(IndexError::NotATopic(route)),
        };

        let chosen = match variant {
            None => fallback,
            Some(requested) if node.variants.contains_key(&requested) => requested,
            Some(requested) => {
                return Err(IndexError::VariantUnavailable {
                    path: route,
                    requested,
                    fallback,
                });
            }
        };

        let location = &node.variants[&chosen];
        let content =
            self.source
                .read_entry(location)
                .map_err(|source| IndexError::ContentRead {
                    path: location.clone(),
                    source,
                })?;
        let outline = markdown::outline(&content);
        let (previous, next) = self.index.adjacent_topics(idx);

        tracing::debug!(route = %route, variant = %chosen, "Resolved content");

        Ok(ResolvedContent {
            node: node.clone(),
            variant: chosen,
            variants: node.variant_list(),
            title: outline.title.unwrap_or_else(|| node.title.clone()),
            headings: outline.sections,
            content,
            breadcrumb: self.index.breadcrumb(idx).into_iter().cloned().collect(),
            siblings: self.index.siblings(idx).into_iter().cloned().collect(),
            previous: previous.cloned(),
            next: next.cloned(),
            generation: self.index.generation(),
        })
    }
}

#[cfg(test)]
mod tests {
    use kb_source::MockSource;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::options::IndexOptions;
    use crate::scanner::DocumentScanner;
    use crate::tree::NavigationTreeBuilder;

    fn build(source: &MockSource) -> NavigationIndex {
        let options = IndexOptions::default();
        let report = DocumentScanner::new(source, &options).scan().unwrap();
        NavigationTreeBuilder::new("Home").build(report, 3)
    }

    fn fixture() -> MockSource {
        MockSource::new()
            .with_file("01_go/01_basics/questions.md", "# Basics\n\n## Types\n\n## Loops")
            .with_file(
                "01_go/01_basics/questions_with_answers.md",
                "# Basics QA\n\n## Types\n\nAnswer: ...",
            )
            .with_file("01_go/02_slices/questions.md", "# Slices")
    }

    #[test]
    fn test_route_key_normalizes_segments() {
        assert_eq!(route_key(&["go/", "", "basics"]), "go/basics");
        assert_eq!(route_key(&["go/basics"]), "go/basics");
        assert_eq!(route_key::<&str>(&[]), "");
    }

    #[test]
    fn test_default_variant_prefers_answers() {
        let source = fixture();
        let index = build(&source);

        let resolved = ContentResolver::new(&index, &source)
            .resolve(&["go", "basics"], None)
            .unwrap();

        assert_eq!(resolved.variant, Variant::QuestionsAndAnswers);
        assert_eq!(resolved.title, "Basics QA");
        assert_eq!(
            resolved.variants,
            vec![Variant::QuestionsOnly, Variant::QuestionsAndAnswers]
        );
        assert_eq!(resolved.generation, 3);
    }

    #[test]
    fn test_requested_variant() {
        let source = fixture();
        let index = build(&source);

        let resolved = ContentResolver::new(&index, &source)
            .resolve(&["go", "basics"], Some(Variant::QuestionsOnly))
            .unwrap();

        assert_eq!(resolved.content, "# Basics\n\n## Types\n\n## Loops");
        assert_eq!(resolved.headings, vec!["Types".to_owned(), "Loops".to_owned()]);
    }

    #[test]
    fn test_default_variant_questions_only() {
        let source = fixture();
        let index = build(&source);

        let resolved = ContentResolver::new(&index, &source)
            .resolve(&["go", "slices"], None)
            .unwrap();

        assert_eq!(resolved.variant, Variant::QuestionsOnly);
    }

    #[test]
    fn test_variant_unavailable_names_fallback() {
        let source = fixture();
        let index = build(&source);

        let err = ContentResolver::new(&index, &source)
            .resolve(&["go", "slices"], Some(Variant::QuestionsAndAnswers))
            .unwrap_err();

        assert!(matches!(
            err,
            IndexError::VariantUnavailable {
                requested: Variant::QuestionsAndAnswers,
                fallback: Variant::QuestionsOnly,
                ..
            }
        ));
    }

    #[test]
    fn test_not_found() {
        let source = fixture();
        let index = build(&source);

        let err = ContentResolver::new(&index, &source)
            .resolve(&["go", "channels"], None)
            .unwrap_err();

        assert!(matches!(err, IndexError::NotFound(route) if route == "go/channels"));
    }

    #[test]
    fn test_category_is_not_a_topic() {
        let source = fixture();
        let index = build(&source);
        let resolver = ContentResolver::new(&index, &source);

        assert!(matches!(
            resolver.resolve(&["go"], None),
            Err(IndexError::NotATopic(_))
        ));
        assert!(matches!(
            resolver.resolve::<&str>(&[], None),
            Err(IndexError::NotATopic(_))
        ));
    }

    #[test]
    fn test_context_breadcrumb_siblings_pager() {
        let source = fixture();
        let index = build(&source);

        let resolved = ContentResolver::new(&index, &source)
            .resolve(&["go", "basics"], None)
            .unwrap();

        let crumbs: Vec<_> = resolved.breadcrumb.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(crumbs, vec!["Home", "Go", "Basics"]);
        assert_eq!(resolved.siblings.len(), 1);
        assert_eq!(resolved.siblings[0].slug, "slices");
        assert!(resolved.previous.is_none());
        assert_eq!(resolved.next.map(|n| n.slug), Some("slices".to_owned()));
    }

    #[test]
    fn test_document_removed_after_build() {
        let source = fixture();
        let index = build(&source);
        let shrunk = MockSource::new();

        let err = ContentResolver::new(&index, &shrunk)
            .resolve(&["go", "slices"], None)
            .unwrap_err();

        assert!(matches!(err, IndexError::ContentRead { path, .. } if path == "01_go/02_slices/questions.md"));
    }

    #[test]
    fn test_title_falls_back_to_node_title() {
        let source = MockSource::new().with_file("01_go/01_maps/questions.md", "no heading");
        let index = build(&source);

        let resolved = ContentResolver::new(&index, &source)
            .resolve(&["go", "maps"], None)
            .unwrap();

        assert_eq!(resolved.title, "Maps");
    }
}
