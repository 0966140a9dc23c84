//! `kb show` command implementation.

use clap::Args;
use kb_index::{IndexError, KnowledgeBase, ResolvedContent, Variant};

use super::SourceArgs;
use super::nav::variant_tag;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Topic route, e.g. `javascript/fundamentals`.
    route: String,

    /// Variant to print (`q`, `qa`, `questionsOnly`, `questionsAndAnswers`, ...).
    #[arg(long)]
    variant: Option<String>,

    #[command(flatten)]
    source: SourceArgs,
}

impl ShowArgs {
    /// Execute the show command.
    ///
    /// # Errors
    ///
    /// Returns an error if the route does not resolve to a topic document.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let kb = self.source.knowledge_base()?;
        let route = [self.route.as_str()];
        let (resolved, fallback) = resolve_with_fallback(&kb, &route, self.variant.as_deref())?;
        if let Some(requested) = fallback {
            output.warning(&format!(
                "{requested} is unavailable for /{}, showing {}",
                resolved.node.route(),
                resolved.variant
            ));
        }

        output.muted(&breadcrumb_line(&resolved));
        output.highlight(&resolved.title);
        output.muted(&variants_line(&resolved));
        output.result("");
        output.result(resolved.content.trim_end());

        if let Some(previous) = &resolved.previous {
            output.muted(&format!("< {}  ({})", previous.title, previous.route()));
        }
        if let Some(next) = &resolved.next {
            output.muted(&format!("> {}  ({})", next.title, next.route()));
        }

        Ok(())
    }
}

/// Resolve a route, falling back to the topic's default variant when the
/// requested one is missing.
///
/// Returns the content and, if a fallback happened, the requested variant.
fn resolve_with_fallback(
    kb: &KnowledgeBase,
    route: &[&str],
    variant: Option<&str>,
) -> Result<(ResolvedContent, Option<Variant>), CliError> {
    match kb.resolve_content(route, variant) {
        Ok(resolved) => Ok((resolved, None)),
        Err(IndexError::VariantUnavailable {
            requested,
            fallback,
            ..
        }) => {
            tracing::debug!(%requested, %fallback, "Falling back to available variant");
            let resolved = kb.resolve(route, Some(fallback))?;
            Ok((resolved, Some(requested)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Ancestor titles from the root down to the topic.
fn breadcrumb_line(resolved: &ResolvedContent) -> String {
    resolved
        .breadcrumb
        .iter()
        .map(|n| n.title.as_str())
        .collect::<Vec<_>>()
        .join(" > ")
}

/// Served variant followed by the other available ones.
fn variants_line(resolved: &ResolvedContent) -> String {
    let others: Vec<&str> = resolved
        .variants
        .iter()
        .filter(|v| **v != resolved.variant)
        .map(|v| variant_tag(*v))
        .collect();
    if others.is_empty() {
        format!("[{}]", variant_tag(resolved.variant))
    } else {
        format!("[{}] also: {}", variant_tag(resolved.variant), others.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kb_index::{CacheMode, IndexOptions};
    use kb_source::MockSource;
    use pretty_assertions::assert_eq;

    use super::*;

    fn knowledge_base() -> KnowledgeBase {
        let source = MockSource::new()
            .with_file("01_js/01_closures/questions.md", "# Closures")
            .with_file("01_js/01_closures/qa.md", "# Closures\n\nQuestion: a\nAnswer: b")
            .with_file("01_js/02_scope/questions.md", "# Scope");
        KnowledgeBase::new(Arc::new(source), IndexOptions::default(), CacheMode::Static)
    }

    fn resolved(variant: Option<&str>) -> ResolvedContent {
        knowledge_base()
            .resolve_content(&["js/closures"], variant)
            .unwrap()
    }

    #[test]
    fn test_breadcrumb_line() {
        assert_eq!(breadcrumb_line(&resolved(None)), "Home > Js > Closures");
    }

    #[test]
    fn test_variants_line() {
        assert_eq!(variants_line(&resolved(None)), "[qa] also: q");
        assert_eq!(variants_line(&resolved(Some("q"))), "[q] also: qa");
    }

    #[test]
    fn test_missing_variant_falls_back_to_default() {
        let kb = knowledge_base();

        let (resolved, requested) =
            resolve_with_fallback(&kb, &["js/scope"], Some("qa")).unwrap();

        assert_eq!(resolved.variant, Variant::QuestionsOnly);
        assert_eq!(resolved.content, "# Scope");
        assert_eq!(requested, Some(Variant::QuestionsAndAnswers));
    }

    #[test]
    fn test_available_variant_has_no_fallback() {
        let kb = knowledge_base();

        let (resolved, requested) =
            resolve_with_fallback(&kb, &["js/closures"], Some("q")).unwrap();

        assert_eq!(resolved.variant, Variant::QuestionsOnly);
        assert_eq!(requested, None);
    }

    #[test]
    fn test_unknown_variant_is_still_an_error() {
        let kb = knowledge_base();

        let result = resolve_with_fallback(&kb, &["js/scope"], Some("solutions"));

        assert!(matches!(
            result,
            Err(CliError::Index(IndexError::UnknownVariant(_)))
        ));
    }
}
