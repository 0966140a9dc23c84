//! Content variants of a topic and how documents are classified into them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::IndexError;

/// One of the alternative renderings of a topic.
///
/// Ordered so that `QuestionsOnly` comes first in maps and listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Variant {
    /// Questions without worked answers.
    QuestionsOnly,
    /// Questions followed by worked answers.
    QuestionsAndAnswers,
}

/// Available variants of a topic, each mapped to its storage location.
pub type Variants = BTreeMap<Variant, String>;

impl Variant {
    /// Both variants, in display order.
    pub const ALL: [Self; 2] = [Self::QuestionsOnly, Self::QuestionsAndAnswers];

    /// Canonical name (`questionsOnly` / `questionsAndAnswers`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::QuestionsOnly => "questionsOnly",
            Self::QuestionsAndAnswers => "questionsAndAnswers",
        }
    }

    /// The variant served when none is requested: answers if present.
    #[must_use]
    pub fn preferred(variants: &Variants) -> Option<Self> {
        [Self::QuestionsAndAnswers, Self::QuestionsOnly]
            .into_iter()
            .find(|v| variants.contains_key(v))
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "questionsOnly" | "questions-only" | "questions" | "q" => Ok(Self::QuestionsOnly),
            "questionsAndAnswers" | "questions-and-answers" | "answers" | "qa" => {
                Ok(Self::QuestionsAndAnswers)
            }
            other => Err(IndexError::UnknownVariant(other.to_owned())),
        }
    }
}

static QUESTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bquestion(?:\s+#?\d+)?[*_]*\s*:").unwrap());
static ANSWER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\banswer(?:\s+#?\d+)?[*_]*\s*:").unwrap());

/// Suffixes removed from a document base name to find the topic it belongs to.
const VARIANT_SUFFIXES: &[&str] = &[
    "_questions_and_answers",
    "_with_answers",
    "_and_answers",
    "_answers",
    "_questions_only",
    "_questions",
    "_only",
    "_qa",
];

fn normalize(base: &str) -> String {
    base.to_lowercase().replace('-', "_")
}

/// Classify a document by its base name alone.
///
/// Returns `None` when the name follows neither convention.
#[must_use]
pub fn classify_name(base: &str) -> Option<Variant> {
    let name = normalize(base);
    if name == "qa" || name.ends_with("_qa") || name.ends_with("answers") {
        Some(Variant::QuestionsAndAnswers)
    } else if name.ends_with("questions") || name == "only" || name.ends_with("_only") {
        Some(Variant::QuestionsOnly)
    } else {
        None
    }
}

/// Classify a document by its text: a `Question:` marker followed later by an
/// `Answer:` marker means worked answers are present.
#[must_use]
pub fn classify_content(content: &str) -> Variant {
    let has_answers = QUESTION_RE
        .find(content)
        .is_some_and(|q| ANSWER_RE.is_match(&content[q.end()..]));

    if has_answers {
        Variant::QuestionsAndAnswers
    } else {
        Variant::QuestionsOnly
    }
}

/// Classify a document, using the content heuristic only for ambiguous names.
#[must_use]
pub fn classify(base: &str, content: &str) -> Variant {
    classify_name(base).unwrap_or_else(|| classify_content(content))
}

/// Strip variant suffixes from a document base name.
///
/// `closures_questions_with_answers` and `closures` both yield `closures`.
/// A name made only of a marker (`questions`) is returned unchanged.
#[must_use]
pub fn strip_variant_suffix(base: &str) -> &str {
    if !base.is_ascii() {
        return base;
    }

    let mut current = base;
    loop {
        let normalized = normalize(current);
        let stripped = VARIANT_SUFFIXES
            .iter()
            .find(|suffix| normalized.ends_with(*suffix) && normalized.len() > suffix.len())
            .map(|suffix| &current[..current.len() - suffix.len()]);

        match stripped {
            Some(rest) => current = rest,
            None => return current,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_from_str_canonical_and_aliases() {
        for s in ["questionsOnly", "questions-only", "questions", "q"] {
            assert_eq!(s.parse::<Variant>().unwrap(), Variant::QuestionsOnly);
        }
        for s in ["questionsAndAnswers", "questions-and-answers", "answers", "qa"] {
            assert_eq!(s.parse::<Variant>().unwrap(), Variant::QuestionsAndAnswers);
        }
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "solutions".parse::<Variant>().unwrap_err();

        assert!(matches!(err, IndexError::UnknownVariant(s) if s == "solutions"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_string(&Variant::QuestionsAndAnswers).unwrap();

        assert_eq!(json, "\"questionsAndAnswers\"");
    }

    #[test]
    fn test_preferred_is_answers_when_present() {
        let mut variants = Variants::new();
        variants.insert(Variant::QuestionsOnly, "a/q.md".to_owned());

        assert_eq!(Variant::preferred(&variants), Some(Variant::QuestionsOnly));

        variants.insert(Variant::QuestionsAndAnswers, "a/qa.md".to_owned());

        assert_eq!(
            Variant::preferred(&variants),
            Some(Variant::QuestionsAndAnswers)
        );
    }

    #[test]
    fn test_preferred_empty() {
        assert_eq!(Variant::preferred(&Variants::new()), None);
    }

    #[test]
    fn test_classify_name_answers_conventions() {
        for base in [
            "questions_with_answers",
            "Questions-And-Answers",
            "closures_answers",
            "qa",
            "03_closures_qa",
            "closures-QA",
        ] {
            assert_eq!(classify_name(base), Some(Variant::QuestionsAndAnswers), "{base}");
        }
    }

    #[test]
    fn test_classify_name_questions_conventions() {
        for base in ["questions", "closures_questions_only", "only"] {
            assert_eq!(classify_name(base), Some(Variant::QuestionsOnly), "{base}");
        }
    }

    #[test]
    fn test_classify_name_ambiguous() {
        assert_eq!(classify_name("closures"), None);
        assert_eq!(classify_name("README"), None);
        assert_eq!(classify_name("commonly_asked"), None);
        assert_eq!(classify_name("commonly"), None);
    }

    #[test]
    fn test_classify_content_question_then_answer() {
        let content = "## Closures\n\n**Question 1:** What is a closure?\n\n**Answer:** A function...";

        assert_eq!(classify_content(content), Variant::QuestionsAndAnswers);
    }

    #[test]
    fn test_classify_content_answer_before_question_is_not_enough() {
        let content = "Answer: first\n\nQuestion: second";

        assert_eq!(classify_content(content), Variant::QuestionsOnly);
    }

    #[test]
    fn test_classify_content_emphasized_marker() {
        let content = "*Question*: why?\n\n__Answer__: because.";

        assert_eq!(classify_content(content), Variant::QuestionsAndAnswers);
    }

    #[test]
    fn test_classify_content_questions_only() {
        let content = "# Closures\n\n1. What is a closure?\n2. What is hoisting?";

        assert_eq!(classify_content(content), Variant::QuestionsOnly);
    }

    #[test]
    fn test_classify_prefers_name_over_content() {
        let content = "Question: x\nAnswer: y";

        assert_eq!(classify("questions", content), Variant::QuestionsOnly);
        assert_eq!(classify("notes", content), Variant::QuestionsAndAnswers);
    }

    #[test]
    fn test_strip_variant_suffix() {
        assert_eq!(strip_variant_suffix("closures_with_answers"), "closures");
        assert_eq!(strip_variant_suffix("closures"), "closures");
        assert_eq!(strip_variant_suffix("Event-Loop-QA"), "Event-Loop");
    }

    #[test]
    fn test_strip_variant_suffix_repeated() {
        assert_eq!(strip_variant_suffix("closures_questions_with_answers"), "closures");
    }

    #[test]
    fn test_strip_variant_suffix_marker_only_name() {
        assert_eq!(strip_variant_suffix("questions"), "questions");
        assert_eq!(strip_variant_suffix("questions_with_answers"), "questions");
    }
}
