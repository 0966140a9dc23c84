//! Heading extraction.
//!
//! The engine does not interpret markdown beyond headings: the first H1 is a
//! title fallback and H2s are exposed as sub-topic anchors. Parsing goes
//! through `pulldown-cmark` so `#` lines inside code fences are ignored.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

/// Headings of one document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outline {
    /// Text of the first level-1 heading.
    pub title: Option<String>,
    /// Text of every level-2 heading, in document order.
    pub sections: Vec<String>,
}

/// Extract the first H1 and all H2 headings.
#[must_use]
pub fn outline(markdown: &str) -> Outline {
    let mut result = Outline::default();
    let mut current: Option<(HeadingLevel, String)> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading { level, .. })
                if level == HeadingLevel::H1 || level == HeadingLevel::H2 =>
            {
                current = Some((level, String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = current.take() {
                    let text = text.trim().to_owned();
                    if text.is_empty() {
                        continue;
                    }
                    if level == HeadingLevel::H1 {
                        result.title.get_or_insert(text);
                    } else {
                        result.sections.push(text);
                    }
                }
            }
            _ => {}
        }
    }

    result
}

/// Text of the first level-1 heading.
#[must_use]
pub fn first_title(markdown: &str) -> Option<String> {
    outline(markdown).title
}
