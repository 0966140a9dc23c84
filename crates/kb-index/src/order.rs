//! Ordering-prefix codec.
//!
//! Raw directory and file names optionally start with `<digits><separator>`
//! (`07_go`, `2-basics`). The codec splits such a name into a typed integer
//! order key, a URL-safe slug, and a display title:
//!
//! ```ignore
//! let name = OrderedName::parse("02_components_props")?;
//! assert_eq!(name.order, 2);
//! assert_eq!(name.slug, "components-props");
//! assert_eq!(name.title, "Components Props");
//! ```

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

/// Order key of names without a numeric prefix. Sorts after every prefix.
pub const UNORDERED: u64 = u64::MAX;

/// Order key used when a numeric prefix does not fit in `u64`.
const SATURATED: u64 = u64::MAX - 1;

static PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)[_-](.+)$").unwrap());

/// Reason a name could not be decoded into a slug.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// Nothing left after stripping the prefix and normalizing.
    #[error("empty name")]
    Empty,
    /// Character outside `[a-z0-9-]` after normalization.
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A raw name decoded into order key, slug and title.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderedName {
    /// Raw name as stored (file stem for documents).
    pub raw: String,
    /// Integer order key from the numeric prefix, or [`UNORDERED`].
    pub order: u64,
    /// URL-safe identifier matching `^[a-z0-9-]+$`.
    pub slug: String,
    /// Human-readable label derived from the base name.
    pub title: String,
}

impl OrderedName {
    /// Decode a raw name.
    ///
    /// # Errors
    ///
    /// Returns [`NameError`] if the base name does not normalize to a valid slug.
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        let (order, base) = split_prefix(raw);
        Self::from_base(raw, order, base)
    }

    /// Build from an already split prefix, with `base` standing in for the
    /// remainder of the raw name.
    ///
    /// Used when a base name is rewritten before slugging, e.g. to strip a
    /// variant suffix from a document stem.
    ///
    /// # Errors
    ///
    /// Returns [`NameError`] if `base` does not normalize to a valid slug.
    pub fn from_base(raw: &str, order: u64, base: &str) -> Result<Self, NameError> {
        Ok(Self {
            raw: raw.to_owned(),
            order,
            slug: slugify(base)?,
            title: titlecase(base),
        })
    }

    /// Total sibling order: `(order, slug)`.
    #[must_use]
    pub fn cmp_position(&self, other: &Self) -> Ordering {
        self.order
            .cmp(&other.order)
            .then_with(|| self.slug.cmp(&other.slug))
    }
}

/// Split a raw name into its order key and base name.
///
/// Names without a prefix keep their full text as base and get [`UNORDERED`].
#[must_use]
pub fn split_prefix(raw: &str) -> (u64, &str) {
    match PREFIX_RE.captures(raw) {
        Some(caps) => {
            let digits = caps.get(1).map_or("", |m| m.as_str());
            let base = caps.get(2).map_or(raw, |m| m.as_str());
            (digits.parse().unwrap_or(SATURATED), base)
        }
        None => (UNORDERED, raw),
    }
}

/// Normalize a base name to a slug.
///
/// Lowercases, maps `_` and spaces to `-`, then validates `^[a-z0-9-]+$`.
///
/// # Errors
///
/// Returns [`NameError`] on an empty result or a disallowed character.
pub fn slugify(base: &str) -> Result<String, NameError> {
    let slug: String = base
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == '_' || c == ' ' { '-' } else { c })
        .collect();

    if slug.is_empty() {
        return Err(NameError::Empty);
    }
    if let Some(bad) = slug
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(NameError::InvalidCharacter(bad));
    }

    Ok(slug)
}

/// Convert a base name to title case.
///
/// Replaces `-` and `_` with spaces, then capitalizes the first letter of each word.
#[must_use]
pub fn titlecase(base: &str) -> String {
    let mut result = String::with_capacity(base.len());
    for word in base.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        capitalize_first_into(word, &mut result);
    }
    result
}

fn capitalize_first_into(word: &str, buf: &mut String) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        buf.extend(first.to_uppercase());
        buf.push_str(chars.as_str());
    }
}
