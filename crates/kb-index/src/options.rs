/// Options controlling how a content root is indexed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexOptions {
    /// File extensions (without dot, case-insensitive) treated as documents.
    pub extensions: Vec<String>,
    /// Deepest directory level scanned below the root (root children are level 1).
    pub max_depth: usize,
    /// Title of the root node.
    pub root_title: String,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_owned(), "markdown".to_owned()],
            max_depth: 8,
            root_title: "Home".to_owned(),
        }
    }
}

impl IndexOptions {
    /// File stem of `name` if it has one of the document extensions.
    #[must_use]
    pub fn document_stem<'a>(&self, name: &'a str) -> Option<&'a str> {
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        self.extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
            .then_some(stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = IndexOptions::default();

        assert_eq!(options.max_depth, 8);
        assert_eq!(options.root_title, "Home");
    }

    #[test]
    fn test_document_stem_case_insensitive() {
        let options = IndexOptions::default();

        assert_eq!(options.document_stem("questions.md"), Some("questions"));
        assert_eq!(options.document_stem("Notes.MARKDOWN"), Some("Notes"));
        assert_eq!(options.document_stem("diagram.png"), None);
        assert_eq!(options.document_stem("Makefile"), None);
    }

    #[test]
    fn test_document_stem_keeps_inner_dots() {
        let options = IndexOptions {
            extensions: vec!["md".to_owned()],
            ..IndexOptions::default()
        };

        assert_eq!(options.document_stem("01_intro.md"), Some("01_intro"));
        assert_eq!(options.document_stem("archive.tar.md"), Some("archive.tar"));
        assert_eq!(options.document_stem(".md"), None);
    }
}
