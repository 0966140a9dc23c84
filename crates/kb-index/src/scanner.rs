//! Document scanner.
//!
//! Walks a [`ContentSource`] depth-first and produces a flat listing of
//! categories and topics. Recursion order does not matter: the tree builder
//! re-sorts every sibling group.
//!
//! Classification rules:
//! - a directory containing a subdirectory is a category; document files placed
//!   directly inside it become standalone topics, paired by their
//!   variant-stripped base name (`03_closures.md` + `03_closures_with_answers.md`)
//! - a directory containing only document files is a topic whose files are the
//!   variants
//! - the root is always a category
//!
//! Every per-entry failure is recorded in [`ScanReport::diagnostics`] and the
//! entry is skipped. Only an unreadable root fails the scan.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use kb_source::{ContentSource, SourceEntry, join_path};

use crate::error::{self, IndexError};
use crate::markdown;
use crate::options::IndexOptions;
use crate::order::{OrderedName, split_prefix};
use crate::variant::{self, Variant, Variants};

/// Role of a scanned entry in the navigation tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryRole {
    /// Groups other entries.
    Category,
    /// Leaf with document variants.
    Topic,
}

/// One category or topic found by the scanner.
#[derive(Clone, Debug)]
pub struct ScanEntry {
    /// Raw path relative to the content root. For topics formed from loose
    /// files this is the path of their first file.
    pub relative_path: String,
    /// Raw path of the enclosing directory (`""` for the root).
    pub parent_path: String,
    /// Nesting level; children of the root are at depth 1.
    pub depth: usize,
    /// True if the entry is backed by a directory.
    pub is_directory: bool,
    /// Decoded name.
    pub name: OrderedName,
    /// Category or topic.
    pub role: EntryRole,
    /// Documents per variant (empty for categories).
    pub variants: Variants,
    /// First-level heading used as the title, if any document has one.
    pub heading: Option<String>,
}

/// Result of a scan: entries plus recovered errors.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Categories and topics in discovery order.
    pub entries: Vec<ScanEntry>,
    /// Recovered per-entry errors.
    pub diagnostics: Vec<IndexError>,
}

impl ScanReport {
    fn skip(&mut self, err: IndexError) {
        error::record(&mut self.diagnostics, err);
    }
}

/// A document file: raw name and stem.
struct DocFile {
    name: String,
    stem: String,
}

/// Recursive scanner over a content source.
pub struct DocumentScanner<'a> {
    source: &'a dyn ContentSource,
    options: &'a IndexOptions,
}

impl<'a> DocumentScanner<'a> {
    /// Create a scanner.
    #[must_use]
    pub fn new(source: &'a dyn ContentSource, options: &'a IndexOptions) -> Self {
        Self { source, options }
    }

    /// Scan the whole content root.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::RootUnreadable`] if the root cannot be listed.
    pub fn scan(&self) -> Result<ScanReport, IndexError> {
        let entries = self
            .source
            .list_entries("")
            .map_err(IndexError::RootUnreadable)?;

        let mut report = ScanReport::default();
        self.scan_category("", 0, entries, &mut report);
        Ok(report)
    }

    fn scan_category(
        &self,
        dir: &str,
        depth: usize,
        entries: Vec<SourceEntry>,
        report: &mut ScanReport,
    ) {
        let (mut dirs, files): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(SourceEntry::is_directory);
        dirs.sort_by(|a, b| a.name.cmp(&b.name));

        for entry in dirs {
            self.scan_directory(dir, &entry.name, depth + 1, report);
        }

        let docs = self.document_files(files);
        self.scan_loose_documents(dir, depth + 1, docs, report);
    }

    fn scan_directory(&self, parent: &str, name: &str, depth: usize, report: &mut ScanReport) {
        let path = join_path(parent, name);

        if depth > self.options.max_depth {
            report.skip(IndexError::DepthLimit {
                path,
                max_depth: self.options.max_depth,
            });
            return;
        }

        let ordered = match OrderedName::parse(name) {
            Ok(ordered) => ordered,
            Err(e) => {
                report.skip(IndexError::MalformedName {
                    parent: parent.to_owned(),
                    name: name.to_owned(),
                    reason: e.to_string(),
                });
                return;
            }
        };

        let entries = match self.source.list_entries(&path) {
            Ok(entries) => entries,
            Err(source) => {
                report.skip(IndexError::ScanIo { path, source });
                return;
            }
        };

        let has_subdirs = entries.iter().any(SourceEntry::is_directory);
        let docs = if has_subdirs {
            Vec::new()
        } else {
            self.document_files(entries.clone())
        };

        if has_subdirs || docs.is_empty() {
            report.entries.push(ScanEntry {
                relative_path: path.clone(),
                parent_path: parent.to_owned(),
                depth,
                is_directory: true,
                name: ordered,
                role: EntryRole::Category,
                variants: Variants::new(),
                heading: None,
            });
            self.scan_category(&path, depth, entries, report);
            return;
        }

        let (variants, heading) = self.collect_variants(&path, &path, &docs, report);
        report.entries.push(ScanEntry {
            relative_path: path,
            parent_path: parent.to_owned(),
            depth,
            is_directory: true,
            name: ordered,
            role: EntryRole::Topic,
            variants,
            heading,
        });
    }

    /// Turn document files placed directly in a category into topics.
    fn scan_loose_documents(
        &self,
        dir: &str,
        depth: usize,
        docs: Vec<DocFile>,
        report: &mut ScanReport,
    ) {
        let mut groups: Vec<(OrderedName, Vec<DocFile>)> = Vec::new();
        let mut by_slug: BTreeMap<String, usize> = BTreeMap::new();

        for doc in docs {
            let (order, base) = split_prefix(&doc.stem);
            let topic_base = variant::strip_variant_suffix(base);
            let ordered = match OrderedName::from_base(&doc.stem, order, topic_base) {
                Ok(ordered) => ordered,
                Err(e) => {
                    report.skip(IndexError::MalformedName {
                        parent: dir.to_owned(),
                        name: doc.name,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match by_slug.entry(ordered.slug.clone()) {
                Entry::Occupied(slot) => {
                    let (name, files) = &mut groups[*slot.get()];
                    name.order = name.order.min(ordered.order);
                    files.push(doc);
                }
                Entry::Vacant(slot) => {
                    slot.insert(groups.len());
                    groups.push((ordered, vec![doc]));
                }
            }
        }

        for (ordered, files) in groups {
            let topic_path = join_path(dir, &files[0].name);
            let (variants, heading) = self.collect_variants(dir, &topic_path, &files, report);
            report.entries.push(ScanEntry {
                relative_path: topic_path,
                parent_path: dir.to_owned(),
                depth,
                is_directory: false,
                name: ordered,
                role: EntryRole::Topic,
                variants,
                heading,
            });
        }
    }

    /// Read and classify the documents of one topic.
    ///
    /// Files are processed in name order, so the first file wins when two
    /// classify as the same variant.
    fn collect_variants(
        &self,
        dir: &str,
        topic: &str,
        files: &[DocFile],
        report: &mut ScanReport,
    ) -> (Variants, Option<String>) {
        let mut variants = Variants::new();
        let mut titles: BTreeMap<Variant, String> = BTreeMap::new();

        for file in files {
            let path = join_path(dir, &file.name);
            let content = match self.source.read_entry(&path) {
                Ok(content) => content,
                Err(source) => {
                    report.skip(IndexError::ScanIo { path, source });
                    continue;
                }
            };

            let (_, base) = split_prefix(&file.stem);
            let kind = variant::classify(base, &content);

            match variants.entry(kind) {
                Entry::Vacant(slot) => {
                    slot.insert(path);
                    if let Some(title) = markdown::first_title(&content) {
                        titles.insert(kind, title);
                    }
                }
                Entry::Occupied(_) => report.skip(IndexError::DuplicateVariant {
                    topic: topic.to_owned(),
                    variant: kind,
                    ignored: path,
                }),
            }
        }

        // BTreeMap order puts questionsOnly first.
        let heading = titles.into_values().next();
        (variants, heading)
    }

    /// Document files among `entries`, sorted by name.
    fn document_files(&self, entries: Vec<SourceEntry>) -> Vec<DocFile> {
        let mut docs: Vec<DocFile> = entries
            .into_iter()
            .filter(|e| !e.is_directory())
            .filter_map(|e| {
                let stem = self.options.document_stem(&e.name)?.to_owned();
                Some(DocFile { name: e.name, stem })
            })
            .collect();
        docs.sort_by(|a, b| a.name.cmp(&b.name));
        docs
    }
}

#[cfg(test)]
mod tests {
    use kb_source::MockSource;
    use pretty_assertions::assert_eq;

    use super::*;

    fn scan(source: &MockSource) -> ScanReport {
        let options = IndexOptions::default();
        DocumentScanner::new(source, &options).scan().unwrap()
    }

    fn find<'r>(report: &'r ScanReport, path: &str) -> &'r ScanEntry {
        report
            .entries
            .iter()
            .find(|e| e.relative_path == path)
            .unwrap_or_else(|| panic!("no entry {path}"))
    }

    #[test]
    fn test_category_and_topic_directories() {
        let source = MockSource::new()
            .with_file("01_javascript/01_fundamentals/questions.md", "# Fundamentals")
            .with_file(
                "01_javascript/01_fundamentals/questions_with_answers.md",
                "# Fundamentals QA",
            );

        let report = scan(&source);

        let category = find(&report, "01_javascript");
        assert_eq!(category.role, EntryRole::Category);
        assert_eq!(category.depth, 1);
        assert_eq!(category.parent_path, "");

        let topic = find(&report, "01_javascript/01_fundamentals");
        assert_eq!(topic.role, EntryRole::Topic);
        assert_eq!(topic.depth, 2);
        assert_eq!(topic.name.slug, "fundamentals");
        assert_eq!(
            topic.variants.get(&Variant::QuestionsOnly).map(String::as_str),
            Some("01_javascript/01_fundamentals/questions.md")
        );
        assert_eq!(
            topic.variants.get(&Variant::QuestionsAndAnswers).map(String::as_str),
            Some("01_javascript/01_fundamentals/questions_with_answers.md")
        );
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_heading_prefers_questions_only_file() {
        let source = MockSource::new()
            .with_file("01_go/answers.md", "# From Answers")
            .with_file("01_go/questions.md", "# From Questions");

        let report = scan(&source);

        assert_eq!(
            find(&report, "01_go").heading.as_deref(),
            Some("From Questions")
        );
    }

    #[test]
    fn test_heading_falls_back_to_answers_file() {
        let source = MockSource::new()
            .with_file("01_go/questions.md", "no heading")
            .with_file("01_go/answers.md", "# From Answers");

        let report = scan(&source);

        assert_eq!(
            find(&report, "01_go").heading.as_deref(),
            Some("From Answers")
        );
    }

    #[test]
    fn test_ambiguous_names_classified_by_content() {
        let source = MockSource::new()
            .with_file("01_go/notes.md", "Question: what?\n\nAnswer: this.")
            .with_file("01_go/list.md", "1. what?");

        let report = scan(&source);

        let topic = find(&report, "01_go");
        assert_eq!(topic.variants.len(), 2);
        assert_eq!(topic.variants[&Variant::QuestionsAndAnswers], "01_go/notes.md");
        assert_eq!(topic.variants[&Variant::QuestionsOnly], "01_go/list.md");
    }

    #[test]
    fn test_duplicate_variant_first_by_name_wins() {
        let source = MockSource::new()
            .with_file("01_go/b_questions.md", "b")
            .with_file("01_go/a_questions.md", "a");

        let report = scan(&source);

        let topic = find(&report, "01_go");
        assert_eq!(topic.variants[&Variant::QuestionsOnly], "01_go/a_questions.md");
        assert_eq!(report.diagnostics.len(), 1);
        assert!(matches!(
            &report.diagnostics[0],
            IndexError::DuplicateVariant { ignored, .. } if ignored == "01_go/b_questions.md"
        ));
    }

    #[test]
    fn test_loose_files_in_category_paired_into_topics() {
        let source = MockSource::new()
            .with_file("01_js/03_closures_with_answers.md", "Question: a\nAnswer: b")
            .with_file("01_js/03_closures.md", "# Closures")
            .with_file("01_js/01_basics/questions.md", "x");

        let report = scan(&source);

        let topic = find(&report, "01_js/03_closures.md");
        assert!(!topic.is_directory);
        assert_eq!(topic.depth, 2);
        assert_eq!(topic.name.slug, "closures");
        assert_eq!(topic.name.order, 3);
        assert_eq!(topic.variants.len(), 2);
        assert_eq!(topic.heading.as_deref(), Some("Closures"));
    }

    #[test]
    fn test_loose_qa_suffix_paired_without_markers() {
        let source = MockSource::new()
            .with_file("01_js/03_closures.md", "# Closures")
            .with_file("01_js/03_closures_qa.md", "# Closures\n\nA closure captures...")
            .with_file("01_js/01_basics/questions.md", "x");

        let report = scan(&source);

        let topic = find(&report, "01_js/03_closures.md");
        assert_eq!(
            topic.variants.get(&Variant::QuestionsAndAnswers).map(String::as_str),
            Some("01_js/03_closures_qa.md")
        );
        assert_eq!(
            topic.variants.get(&Variant::QuestionsOnly).map(String::as_str),
            Some("01_js/03_closures.md")
        );
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_root_files_become_topics() {
        let source = MockSource::new().with_file("intro.md", "# Intro");

        let report = scan(&source);

        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].role, EntryRole::Topic);
        assert_eq!(report.entries[0].name.slug, "intro");
    }

    #[test]
    fn test_non_document_files_ignored() {
        let source = MockSource::new()
            .with_file("01_go/questions.md", "x")
            .with_file("01_go/diagram.png", "binary");

        let report = scan(&source);

        assert_eq!(find(&report, "01_go").variants.len(), 1);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_directory_without_documents_is_empty_category() {
        let source = MockSource::new().with_dir("01_empty");

        let report = scan(&source);

        let entry = find(&report, "01_empty");
        assert_eq!(entry.role, EntryRole::Category);
    }

    #[test]
    fn test_malformed_directory_skipped_with_subtree() {
        let source = MockSource::new()
            .with_file("01_c++/01_basics/questions.md", "x")
            .with_file("02_go/questions.md", "y");

        let report = scan(&source);

        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].relative_path, "02_go");
        assert!(matches!(
            &report.diagnostics[0],
            IndexError::MalformedName { name, .. } if name == "01_c++"
        ));
    }

    #[test]
    fn test_unreadable_directory_skipped() {
        let source = MockSource::new()
            .with_file("01_go/questions.md", "x")
            .with_file("02_rust/questions.md", "y")
            .with_unreadable("02_rust");

        let report = scan(&source);

        assert_eq!(report.entries.len(), 1);
        assert!(matches!(
            &report.diagnostics[0],
            IndexError::ScanIo { path, .. } if path == "02_rust"
        ));
    }

    #[test]
    fn test_unreadable_file_excluded_from_variants() {
        let source = MockSource::new()
            .with_file("01_go/questions.md", "x")
            .with_file("01_go/answers.md", "y")
            .with_unreadable("01_go/answers.md");

        let report = scan(&source);

        let topic = find(&report, "01_go");
        assert_eq!(topic.variants.len(), 1);
        assert!(topic.variants.contains_key(&Variant::QuestionsOnly));
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn test_unreadable_root_is_fatal() {
        let source = MockSource::new().with_unreadable("");
        let options = IndexOptions::default();

        let result = DocumentScanner::new(&source, &options).scan();

        assert!(matches!(result, Err(IndexError::RootUnreadable(_))));
    }

    #[test]
    fn test_depth_limit() {
        let source = MockSource::new().with_file("a/b/c/questions.md", "x");
        let options = IndexOptions {
            max_depth: 2,
            ..IndexOptions::default()
        };

        let report = DocumentScanner::new(&source, &options).scan().unwrap();

        let paths: Vec<_> = report.entries.iter().map(|e| e.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["a", "a/b"]);
        assert!(matches!(
            &report.diagnostics[0],
            IndexError::DepthLimit { path, max_depth: 2 } if path == "a/b/c"
        ));
    }
}
