//! Content indexing and navigation resolution.
//!
//! Walks a nested tree of question/answer documents, derives a stable order
//! and an addressable route for every topic, and resolves routes back to
//! document content with breadcrumb and sibling context.
//!
//! # Pipeline
//!
//! ```text
//! ContentSource -> DocumentScanner -> NavigationTreeBuilder -> IndexCache
//!                                                                  |
//!                                         ContentResolver <--------+
//! ```
//!
//! - [`order`]: `NN_name` prefix codec (order key, slug, title)
//! - [`DocumentScanner`]: classifies directories as categories or topics and
//!   detects the questions-only / questions-and-answers variants
//! - [`NavigationTreeBuilder`]: sorts, deduplicates and prunes into a
//!   [`NavigationIndex`]
//! - [`ContentResolver`]: route + variant to [`ResolvedContent`]
//! - [`IndexCache`]: single-flight memoization with optional invalidation
//! - [`KnowledgeBase`]: the facade used by servers and the CLI
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use kb_index::{CacheMode, IndexOptions, KnowledgeBase};
//! use kb_source::FsSource;
//!
//! let source = Arc::new(FsSource::new(PathBuf::from("content")));
//! let kb = KnowledgeBase::new(source, IndexOptions::default(), CacheMode::Static);
//!
//! let root = kb.navigation()?;
//! println!("{} top-level entries", root.children.len());
//!
//! let page = kb.resolve_content(&["javascript", "fundamentals"], None)?;
//! println!("{}", page.content);
//! # Ok(())
//! # }
//! ```

mod error;
mod index_cache;
mod knowledge_base;
mod markdown;
mod options;
pub mod order;
mod resolver;
mod scanner;
mod tree;
mod variant;

pub use error::IndexError;
pub use index_cache::{CacheMode, IndexCache};
pub use knowledge_base::KnowledgeBase;
pub use markdown::{Outline, outline};
pub use options::IndexOptions;
pub use order::{OrderedName, UNORDERED};
pub use resolver::{ContentResolver, ResolvedContent, route_key};
pub use scanner::{DocumentScanner, EntryRole, ScanEntry, ScanReport};
pub use tree::{NavigationIndex, NavigationNode, NavigationTreeBuilder, Node, NodeKind, ROOT};
pub use variant::{Variant, Variants, classify, classify_content, classify_name};
