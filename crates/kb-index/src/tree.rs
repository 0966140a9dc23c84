//! Navigation tree.
//!
//! [`NavigationTreeBuilder`] turns a [`ScanReport`] into a [`NavigationIndex`].
//!
//! # Architecture
//!
//! Nodes are stored in a flat `Vec<Node>` with parent/children relationships
//! tracked by indices, the root at index [`ROOT`]. This provides:
//! - O(1) route lookups via a `route -> index` `HashMap`
//! - O(d) breadcrumb building where d is the node depth
//!
//! The nested [`NavigationNode`] tree consumed by the presentation layer is
//! materialized once per build and shared behind an `Arc`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;

use crate::error::{self, IndexError};
use crate::scanner::{EntryRole, ScanEntry, ScanReport};
use crate::variant::{Variant, Variants};

/// Index of the root node.
pub const ROOT: usize = 0;

/// Kind of navigation node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// Has children, no content.
    Category,
    /// Leaf with content variants.
    Topic,
}

/// A node of the navigation arena.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Node {
    /// URL-safe identifier, unique among siblings (`""` for the root).
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Sibling order key.
    pub order: u64,
    /// Category or topic.
    pub kind: NodeKind,
    /// Slug sequence from the root to this node.
    pub path: Vec<String>,
    /// Storage location per available variant (topics only).
    #[serde(skip_serializing_if = "Variants::is_empty")]
    pub variants: Variants,
}

impl Node {
    /// Route of the node: slugs joined by `/` (`""` for the root).
    #[must_use]
    pub fn route(&self) -> String {
        self.path.join("/")
    }

    /// True for topics.
    #[must_use]
    pub fn is_topic(&self) -> bool {
        self.kind == NodeKind::Topic
    }

    /// Available variants in display order.
    #[must_use]
    pub fn variant_list(&self) -> Vec<Variant> {
        self.variants.keys().copied().collect()
    }
}

/// Nested navigation tree for sidebars.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavigationNode {
    /// URL-safe identifier (`""` for the root).
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Sibling order key.
    pub order: u64,
    /// Category or topic.
    pub kind: NodeKind,
    /// Slug sequence from the root.
    pub path: Vec<String>,
    /// Storage location per available variant (topics only).
    #[serde(skip_serializing_if = "Variants::is_empty")]
    pub variants: Variants,
    /// Ordered children (categories only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavigationNode>,
}

impl NavigationNode {
    /// Child with the given slug.
    #[must_use]
    pub fn child(&self, slug: &str) -> Option<&NavigationNode> {
        self.children.iter().find(|c| c.slug == slug)
    }
}

/// One published build of the navigation tree.
///
/// Immutable once built. A rebuild produces a new instance with a higher
/// generation; readers holding an `Arc` to an older one keep a consistent view.
pub struct NavigationIndex {
    nodes: Vec<Node>,
    children: Vec<Vec<usize>>,
    parents: Vec<Option<usize>>,
    path_index: HashMap<String, usize>,
    tree: Arc<NavigationNode>,
    diagnostics: Vec<IndexError>,
    generation: u64,
}

impl NavigationIndex {
    /// Root of the nested tree.
    #[must_use]
    pub fn root(&self) -> &Arc<NavigationNode> {
        &self.tree
    }

    /// Build generation, increasing with every rebuild.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Errors recovered while building.
    #[must_use]
    pub fn diagnostics(&self) -> &[IndexError] {
        &self.diagnostics
    }

    /// Number of nodes including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the index holds only the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Node at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    #[must_use]
    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    /// Index of the node with the given route.
    #[must_use]
    pub fn lookup(&self, route: &str) -> Option<usize> {
        self.path_index.get(route).copied()
    }

    /// Node with the given route.
    #[must_use]
    pub fn get(&self, route: &str) -> Option<&Node> {
        self.lookup(route).map(|i| &self.nodes[i])
    }

    /// Parent index (`None` for the root).
    #[must_use]
    pub fn parent(&self, idx: usize) -> Option<usize> {
        self.parents[idx]
    }

    /// Ordered children of a node.
    #[must_use]
    pub fn children(&self, idx: usize) -> Vec<&Node> {
        self.children[idx].iter().map(|&c| &self.nodes[c]).collect()
    }

    /// Ancestors from the root to the node itself, inclusive.
    ///
    /// For a node at depth d the result has d+1 elements.
    #[must_use]
    pub fn breadcrumb(&self, idx: usize) -> Vec<&Node> {
        let mut chain = Vec::new();
        let mut current = Some(idx);
        while let Some(i) = current {
            chain.push(&self.nodes[i]);
            current = self.parents[i];
        }
        chain.reverse();
        chain
    }

    /// Other children of the node's parent, in order.
    #[must_use]
    pub fn siblings(&self, idx: usize) -> Vec<&Node> {
        let Some(parent) = self.parents[idx] else {
            return Vec::new();
        };
        self.children[parent]
            .iter()
            .filter(|&&c| c != idx)
            .map(|&c| &self.nodes[c])
            .collect()
    }

    /// Nearest sibling topics before and after the node.
    #[must_use]
    pub fn adjacent_topics(&self, idx: usize) -> (Option<&Node>, Option<&Node>) {
        let Some(parent) = self.parents[idx] else {
            return (None, None);
        };
        let siblings = &self.children[parent];
        let Some(pos) = siblings.iter().position(|&c| c == idx) else {
            return (None, None);
        };

        let previous = siblings[..pos]
            .iter()
            .rev()
            .map(|&c| &self.nodes[c])
            .find(|n| n.is_topic());
        let next = siblings[pos + 1..]
            .iter()
            .map(|&c| &self.nodes[c])
            .find(|n| n.is_topic());

        (previous, next)
    }

    /// All topics in depth-first order.
    pub fn topics(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_topic())
    }
}

impl std::fmt::Debug for NavigationIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationIndex")
            .field("nodes", &self.nodes.len())
            .field("diagnostics", &self.diagnostics.len())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// A surviving scan entry with its final slug.
struct Draft<'s> {
    entry: &'s ScanEntry,
    slug: String,
    children: Vec<Draft<'s>>,
}

/// Builds a [`NavigationIndex`] from scanner output.
pub struct NavigationTreeBuilder {
    root_title: String,
}

impl NavigationTreeBuilder {
    /// Create a builder whose root node carries `root_title`.
    #[must_use]
    pub fn new(root_title: impl Into<String>) -> Self {
        Self {
            root_title: root_title.into(),
        }
    }

    /// Assemble the tree.
    ///
    /// Entries are grouped by parent and built post-order, so empty categories
    /// are pruned bottom-up. Each sibling group is deduplicated and sorted by
    /// `(order, slug)`.
    #[must_use]
    pub fn build(&self, report: ScanReport, generation: u64) -> NavigationIndex {
        let ScanReport {
            entries,
            mut diagnostics,
        } = report;

        let mut groups: HashMap<&str, Vec<&ScanEntry>> = HashMap::new();
        for entry in &entries {
            groups
                .entry(entry.parent_path.as_str())
                .or_default()
                .push(entry);
        }

        let drafts = draft_children("", &groups, &mut diagnostics);

        let mut arena = Arena::new(&self.root_title);
        for draft in drafts {
            arena.insert(draft, ROOT);
        }

        let tree = Arc::new(arena.materialize(ROOT));
        let index = NavigationIndex {
            nodes: arena.nodes,
            children: arena.children,
            parents: arena.parents,
            path_index: arena.path_index,
            tree,
            diagnostics,
            generation,
        };

        tracing::debug!(
            nodes = index.nodes.len(),
            diagnostics = index.diagnostics.len(),
            generation,
            "Built navigation tree"
        );

        index
    }
}

fn draft_children<'s>(
    parent: &str,
    groups: &HashMap<&str, Vec<&'s ScanEntry>>,
    diagnostics: &mut Vec<IndexError>,
) -> Vec<Draft<'s>> {
    let Some(entries) = groups.get(parent) else {
        return Vec::new();
    };

    let mut drafts = Vec::with_capacity(entries.len());
    for &entry in entries {
        let children = match entry.role {
            EntryRole::Category => {
                let children = draft_children(&entry.relative_path, groups, diagnostics);
                if children.is_empty() {
                    error::record(
                        diagnostics,
                        IndexError::EmptyCategory {
                            path: entry.relative_path.clone(),
                        },
                    );
                    continue;
                }
                children
            }
            EntryRole::Topic => {
                if entry.variants.is_empty() {
                    error::record(
                        diagnostics,
                        IndexError::EmptyTopic {
                            path: entry.relative_path.clone(),
                        },
                    );
                    continue;
                }
                Vec::new()
            }
        };
        drafts.push(Draft {
            entry,
            slug: entry.name.slug.clone(),
            children,
        });
    }

    disambiguate(parent, &mut drafts, diagnostics);
    drafts
}

/// Give every sibling a unique slug and sort by `(order, slug)`.
///
/// Holders are ranked by `(order, slug, raw name)`; the first keeps the slug,
/// later ones get the lowest free `-N` suffix starting at 2.
fn disambiguate(parent: &str, drafts: &mut [Draft<'_>], diagnostics: &mut Vec<IndexError>) {
    drafts.sort_by(|a, b| {
        a.entry
            .name
            .cmp_position(&b.entry.name)
            .then_with(|| a.entry.name.raw.cmp(&b.entry.name.raw))
            .then_with(|| a.entry.relative_path.cmp(&b.entry.relative_path))
    });

    let taken: HashSet<String> = drafts.iter().map(|d| d.slug.clone()).collect();
    let mut used: HashSet<String> = HashSet::with_capacity(drafts.len());

    for draft in drafts.iter_mut() {
        if used.insert(draft.slug.clone()) {
            continue;
        }

        let mut n = 2;
        let renamed = loop {
            let candidate = format!("{}-{n}", draft.slug);
            if !taken.contains(&candidate) && !used.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };

        error::record(
            diagnostics,
            IndexError::DuplicateSlug {
                parent: parent.to_owned(),
                slug: draft.slug.clone(),
                name: draft.entry.name.raw.clone(),
                renamed: renamed.clone(),
            },
        );
        used.insert(renamed.clone());
        draft.slug = renamed;
    }

    drafts.sort_by(|a, b| {
        a.entry
            .name
            .order
            .cmp(&b.entry.name.order)
            .then_with(|| a.slug.cmp(&b.slug))
    });
}

/// Flat storage filled in pre-order.
struct Arena {
    nodes: Vec<Node>,
    children: Vec<Vec<usize>>,
    parents: Vec<Option<usize>>,
    path_index: HashMap<String, usize>,
}

impl Arena {
    fn new(root_title: &str) -> Self {
        let root = Node {
            slug: String::new(),
            title: root_title.to_owned(),
            order: 0,
            kind: NodeKind::Category,
            path: Vec::new(),
            variants: Variants::new(),
        };
        Self {
            nodes: vec![root],
            children: vec![Vec::new()],
            parents: vec![None],
            path_index: HashMap::from([(String::new(), ROOT)]),
        }
    }

    fn insert(&mut self, draft: Draft<'_>, parent: usize) {
        let entry = draft.entry;
        let mut path = self.nodes[parent].path.clone();
        path.push(draft.slug.clone());

        let (kind, title) = match entry.role {
            EntryRole::Category => (NodeKind::Category, entry.name.title.clone()),
            EntryRole::Topic => (
                NodeKind::Topic,
                entry
                    .heading
                    .clone()
                    .unwrap_or_else(|| entry.name.title.clone()),
            ),
        };

        let idx = self.nodes.len();
        self.path_index.insert(path.join("/"), idx);
        self.nodes.push(Node {
            slug: draft.slug,
            title,
            order: entry.name.order,
            kind,
            path,
            variants: entry.variants.clone(),
        });
        self.children.push(Vec::new());
        self.parents.push(Some(parent));
        self.children[parent].push(idx);

        for child in draft.children {
            self.insert(child, idx);
        }
    }

    fn materialize(&self, idx: usize) -> NavigationNode {
        let node = &self.nodes[idx];
        NavigationNode {
            slug: node.slug.clone(),
            title: node.title.clone(),
            order: node.order,
            kind: node.kind,
            path: node.path.clone(),
            variants: node.variants.clone(),
            children: self.children[idx]
                .iter()
                .map(|&c| self.materialize(c))
                .collect(),
        }
    }
}
