//! Copy-on-write folder tree.
//!
//! Updates never mutate in place: they rebuild the nodes on the path from
//! the root to the target and clone the untouched siblings. A failed update
//! returns `None` and leaves the original tree as it was.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::node::FolderNode;

/// The folder hierarchy of one root namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderTree {
    roots: Vec<FolderNode>,
}

impl FolderTree {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a top-level listing.
    pub fn from_listing(paths: &[String]) -> Self {
        Self {
            roots: nodes_from_listing("", paths),
        }
    }

    /// Top-level nodes in listing order.
    pub fn roots(&self) -> &[FolderNode] {
        &self.roots
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of materialized nodes.
    pub fn len(&self) -> usize {
        fn count(nodes: &[FolderNode]) -> usize {
            nodes.iter().map(|n| 1 + count(n.children())).sum()
        }
        count(&self.roots)
    }

    /// Find the node at `path`.
    pub fn find(&self, path: &str) -> Option<&FolderNode> {
        let mut level = self.roots.as_slice();
        loop {
            let mut next = None;
            for node in level {
                if node.path() == path {
                    return Some(node);
                }
                if node.is_ancestor_of(path) {
                    next = Some(node.children());
                    break;
                }
            }
            level = next?;
        }
    }

    /// A new tree with `children` grafted onto the node at `path`, which
    /// becomes expanded and loaded.
    pub fn with_children(&self, path: &str, children: Vec<FolderNode>) -> Option<Self> {
        self.rebuild(path, |node| node.with_children(children.clone()))
    }

    /// A new tree with the node at `path` expanded or collapsed. Children
    /// are kept either way.
    pub fn with_expanded(&self, path: &str, is_expanded: bool) -> Option<Self> {
        self.rebuild(path, |node| node.with_expanded(is_expanded))
    }

    /// Paths of every materialized node, depth first.
    pub fn paths(&self) -> Vec<String> {
        fn walk(nodes: &[FolderNode], out: &mut Vec<String>) {
            for node in nodes {
                out.push(node.path().to_string());
                walk(node.children(), out);
            }
        }
        let mut out = Vec::new();
        walk(&self.roots, &mut out);
        out
    }

    /// Visible nodes with their depth, in display order.
    pub fn visible(&self) -> Vec<(usize, &FolderNode)> {
        fn walk<'a>(nodes: &'a [FolderNode], depth: usize, out: &mut Vec<(usize, &'a FolderNode)>) {
            for node in nodes {
                out.push((depth, node));
                if node.is_expanded() {
                    walk(node.children(), depth + 1, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.roots, 0, &mut out);
        out
    }

    fn rebuild<F>(&self, path: &str, update: F) -> Option<Self>
    where
        F: Fn(&FolderNode) -> FolderNode,
    {
        rebuild_level(&self.roots, path, &update).map(|roots| Self { roots })
    }
}

fn rebuild_level<F>(nodes: &[FolderNode], path: &str, update: &F) -> Option<Vec<FolderNode>>
where
    F: Fn(&FolderNode) -> FolderNode,
{
    for (idx, node) in nodes.iter().enumerate() {
        let replacement = if node.path() == path {
            update(node)
        } else if node.is_ancestor_of(path) {
            let children = rebuild_level(node.children(), path, update)?;
            node.replace_children(children)
        } else {
            continue;
        };

        let mut rebuilt = nodes.to_vec();
        rebuilt[idx] = replacement;
        return Some(rebuilt);
    }
    None
}

/// Turn a listing of child paths into nodes under `parent`.
///
/// Order is preserved. Duplicate paths keep their first occurrence and
/// paths that are not direct children of `parent` are dropped.
pub fn nodes_from_listing(parent: &str, paths: &[String]) -> Vec<FolderNode> {
    let mut seen = HashSet::new();
    let mut nodes = Vec::with_capacity(paths.len());

    for path in paths {
        if !seen.insert(path.as_str()) {
            warn!(parent, path = %path, "Dropping duplicate folder from listing");
            continue;
        }
        match FolderNode::new(parent, path) {
            Some(node) => nodes.push(node),
            None => warn!(parent, path = %path, "Dropping folder outside of listed parent"),
        }
    }

    nodes
}
