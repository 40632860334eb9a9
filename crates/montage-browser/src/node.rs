//! Folder tree node.

use serde::{Deserialize, Serialize};

use montage_core::types::folder_path::{join_path, leaf_name};

/// A node in the lazily materialized folder hierarchy.
///
/// `children` stays empty until the node has been expanded once; `loaded`
/// tells an empty-but-fetched folder apart from one never fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    name: String,
    path: String,
    parent_path: String,
    is_expanded: bool,
    loaded: bool,
    children: Vec<FolderNode>,
}

impl FolderNode {
    /// Build a collapsed, unloaded node for `path` under `parent_path`.
    ///
    /// Returns `None` when `path` is not a direct child of `parent_path`.
    pub fn new(parent_path: &str, path: &str) -> Option<Self> {
        let name = leaf_name(path);
        if name.is_empty() || join_path(parent_path, name) != path {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            path: path.to_string(),
            parent_path: parent_path.to_string(),
            is_expanded: false,
            loaded: false,
            children: Vec::new(),
        })
    }

    /// Display label: the last path segment.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path from the namespace root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path of the parent, empty for top-level nodes.
    pub fn parent_path(&self) -> &str {
        &self.parent_path
    }

    /// Whether the children are shown.
    pub fn is_expanded(&self) -> bool {
        self.is_expanded
    }

    /// Whether a fetch for this node has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Fetched children, in listing order.
    pub fn children(&self) -> &[FolderNode] {
        &self.children
    }

    /// Whether `path` lies strictly below this node.
    pub(crate) fn is_ancestor_of(&self, path: &str) -> bool {
        path.len() > self.path.len()
            && path.starts_with(&self.path)
            && path.as_bytes()[self.path.len()] == b'/'
    }

    pub(crate) fn with_children(&self, children: Vec<FolderNode>) -> Self {
        Self {
            children,
            is_expanded: true,
            loaded: true,
            ..self.clone()
        }
    }

    pub(crate) fn with_expanded(&self, is_expanded: bool) -> Self {
        Self {
            is_expanded,
            ..self.clone()
        }
    }

    pub(crate) fn replace_children(&self, children: Vec<FolderNode>) -> Self {
        Self {
            children,
            ..self.clone()
        }
    }
}
