//! Browser states and the errors surfaced to the user.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use montage_core::types::RootKind;

/// A fetch failure, held as browser state rather than propagated.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BrowserError {
    /// The top-level listing failed; the tree is empty.
    #[error("Failed to load {kind} folders: {message}")]
    RootLoad {
        /// Namespace whose root failed.
        kind: RootKind,
        /// Underlying failure.
        message: String,
    },
    /// One folder's children failed to load; the tree is unchanged.
    #[error("Failed to load subfolders for {folder}: {message}")]
    Expansion {
        /// Full path of the folder.
        path: String,
        /// Last path segment of the folder.
        folder: String,
        /// Underlying failure.
        message: String,
    },
}

impl BrowserError {
    /// Whether this error blocks the whole tree.
    pub fn is_root_load(&self) -> bool {
        matches!(self, Self::RootLoad { .. })
    }
}

/// Observable state of a browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "detail")]
pub enum BrowserState {
    /// Not started.
    Idle,
    /// Fetching the top level.
    LoadingRoot,
    /// Tree available, nothing in flight.
    Ready,
    /// Fetching the children of one folder.
    ExpandingNode(String),
    /// The last operation failed.
    Error(BrowserError),
}

impl BrowserState {
    /// Whether a fetch is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::LoadingRoot | Self::ExpandingNode(_))
    }
}
