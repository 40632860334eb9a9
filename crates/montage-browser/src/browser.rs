//! The folder browser state machine.
//!
//! `FolderBrowser` owns the tree for one root namespace and is its only
//! mutator. Fetches are described by [`FetchRequest`]s: the browser hands
//! one out, the caller runs it (see [`FolderBrowser::fetch`]) and feeds the
//! result back through [`FolderBrowser::complete`]. At most one request is
//! outstanding; further expansions wait in a FIFO queue.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, warn};

use montage_core::result::AppResult;
use montage_core::traits::listing::ListingService;
use montage_core::types::RootKind;
use montage_core::types::folder_path::leaf_name;

use crate::node::FolderNode;
use crate::selection::SelectionConsumer;
use crate::state::{BrowserError, BrowserState};
use crate::tree::{FolderTree, nodes_from_listing};

/// What a fetch lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchTarget {
    /// The namespace root.
    Root,
    /// The children of one folder.
    Node(String),
}

/// One listing call issued by the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Tree generation the request belongs to. Bumped on every root load,
    /// so results for a discarded tree are recognised and dropped.
    pub generation: u64,
    /// Namespace being listed.
    pub kind: RootKind,
    /// Root or folder.
    pub target: FetchTarget,
}

impl FetchRequest {
    /// The listing prefix for this request.
    pub fn prefix(&self) -> &str {
        match &self.target {
            FetchTarget::Root => "",
            FetchTarget::Node(path) => path,
        }
    }
}

/// Result of [`FolderBrowser::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// An expanded folder was collapsed; children are kept.
    Collapsed,
    /// A previously loaded folder was re-expanded without a fetch.
    Expanded,
    /// An expansion was queued.
    Queued,
    /// A queued or in-flight expansion was withdrawn.
    Withdrawn,
    /// No folder with that path is in the tree.
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootStatus {
    Idle,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Clone)]
struct InFlight {
    request: FetchRequest,
    withdrawn: bool,
}

/// Lazily expanded folder tree for one root namespace.
pub struct FolderBrowser {
    listing: Arc<dyn ListingService>,
    consumer: Arc<dyn SelectionConsumer>,
    kind: RootKind,
    tree: FolderTree,
    root_status: RootStatus,
    error: Option<BrowserError>,
    pending: VecDeque<String>,
    in_flight: Option<InFlight>,
    generation: u64,
    selected: Option<String>,
}

impl std::fmt::Debug for FolderBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderBrowser")
            .field("kind", &self.kind)
            .field("state", &self.state())
            .field("nodes", &self.tree.len())
            .field("pending", &self.pending)
            .field("selected", &self.selected)
            .finish()
    }
}

impl FolderBrowser {
    /// Create an idle browser. Nothing is fetched until [`start`] or
    /// [`load_root`] is called.
    ///
    /// [`start`]: FolderBrowser::start
    /// [`load_root`]: FolderBrowser::load_root
    pub fn new(
        listing: Arc<dyn ListingService>,
        kind: RootKind,
        consumer: Arc<dyn SelectionConsumer>,
    ) -> Self {
        Self {
            listing,
            consumer,
            kind,
            tree: FolderTree::new(),
            root_status: RootStatus::Idle,
            error: None,
            pending: VecDeque::new(),
            in_flight: None,
            generation: 0,
            selected: None,
        }
    }

    /// Namespace currently browsed.
    pub fn kind(&self) -> RootKind {
        self.kind
    }

    /// The current tree.
    pub fn tree(&self) -> &FolderTree {
        &self.tree
    }

    /// Paths waiting to be expanded, in order.
    pub fn pending(&self) -> Vec<String> {
        self.pending.iter().cloned().collect()
    }

    /// Last selected path in this namespace.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The error currently shown, if any.
    pub fn error(&self) -> Option<&BrowserError> {
        self.error.as_ref()
    }

    /// The observable state.
    ///
    /// An outstanding fetch takes precedence over a shown error, so a
    /// queued expansion can run while an earlier failure is still on
    /// screen.
    pub fn state(&self) -> BrowserState {
        if let Some(in_flight) = &self.in_flight {
            return match &in_flight.request.target {
                FetchTarget::Root => BrowserState::LoadingRoot,
                FetchTarget::Node(path) => BrowserState::ExpandingNode(path.clone()),
            };
        }
        if let Some(error) = &self.error {
            return BrowserState::Error(error.clone());
        }
        match self.root_status {
            RootStatus::Idle => BrowserState::Idle,
            RootStatus::Loading => BrowserState::LoadingRoot,
            RootStatus::Loaded | RootStatus::Failed => BrowserState::Ready,
        }
    }

    /// Begin the first root load. Returns `None` once started.
    pub fn start(&mut self) -> Option<FetchRequest> {
        (self.root_status == RootStatus::Idle).then(|| self.begin_root_load())
    }

    /// Discard the tree and begin loading the root of the current kind.
    pub fn begin_root_load(&mut self) -> FetchRequest {
        self.generation += 1;
        self.tree = FolderTree::new();
        self.pending.clear();
        self.error = None;
        self.root_status = RootStatus::Loading;

        let request = FetchRequest {
            generation: self.generation,
            kind: self.kind,
            target: FetchTarget::Root,
        };
        self.in_flight = Some(InFlight {
            request: request.clone(),
            withdrawn: false,
        });
        debug!(kind = %self.kind, generation = self.generation, "Loading root folders");
        request
    }

    /// Switch namespace. The whole tree, including expanded folders, is
    /// dropped and the new root is loaded from scratch.
    pub fn set_root_kind(&mut self, kind: RootKind) -> FetchRequest {
        info!(from = %self.kind, to = %kind, "Switching root namespace");
        self.kind = kind;
        self.selected = None;
        self.begin_root_load()
    }

    /// Re-issue a failed root load. Returns `None` unless the root failed.
    pub fn retry(&mut self) -> Option<FetchRequest> {
        (self.root_status == RootStatus::Failed).then(|| self.begin_root_load())
    }

    /// Hide the current error. The tree is not touched.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Toggle the folder at `path`.
    ///
    /// Collapsing is local and keeps the children. Expanding a folder that
    /// was loaded before is local too; otherwise a fetch is queued. Toggling
    /// a folder whose expansion is still queued or in flight withdraws it,
    /// and the result of a withdrawn fetch is discarded.
    pub fn toggle(&mut self, path: &str) -> ToggleOutcome {
        if let Some(pos) = self.pending.iter().position(|p| p == path) {
            self.pending.remove(pos);
            debug!(path, "Withdrew queued expansion");
            return ToggleOutcome::Withdrawn;
        }

        if let Some(in_flight) = self.in_flight.as_mut() {
            if matches!(&in_flight.request.target, FetchTarget::Node(p) if p == path) {
                in_flight.withdrawn = !in_flight.withdrawn;
                debug!(path, withdrawn = in_flight.withdrawn, "Toggled in-flight expansion");
                return if in_flight.withdrawn {
                    ToggleOutcome::Withdrawn
                } else {
                    ToggleOutcome::Queued
                };
            }
        }

        let Some(node) = self.tree.find(path) else {
            warn!(path, "Toggle for unknown folder");
            return ToggleOutcome::NotFound;
        };

        let (expand, outcome) = if node.is_expanded() {
            (false, ToggleOutcome::Collapsed)
        } else if node.is_loaded() {
            (true, ToggleOutcome::Expanded)
        } else {
            self.pending.push_back(path.to_string());
            debug!(path, queued = self.pending.len(), "Queued expansion");
            return ToggleOutcome::Queued;
        };

        if let Some(tree) = self.tree.with_expanded(path, expand) {
            self.tree = tree;
        }
        outcome
    }

    /// Report `path` as the selected folder. Expansion state is unchanged.
    pub fn select(&mut self, path: &str) {
        info!(kind = %self.kind, path, "Folder selected");
        self.selected = Some(path.to_string());
        self.consumer.folder_selected(path);
    }

    /// Toggle and select together, as activating a folder label does.
    pub fn activate(&mut self, path: &str) -> ToggleOutcome {
        let outcome = self.toggle(path);
        self.select(path);
        outcome
    }

    /// Hand out the next queued expansion, if nothing is in flight.
    ///
    /// Queued paths that vanished from the tree or were expanded meanwhile
    /// are skipped.
    pub fn next_fetch(&mut self) -> Option<FetchRequest> {
        if self.in_flight.is_some() || self.root_status != RootStatus::Loaded {
            return None;
        }

        while let Some(path) = self.pending.pop_front() {
            match self.tree.find(&path) {
                Some(node) if !node.is_expanded() => {
                    let request = FetchRequest {
                        generation: self.generation,
                        kind: self.kind,
                        target: FetchTarget::Node(path),
                    };
                    self.in_flight = Some(InFlight {
                        request: request.clone(),
                        withdrawn: false,
                    });
                    return Some(request);
                }
                Some(_) => debug!(path = %path, "Skipping queued expansion of open folder"),
                None => warn!(path = %path, "Skipping queued expansion of unknown folder"),
            }
        }
        None
    }

    /// Run a request against the listing service.
    ///
    /// The returned future owns everything it needs, so it can be polled
    /// while the browser keeps handling commands.
    pub fn fetch(
        &self,
        request: FetchRequest,
    ) -> impl Future<Output = (FetchRequest, AppResult<Vec<String>>)> + Send + 'static {
        let listing = Arc::clone(&self.listing);
        async move {
            let result = listing.list_folders(request.kind, request.prefix()).await;
            (request, result)
        }
    }

    /// Apply the result of a request. Returns whether the tree or error
    /// state changed.
    ///
    /// Results for anything other than the outstanding request, or for a
    /// withdrawn expansion, are dropped. A failed fetch never touches the
    /// tree.
    pub fn complete(&mut self, request: FetchRequest, result: AppResult<Vec<String>>) -> bool {
        let in_flight = match self.in_flight.take() {
            Some(current) if current.request == request => current,
            other => {
                self.in_flight = other;
                debug!(?request, "Dropping result of a superseded fetch");
                return false;
            }
        };

        match request.target {
            FetchTarget::Root => match result {
                Ok(paths) => {
                    self.tree = FolderTree::from_listing(&paths);
                    self.root_status = RootStatus::Loaded;
                    self.error = None;
                    info!(kind = %self.kind, folders = self.tree.roots().len(), "Root folders loaded");
                }
                Err(e) => {
                    warn!(kind = %self.kind, error = %e, "Failed to load root folders");
                    self.root_status = RootStatus::Failed;
                    self.error = Some(BrowserError::RootLoad {
                        kind: self.kind,
                        message: e.message,
                    });
                }
            },
            FetchTarget::Node(path) => {
                if in_flight.withdrawn {
                    info!(path = %path, "Discarding expansion withdrawn while in flight");
                    return false;
                }
                match result {
                    Ok(paths) => {
                        let children = nodes_from_listing(&path, &paths);
                        let count = children.len();
                        match self.tree.with_children(&path, children) {
                            Some(tree) => {
                                self.tree = tree;
                                if matches!(&self.error, Some(BrowserError::Expansion { path: p, .. }) if *p == path)
                                {
                                    self.error = None;
                                }
                                debug!(path = %path, children = count, "Folder expanded");
                            }
                            None => warn!(path = %path, "Expanded folder is no longer in the tree"),
                        }
                    }
                    Err(e) => {
                        warn!(path = %path, error = %e, "Failed to load subfolders");
                        self.error = Some(BrowserError::Expansion {
                            folder: leaf_name(&path).to_string(),
                            path,
                            message: e.message,
                        });
                    }
                }
            }
        }
        true
    }

    /// Load the root of the current namespace, discarding any tree.
    pub async fn load_root(&mut self) -> Result<&[FolderNode], BrowserError> {
        let request = self.begin_root_load();
        let (request, result) = self.fetch(request).await;
        self.complete(request, result);
        match &self.error {
            Some(error) if error.is_root_load() => Err(error.clone()),
            _ => Ok(self.tree.roots()),
        }
    }

    /// Switch namespace and load its root.
    pub async fn switch_root(&mut self, kind: RootKind) -> Result<&[FolderNode], BrowserError> {
        self.kind = kind;
        self.selected = None;
        self.load_root().await
    }

    /// Fetch and graft the children of `path` right away, ahead of the
    /// queue. On failure the tree is left exactly as it was.
    ///
    /// Refused while another fetch is outstanding or before the root has
    /// loaded, so at most one listing call is ever pending.
    pub async fn expand(&mut self, path: &str) -> Result<Vec<FolderNode>, BrowserError> {
        let refuse = |message: &str| BrowserError::Expansion {
            path: path.to_string(),
            folder: leaf_name(path).to_string(),
            message: message.to_string(),
        };
        if self.root_status != RootStatus::Loaded {
            return Err(refuse("root folders are not loaded"));
        }
        if let Some(in_flight) = &self.in_flight {
            warn!(
                path,
                busy = in_flight.request.prefix(),
                "Expansion refused while a fetch is outstanding"
            );
            return Err(refuse("another fetch is in progress"));
        }
        if self.tree.find(path).is_none() {
            return Err(refuse("folder is not in the tree"));
        }
        self.pending.retain(|p| p != path);

        let request = FetchRequest {
            generation: self.generation,
            kind: self.kind,
            target: FetchTarget::Node(path.to_string()),
        };
        self.in_flight = Some(InFlight {
            request: request.clone(),
            withdrawn: false,
        });

        let (request, result) = self.fetch(request).await;
        let failed = result.is_err();
        self.complete(request, result);

        match (&self.error, failed) {
            (Some(error), true) => Err(error.clone()),
            _ => Ok(self
                .tree
                .find(path)
                .map(|node| node.children().to_vec())
                .unwrap_or_default()),
        }
    }

    /// Whether the root load failed and [`retry`](Self::retry) would
    /// re-issue it.
    pub fn can_retry(&self) -> bool {
        self.root_status == RootStatus::Failed
    }

    /// Process queued expansions one at a time until the queue is empty.
    /// Returns the number of fetches issued.
    pub async fn run_pending(&mut self) -> usize {
        let mut fetched = 0;
        while let Some(request) = self.next_fetch() {
            let (request, result) = self.fetch(request).await;
            self.complete(request, result);
            fetched += 1;
        }
        fetched
    }
}
