//! Browser service: runs a [`FolderBrowser`] on its own task.
//!
//! Commands arrive over an mpsc channel and every change is published as a
//! [`BrowserSnapshot`] on a watch channel. While a listing call is
//! outstanding the loop keeps receiving commands, so toggles queue up,
//! selections are reported and root switches cancel the fetch.

use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use montage_core::error::AppError;
use montage_core::result::AppResult;
use montage_core::types::RootKind;

use crate::browser::{FetchRequest, FolderBrowser};
use crate::state::{BrowserError, BrowserState};
use crate::tree::FolderTree;

const COMMAND_BUFFER: usize = 64;

type FetchFuture = BoxFuture<'static, (FetchRequest, AppResult<Vec<String>>)>;

/// Commands accepted by a running browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserCommand {
    /// Expand or collapse a folder.
    Toggle(String),
    /// Report a folder as selected.
    Select(String),
    /// Toggle and select.
    Activate(String),
    /// Switch namespace and reload.
    SetRootKind(RootKind),
    /// Retry a failed root load.
    Retry,
    /// Hide the current error.
    DismissError,
    /// Stop the service.
    Shutdown,
}

/// Everything a view needs to render the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserSnapshot {
    /// Sequence number of the last command the service applied.
    pub applied: u64,
    pub kind: RootKind,
    pub state: BrowserState,
    pub error: Option<BrowserError>,
    pub tree: FolderTree,
    pub pending: Vec<String>,
    pub selected: Option<String>,
    /// Whether a failed root load can be retried.
    pub can_retry: bool,
}

impl From<&FolderBrowser> for BrowserSnapshot {
    fn from(browser: &FolderBrowser) -> Self {
        Self {
            applied: 0,
            kind: browser.kind(),
            state: browser.state(),
            error: browser.error().cloned(),
            tree: browser.tree().clone(),
            pending: browser.pending(),
            selected: browser.selected().map(str::to_string),
            can_retry: browser.can_retry(),
        }
    }
}

/// Owns a browser and drives its fetches.
pub struct BrowserService {
    browser: FolderBrowser,
    commands: mpsc::Receiver<(u64, BrowserCommand)>,
    snapshots: watch::Sender<BrowserSnapshot>,
    applied: u64,
}

impl BrowserService {
    /// Spawn the service. The root load starts immediately.
    ///
    /// The join handle yields the browser back once the service stops,
    /// either on [`BrowserHandle::shutdown`] or when every handle is dropped.
    pub fn spawn(browser: FolderBrowser) -> (BrowserHandle, JoinHandle<FolderBrowser>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(BrowserSnapshot::from(&browser));

        let service = Self {
            browser,
            commands: command_rx,
            snapshots: snapshot_tx,
            applied: 0,
        };
        let task = tokio::spawn(service.run());

        (
            BrowserHandle {
                commands: command_tx,
                sequence: Arc::new(Mutex::new(0)),
                snapshots: snapshot_rx,
            },
            task,
        )
    }

    async fn run(mut self) -> FolderBrowser {
        info!(kind = %self.browser.kind(), "Browser service started");

        let mut in_flight: Option<FetchFuture> =
            self.browser.start().map(|request| self.browser.fetch(request).boxed());
        self.publish();

        loop {
            if in_flight.is_none() {
                if let Some(request) = self.browser.next_fetch() {
                    debug!(prefix = request.prefix(), "Starting queued fetch");
                    in_flight = Some(self.browser.fetch(request).boxed());
                    self.publish();
                }
            }

            tokio::select! {
                (request, result) = async {
                    match in_flight.as_mut() {
                        Some(fetch) => fetch.await,
                        None => std::future::pending().await,
                    }
                } => {
                    in_flight = None;
                    self.browser.complete(request, result);
                }
                command = self.commands.recv() => {
                    match command {
                        None | Some((_, BrowserCommand::Shutdown)) => break,
                        Some((seq, command)) => {
                            // A root load supersedes whatever was in flight.
                            if let Some(request) = self.apply(command) {
                                in_flight = Some(self.browser.fetch(request).boxed());
                            }
                            self.applied = seq;
                        }
                    }
                }
            }

            self.publish();
        }

        info!(kind = %self.browser.kind(), "Browser service stopped");
        self.browser
    }

    fn apply(&mut self, command: BrowserCommand) -> Option<FetchRequest> {
        debug!(?command, "Browser command");
        match command {
            BrowserCommand::Toggle(path) => {
                self.browser.toggle(&path);
                None
            }
            BrowserCommand::Select(path) => {
                self.browser.select(&path);
                None
            }
            BrowserCommand::Activate(path) => {
                self.browser.activate(&path);
                None
            }
            BrowserCommand::SetRootKind(kind) => Some(self.browser.set_root_kind(kind)),
            BrowserCommand::Retry => self.browser.retry(),
            BrowserCommand::DismissError => {
                self.browser.dismiss_error();
                None
            }
            BrowserCommand::Shutdown => None,
        }
    }

    fn publish(&self) {
        let mut snapshot = BrowserSnapshot::from(&self.browser);
        snapshot.applied = self.applied;
        self.snapshots.send_replace(snapshot);
    }
}

/// Cloneable handle to a running [`BrowserService`].
#[derive(Debug, Clone)]
pub struct BrowserHandle {
    commands: mpsc::Sender<(u64, BrowserCommand)>,
    /// Last sequence number handed out, shared by all clones.
    sequence: Arc<Mutex<u64>>,
    snapshots: watch::Receiver<BrowserSnapshot>,
}

impl BrowserHandle {
    /// Send a raw command. Returns its sequence number.
    pub async fn send(&self, command: BrowserCommand) -> AppResult<u64> {
        let permit = self
            .commands
            .reserve()
            .await
            .map_err(|_| AppError::internal("Browser service has stopped"))?;

        // Numbering and enqueueing under one lock keeps channel order equal
        // to sequence order across clones.
        let mut sequence = self
            .sequence
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *sequence += 1;
        permit.send((*sequence, command));
        Ok(*sequence)
    }

    pub async fn toggle(&self, path: impl Into<String>) -> AppResult<()> {
        self.send(BrowserCommand::Toggle(path.into())).await?;
        Ok(())
    }

    pub async fn select(&self, path: impl Into<String>) -> AppResult<()> {
        self.send(BrowserCommand::Select(path.into())).await?;
        Ok(())
    }

    pub async fn activate(&self, path: impl Into<String>) -> AppResult<()> {
        self.send(BrowserCommand::Activate(path.into())).await?;
        Ok(())
    }

    pub async fn set_root_kind(&self, kind: RootKind) -> AppResult<()> {
        self.send(BrowserCommand::SetRootKind(kind)).await?;
        Ok(())
    }

    pub async fn retry(&self) -> AppResult<()> {
        self.send(BrowserCommand::Retry).await?;
        Ok(())
    }

    pub async fn dismiss_error(&self) -> AppResult<()> {
        self.send(BrowserCommand::DismissError).await?;
        Ok(())
    }

    pub async fn shutdown(&self) -> AppResult<()> {
        self.send(BrowserCommand::Shutdown).await?;
        Ok(())
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> BrowserSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<BrowserSnapshot> {
        self.snapshots.clone()
    }

    /// Send a command and wait for the first snapshot in which it has been
    /// applied and no fetch is outstanding or queued.
    pub async fn send_and_settle(&self, command: BrowserCommand) -> AppResult<BrowserSnapshot> {
        let seq = self.send(command).await?;
        self.wait_for(|s| s.applied >= seq && !s.state.is_busy() && s.pending.is_empty())
            .await
    }

    /// Wait until a snapshot satisfies `predicate`, checking the current
    /// one first.
    pub async fn wait_for<F>(&self, predicate: F) -> AppResult<BrowserSnapshot>
    where
        F: FnMut(&BrowserSnapshot) -> bool,
    {
        let mut rx = self.snapshots.clone();
        let snapshot = rx
            .wait_for(predicate)
            .await
            .map_err(|_| AppError::internal("Browser service has stopped"))?;
        Ok(snapshot.clone())
    }
}
