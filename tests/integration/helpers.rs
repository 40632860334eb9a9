//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use montage_browser::{BrowserHandle, BrowserService, BrowserSnapshot, FolderBrowser, SessionContext};
use montage_core::error::AppError;
use montage_core::result::AppResult;
use montage_core::traits::{Listing, ListingService};
use montage_core::types::RootKind;
use montage_storage::StorageManager;
use montage_storage::providers::MemoryStorageProvider;

/// Video bucket keys used across tests.
pub const VIDEO_KEYS: &[&str] = &[
    "trip_2023/day1/beach.mp4",
    "trip_2023/day1/sunset.mp4",
    "trip_2023/day2/hike.mp4",
    "wedding/ceremony/vows.mp4",
    "wedding/party/dance.mp4",
    "intro.mp4",
];

/// Music bucket keys used across tests.
pub const MUSIC_KEYS: &[&str] = &["ambient/calm.mp3", "jazz/late_night/sax.mp3"];

/// Storage manager backed by in-memory buckets.
pub async fn memory_storage() -> StorageManager {
    let manager = StorageManager::new();
    manager
        .register(
            RootKind::Video,
            Arc::new(MemoryStorageProvider::with_keys(VIDEO_KEYS.iter().copied()).await),
        )
        .await;
    manager
        .register(
            RootKind::Music,
            Arc::new(MemoryStorageProvider::with_keys(MUSIC_KEYS.iter().copied()).await),
        )
        .await;
    manager
}

/// Listing wrapper that counts calls and fails chosen prefixes.
#[derive(Debug)]
pub struct CountingListing {
    inner: StorageManager,
    failing: Vec<String>,
    calls: AtomicUsize,
}

impl CountingListing {
    pub fn new(inner: StorageManager) -> Self {
        Self {
            inner,
            failing: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(mut self, prefix: &str) -> Self {
        self.failing.push(prefix.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListingService for CountingListing {
    async fn list_folders(&self, kind: RootKind, prefix: &str) -> AppResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.iter().any(|p| p == prefix) {
            return Err(AppError::storage("bucket unavailable"));
        }
        self.inner.list_folders(kind, prefix).await
    }

    async fn list_entries(&self, kind: RootKind, prefix: &str) -> AppResult<Listing> {
        self.inner.list_entries(kind, prefix).await
    }
}

/// A running browser over `listing` reporting into `session`.
pub fn spawn_browser(
    listing: Arc<dyn ListingService>,
    kind: RootKind,
    session: &SessionContext,
) -> BrowserHandle {
    let browser = FolderBrowser::new(listing, kind, Arc::new(session.consumer(kind)));
    let (handle, _task) = BrowserService::spawn(browser);
    handle
}

/// Wait for a snapshot matching `predicate`, failing the test after a while.
pub async fn wait(
    handle: &BrowserHandle,
    predicate: impl FnMut(&BrowserSnapshot) -> bool,
) -> BrowserSnapshot {
    tokio::time::timeout(Duration::from_secs(5), handle.wait_for(predicate))
        .await
        .expect("timed out waiting for browser")
        .expect("browser stopped")
}

/// Names of the top-level nodes in a snapshot.
pub fn root_names(snapshot: &BrowserSnapshot) -> Vec<String> {
    snapshot
        .tree
        .roots()
        .iter()
        .map(|n| n.name().to_string())
        .collect()
}
