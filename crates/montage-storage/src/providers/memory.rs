//! In-memory storage provider holding flat object keys.
//!
//! Listing uses the same delimiter grouping an object store applies, so
//! it behaves like a bucket without any network access.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use montage_core::error::AppError;
use montage_core::result::AppResult;
use montage_core::traits::storage::{Listing, StorageObjectMeta, StorageProvider};
use montage_core::types::folder_path::DELIMITER;

use crate::grouping::{group_keys, list_prefix};

/// In-memory bucket keyed by object path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorageProvider {
    /// Objects sorted by key, as an object store lists them.
    objects: Arc<RwLock<BTreeMap<String, StorageObjectMeta>>>,
}

impl MemoryStorageProvider {
    /// Create an empty bucket.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bucket pre-populated with zero-byte objects at `keys`.
    pub async fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::new();
        for key in keys {
            provider.put(key, 0).await;
        }
        provider
    }

    /// Insert or replace an object.
    pub async fn put(&self, key: impl Into<String>, size_bytes: u64) {
        let key = key.into();
        let meta = StorageObjectMeta {
            path: key.clone(),
            size_bytes,
            last_modified: Some(chrono::Utc::now()),
            is_directory: key.ends_with(DELIMITER),
        };
        self.objects.write().await.insert(key, meta);
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Whether the bucket holds no objects.
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl StorageProvider for MemoryStorageProvider {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn list(&self, prefix: &str) -> AppResult<Listing> {
        let objects = self.objects.read().await;
        let listing = group_keys(objects.values(), prefix);
        debug!(
            prefix,
            folders = listing.folders.len(),
            files = listing.files.len(),
            "Listed in-memory bucket"
        );
        Ok(listing)
    }

    async fn create_folder(&self, path: &str) -> AppResult<()> {
        let key = list_prefix(path);
        if key.is_empty() {
            return Err(AppError::validation("Folder path must not be empty"));
        }
        self.put(key, 0).await;
        Ok(())
    }
}
