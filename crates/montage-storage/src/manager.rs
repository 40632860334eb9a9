//! Storage manager: routes listing calls to the provider for a root kind.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use montage_core::config::storage::StorageConfig;
use montage_core::error::AppError;
use montage_core::result::AppResult;
use montage_core::traits::listing::ListingService;
use montage_core::traits::storage::{Listing, StorageProvider};
use montage_core::types::RootKind;
use montage_core::types::folder_path::{format_folder_name, join_path};

use crate::providers::{LocalStorageProvider, MemoryStorageProvider};

/// Holds one provider per root kind.
#[derive(Debug, Clone, Default)]
pub struct StorageManager {
    /// Map of root kind → provider instance.
    providers: Arc<RwLock<HashMap<RootKind, Arc<dyn StorageProvider>>>>,
}

impl StorageManager {
    /// Create a new empty storage manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a manager with both buckets registered from configuration.
    pub async fn from_config(config: &StorageConfig) -> AppResult<Self> {
        let manager = Self::new();

        for kind in RootKind::ALL {
            let bucket = config.bucket_for(kind);
            let provider: Arc<dyn StorageProvider> = match config.provider.as_str() {
                "local" => {
                    Arc::new(LocalStorageProvider::new(&config.local.root_path, bucket).await?)
                }
                "memory" => Arc::new(MemoryStorageProvider::new()),
                #[cfg(feature = "s3")]
                "s3" => Arc::new(crate::providers::S3StorageProvider::new(&config.s3, bucket).await?),
                #[cfg(not(feature = "s3"))]
                "s3" => {
                    return Err(AppError::configuration(
                        "S3 storage requested but the `s3` feature is not enabled",
                    ));
                }
                other => {
                    return Err(AppError::configuration(format!(
                        "Unknown storage provider '{other}'"
                    )));
                }
            };

            info!(
                kind = %kind,
                bucket,
                provider = provider.provider_type(),
                "Registered storage provider"
            );
            manager.register(kind, provider).await;
        }

        Ok(manager)
    }

    /// Register (or replace) the provider for a root kind.
    pub async fn register(&self, kind: RootKind, provider: Arc<dyn StorageProvider>) {
        let mut providers = self.providers.write().await;
        providers.insert(kind, provider);
    }

    /// Get the provider for a root kind.
    pub async fn get(&self, kind: RootKind) -> AppResult<Arc<dyn StorageProvider>> {
        let providers = self.providers.read().await;
        providers
            .get(&kind)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("No storage registered for {kind}")))
    }

    /// Create a folder named `name` under `parent` (empty for top level).
    ///
    /// The name is normalized first; the returned string is the new
    /// folder's full path.
    pub async fn create_folder(
        &self,
        kind: RootKind,
        parent: &str,
        name: &str,
    ) -> AppResult<String> {
        let formatted = format_folder_name(name)?;
        let path = join_path(parent, &formatted);
        self.get(kind).await?.create_folder(&path).await?;
        info!(kind = %kind, path = %path, "Created folder");
        Ok(path)
    }

    /// Check health of all registered providers.
    pub async fn health_check_all(&self) -> HashMap<RootKind, bool> {
        let providers = self.providers.read().await;
        let mut results = HashMap::new();
        for (kind, provider) in providers.iter() {
            let healthy = provider.health_check().await.unwrap_or(false);
            results.insert(*kind, healthy);
        }
        results
    }
}

#[async_trait]
impl ListingService for StorageManager {
    async fn list_folders(&self, kind: RootKind, prefix: &str) -> AppResult<Vec<String>> {
        let listing = self.list_entries(kind, prefix).await?;
        Ok(listing.folders)
    }

    async fn list_entries(&self, kind: RootKind, prefix: &str) -> AppResult<Listing> {
        debug!(kind = %kind, prefix, "Listing entries");
        self.get(kind).await?.list(prefix).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_manager() -> StorageManager {
        let manager = StorageManager::new();
        let video =
            MemoryStorageProvider::with_keys(["trip_2023/day1/a.mp4", "wedding/b.mp4"]).await;
        let music = MemoryStorageProvider::with_keys(["ambient/track.mp3"]).await;
        manager.register(RootKind::Video, Arc::new(video)).await;
        manager.register(RootKind::Music, Arc::new(music)).await;
        manager
    }

    #[tokio::test]
    async fn test_routes_by_kind() {
        let manager = memory_manager().await;

        let video = manager.list_folders(RootKind::Video, "").await.unwrap();
        assert_eq!(video, vec!["trip_2023", "wedding"]);

        let music = manager.list_folders(RootKind::Music, "").await.unwrap();
        assert_eq!(music, vec!["ambient"]);
    }

    #[tokio::test]
    async fn test_unregistered_kind_fails() {
        let manager = StorageManager::new();
        let err = manager.list_folders(RootKind::Video, "").await.unwrap_err();
        assert_eq!(err.kind, montage_core::error::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_create_folder_formats_name() {
        let manager = memory_manager().await;

        let path = manager
            .create_folder(RootKind::Video, "trip_2023", "Day 3  Beach")
            .await
            .unwrap();
        assert_eq!(path, "trip_2023/day_3_beach");

        let children = manager
            .list_folders(RootKind::Video, "trip_2023")
            .await
            .unwrap();
        assert_eq!(children, vec!["trip_2023/day1", "trip_2023/day_3_beach"]);
    }

    #[tokio::test]
    async fn test_from_config_local() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StorageConfig::default();
        config.local.root_path = dir.path().to_string_lossy().to_string();

        let manager = StorageManager::from_config(&config).await.unwrap();
        let health = manager.health_check_all().await;
        assert_eq!(health.get(&RootKind::Video), Some(&true));
        assert!(dir.path().join("music-uploads").is_dir());
    }

    #[tokio::test]
    async fn test_from_config_unknown_provider() {
        let config = StorageConfig {
            provider: "ftp".to_string(),
            ..StorageConfig::default()
        };
        assert!(StorageManager::from_config(&config).await.is_err());
    }
}
