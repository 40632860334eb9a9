//! Local filesystem storage provider.
//!
//! A bucket is a directory; folders are subdirectories and files are
//! regular files.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use montage_core::error::{AppError, ErrorKind};
use montage_core::result::AppResult;
use montage_core::traits::storage::{Listing, StorageObjectMeta, StorageProvider};
use montage_core::types::folder_path::{DELIMITER, join_path};

/// Local filesystem storage provider for one bucket.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Directory backing the bucket.
    root: PathBuf,
}

impl LocalStorageProvider {
    /// Create a provider for `bucket` under `root_path`, creating the
    /// bucket directory if needed.
    pub async fn new(root_path: &str, bucket: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path).join(bucket);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create bucket directory: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a bucket-relative path, rejecting anything that could
    /// escape the bucket directory.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let clean = path.trim_matches(DELIMITER);
        let relative = Path::new(clean);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !clean.is_empty() && !safe {
            return Err(AppError::validation(format!("Invalid folder path: {path}")));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(is_dir(&self.root).await)
    }

    async fn list(&self, prefix: &str) -> AppResult<Listing> {
        let full_path = self.resolve(prefix)?;
        if !is_dir(&full_path).await {
            return Ok(Listing::default());
        }

        let parent = prefix.trim_matches(DELIMITER);
        let mut dirs = Vec::new();
        let mut files = Vec::new();

        let mut dir = fs::read_dir(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to list directory: {prefix}"),
                e,
            )
        })?;

        while let Some(entry) = dir.next_entry().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to read directory entry", e)
        })? {
            let entry_meta = entry.metadata().await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to get entry metadata", e)
            })?;

            let name = entry.file_name().to_string_lossy().to_string();
            let entry_path = join_path(parent, &name);

            if entry_meta.is_dir() {
                dirs.push(entry_path);
            } else {
                let last_modified = entry_meta
                    .modified()
                    .ok()
                    .map(chrono::DateTime::<chrono::Utc>::from);
                files.push(StorageObjectMeta {
                    path: entry_path,
                    size_bytes: entry_meta.len(),
                    last_modified,
                    is_directory: false,
                });
            }
        }

        // Object stores list keys in byte order.
        dirs.sort();
        files.sort_by(|a, b| a.path.cmp(&b.path));

        debug!(prefix, folders = dirs.len(), files = files.len(), "Listed local directory");
        Ok(Listing {
            folders: dirs,
            files,
        })
    }

    async fn create_folder(&self, path: &str) -> AppResult<()> {
        if path.trim_matches(DELIMITER).is_empty() {
            return Err(AppError::validation("Folder path must not be empty"));
        }
        let full_path = self.resolve(path)?;
        fs::create_dir_all(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create directory: {path}"),
                e,
            )
        })?;
        debug!(path, "Created local folder");
        Ok(())
    }
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|meta| meta.is_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn provider(dir: &tempfile::TempDir) -> LocalStorageProvider {
        LocalStorageProvider::new(dir.path().to_str().unwrap(), "video-uploads")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_root_and_nested() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir).await;

        provider.create_folder("wedding").await.unwrap();
        provider.create_folder("trip_2023/day2").await.unwrap();
        provider.create_folder("trip_2023/day1").await.unwrap();
        std::fs::write(
            dir.path().join("video-uploads/trip_2023/cover.jpg"),
            b"jpeg",
        )
        .unwrap();

        let root = provider.list("").await.unwrap();
        assert_eq!(root.folders, vec!["trip_2023", "wedding"]);
        assert!(root.files.is_empty());

        let trip = provider.list("trip_2023").await.unwrap();
        assert_eq!(trip.folders, vec!["trip_2023/day1", "trip_2023/day2"]);
        assert_eq!(trip.files.len(), 1);
        assert_eq!(trip.files[0].path, "trip_2023/cover.jpg");
        assert_eq!(trip.files[0].size_bytes, 4);
    }

    #[tokio::test]
    async fn test_list_missing_prefix_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir).await;

        let listing = provider.list("nope").await.unwrap();
        assert!(listing.folders.is_empty());
        assert!(listing.files.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir).await;

        let err = provider.list("../etc").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(provider.create_folder("a/../../b").await.is_err());
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir).await;
        assert!(provider.health_check().await.unwrap());

        std::fs::remove_dir_all(dir.path().join("video-uploads")).unwrap();
        assert!(!provider.health_check().await.unwrap());
        assert!(provider.list("").await.unwrap().folders.is_empty());
    }
}
