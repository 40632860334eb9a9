//! Storage provider trait for pluggable bucket backends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// Metadata about a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageObjectMeta {
    /// Full key within the bucket.
    pub path: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Last modified timestamp.
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,
    /// Whether this entry is a folder.
    pub is_directory: bool,
}

/// One level of a bucket listing.
///
/// `folders` holds full folder paths without a trailing delimiter, in the
/// order the backend returned them. `files` holds the objects directly
/// under the listed prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Immediate child folder paths.
    pub folders: Vec<String>,
    /// Immediate child objects.
    pub files: Vec<StorageObjectMeta>,
}

/// Trait for a single bucket backend.
///
/// Paths are `/`-separated keys relative to the bucket root. An empty
/// prefix lists the bucket root.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the bucket is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// List the immediate folders and files under `prefix`.
    async fn list(&self, prefix: &str) -> AppResult<Listing>;

    /// Create an (empty) folder at `path`.
    async fn create_folder(&self, path: &str) -> AppResult<()>;
}
