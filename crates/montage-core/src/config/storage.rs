//! Storage provider configuration.

use serde::{Deserialize, Serialize};

use crate::types::RootKind;

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Which provider backs both buckets: `"local"`, `"memory"` or `"s3"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Bucket holding video assets.
    #[serde(default = "default_video_bucket")]
    pub video_bucket: String,
    /// Bucket holding music assets.
    #[serde(default = "default_music_bucket")]
    pub music_bucket: String,
    /// Local filesystem storage configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
    /// S3-compatible storage configuration.
    #[serde(default)]
    pub s3: S3StorageConfig,
}

impl StorageConfig {
    /// Bucket name for a root kind.
    pub fn bucket_for(&self, kind: RootKind) -> &str {
        match kind {
            RootKind::Video => &self.video_bucket,
            RootKind::Music => &self.music_bucket,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            video_bucket: default_video_bucket(),
            music_bucket: default_music_bucket(),
            local: LocalStorageConfig::default(),
            s3: S3StorageConfig::default(),
        }
    }
}

/// Local filesystem storage configuration.
///
/// Each bucket is a directory directly under `root_path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root path for local buckets.
    #[serde(default = "default_local_root")]
    pub root_path: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
        }
    }
}

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StorageConfig {
    /// S3 endpoint URL (for non-AWS services like MinIO). Empty for AWS.
    #[serde(default)]
    pub endpoint: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Access key ID. Empty to use the default credential chain.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            access_key: String::new(),
            secret_key: String::new(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_video_bucket() -> String {
    "video-uploads".to_string()
}

fn default_music_bucket() -> String {
    "music-uploads".to_string()
}

fn default_local_root() -> String {
    "./data/buckets".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}
