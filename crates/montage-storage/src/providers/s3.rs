//! S3-compatible object storage provider (requires the `s3` feature).

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, info};

use montage_core::config::storage::S3StorageConfig;
use montage_core::error::{AppError, ErrorKind};
use montage_core::result::AppResult;
use montage_core::traits::storage::{Listing, StorageObjectMeta, StorageProvider};
use montage_core::types::folder_path::DELIMITER;

use crate::grouping::{folder_from_prefix, list_prefix};

/// S3-compatible storage provider for one bucket.
#[derive(Debug, Clone)]
pub struct S3StorageProvider {
    client: Client,
    bucket: String,
}

impl S3StorageProvider {
    /// Create a provider for `bucket`.
    ///
    /// Static credentials are used when an access key is configured,
    /// otherwise the default AWS credential chain applies. A custom
    /// endpoint switches to path-style addressing.
    pub async fn new(config: &S3StorageConfig, bucket: &str) -> AppResult<Self> {
        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket,
            "Initializing S3 storage provider"
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));
        if !config.access_key.is_empty() {
            loader = loader.credentials_provider(Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "montage-config",
            ));
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if !config.endpoint.is_empty() {
            builder = builder
                .endpoint_url(config.endpoint.clone())
                .force_path_style(true);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: bucket.to_string(),
        })
    }
}

#[async_trait]
impl StorageProvider for S3StorageProvider {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok())
    }

    async fn list(&self, prefix: &str) -> AppResult<Listing> {
        let request_prefix = list_prefix(prefix);
        let mut listing = Listing::default();
        let mut continuation: Option<String> = None;

        loop {
            let resp = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(&request_prefix)
                .delimiter(DELIMITER.to_string())
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::ExternalService,
                        format!("Failed to list s3://{}/{request_prefix}", self.bucket),
                        e,
                    )
                })?;

            for common in resp.common_prefixes() {
                if let Some(p) = common.prefix() {
                    if p != request_prefix {
                        listing.folders.push(folder_from_prefix(p));
                    }
                }
            }

            for object in resp.contents() {
                let Some(key) = object.key() else { continue };
                // Folder placeholders are not files.
                if key.ends_with(DELIMITER) || key == request_prefix {
                    continue;
                }
                let last_modified = object.last_modified().and_then(|t| {
                    chrono::DateTime::<chrono::Utc>::from_timestamp(t.secs(), t.subsec_nanos())
                });
                listing.files.push(StorageObjectMeta {
                    path: key.to_string(),
                    size_bytes: object.size().unwrap_or(0).max(0) as u64,
                    last_modified,
                    is_directory: false,
                });
            }

            match (resp.is_truncated(), resp.next_continuation_token()) {
                (Some(true), Some(token)) => continuation = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(
            bucket = %self.bucket,
            prefix = %request_prefix,
            folders = listing.folders.len(),
            files = listing.files.len(),
            "Listed S3 prefix"
        );
        Ok(listing)
    }

    async fn create_folder(&self, path: &str) -> AppResult<()> {
        let key = list_prefix(path);
        if key.is_empty() {
            return Err(AppError::validation("Folder path must not be empty"));
        }

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from_static(b""))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Failed to create folder s3://{}/{key}", self.bucket),
                    e,
                )
            })?;

        debug!(bucket = %self.bucket, key = %key, "Created S3 folder placeholder");
        Ok(())
    }
}
