//! Object store connector: listing with folder aggregation.
//!
//! Listing an asset prefix returns its immediate children. File children
//! become one-file summaries; folder children (common-prefix groups) are
//! aggregated over all descendants: total file count, summed size, and the
//! most recent modification time. Results are sorted most recently
//! modified first.

use crate::config::Capability;
use crate::error::DamonError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path as StorePath;
use object_store::ObjectStore;
use serde::Deserialize;
use std::sync::Arc;

/// Settings for the S3 backend.
#[derive(Debug, Clone, Deserialize)]
pub struct S3Settings {
    pub bucket: String,
    #[serde(default)]
    pub key_prefix: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Custom endpoint for S3-compatible stores.
    pub endpoint: Option<String>,
}

impl S3Settings {
    pub fn from_table(table: toml::value::Table) -> Result<Self, DamonError> {
        super::settings_from_table(Capability::ObjectStore, table)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    File,
    Folder,
}

/// Aggregated summary of one immediate child under a listed prefix.
#[derive(Debug, Clone)]
pub struct ObjectSummary {
    pub kind: ObjectKind,
    pub key: String,
    pub num_files: u64,
    pub size_bytes: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Lists immediate children under a prefix, folders aggregated over all
/// descendants, sorted descending by last-modified timestamp.
#[async_trait]
pub trait ObjectStoreConnector: Send + Sync {
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectSummary>, DamonError>;
}

/// Object-store connector over any `object_store` backend; production use
/// is S3 via `new`, tests wrap an in-memory store via `from_store`.
pub struct S3ObjectStore {
    store: Arc<dyn ObjectStore>,
    key_prefix: String,
}

impl S3ObjectStore {
    pub fn new(settings: S3Settings) -> Result<Self, DamonError> {
        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(settings.bucket.as_str())
            .with_region(settings.region.as_str())
            .with_access_key_id(settings.access_key_id.as_str())
            .with_secret_access_key(settings.secret_access_key.as_str());
        if let Some(ref endpoint) = settings.endpoint {
            builder = builder
                .with_endpoint(endpoint.as_str())
                .with_allow_http(endpoint.starts_with("http://"));
        }
        let store = builder
            .build()
            .map_err(|e| DamonError::ObjectStore(format!("Failed to create S3 client: {}", e)))?;
        Ok(Self {
            store: Arc::new(store),
            key_prefix: settings.key_prefix,
        })
    }

    /// Wrap an existing store with a key prefix.
    pub fn from_store(store: Arc<dyn ObjectStore>, key_prefix: impl Into<String>) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
        }
    }

    fn full_prefix(&self, prefix: &str) -> Option<StorePath> {
        let joined = [self.key_prefix.trim_matches('/'), prefix.trim_matches('/')]
            .iter()
            .filter(|part| !part.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join("/");
        if joined.is_empty() {
            None
        } else {
            Some(StorePath::from(joined))
        }
    }

    /// Aggregate all descendants of a folder prefix. Empty folders yield
    /// (0, 0, None).
    async fn folder_stats(
        &self,
        prefix: &StorePath,
    ) -> Result<(u64, u64, Option<DateTime<Utc>>), DamonError> {
        let mut num_files = 0u64;
        let mut total_size = 0u64;
        let mut latest: Option<DateTime<Utc>> = None;

        let mut stream = self.store.list(Some(prefix));
        while let Some(meta) = stream.try_next().await.map_err(map_store_error)? {
            num_files += 1;
            total_size += meta.size as u64;
            latest = match latest {
                Some(ts) if ts >= meta.last_modified => Some(ts),
                _ => Some(meta.last_modified),
            };
        }
        Ok((num_files, total_size, latest))
    }
}

#[async_trait]
impl ObjectStoreConnector for S3ObjectStore {
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectSummary>, DamonError> {
        let full = self.full_prefix(prefix);
        let listing = self
            .store
            .list_with_delimiter(full.as_ref())
            .await
            .map_err(map_store_error)?;

        let mut items = Vec::new();
        for meta in listing.objects {
            items.push(ObjectSummary {
                kind: ObjectKind::File,
                key: meta.location.to_string(),
                num_files: 1,
                size_bytes: meta.size as u64,
                last_modified: Some(meta.last_modified),
            });
        }
        for folder in listing.common_prefixes {
            let (num_files, size_bytes, last_modified) = self.folder_stats(&folder).await?;
            items.push(ObjectSummary {
                kind: ObjectKind::Folder,
                key: folder.to_string(),
                num_files,
                size_bytes,
                last_modified,
            });
        }

        // Most recent first; never-modified (empty) folders sort last.
        items.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(items)
    }
}

fn map_store_error(error: object_store::Error) -> DamonError {
    DamonError::ObjectStore(error.to_string())
}
