//! Cloud storage upload support (S3 and local filesystem)

use crate::config::StorageConfig;
use crate::error::{Error, Result};
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::sync::Arc;

/// Upload destination parsed from a URL
///
/// Credentials come from the storage section of the configuration; nothing is
/// read from the process environment.
#[derive(Debug, Clone)]
pub struct CloudDestination {
    store: Arc<dyn ObjectStore>,
    /// Base path prefix within the bucket
    prefix: String,
    /// Original URL scheme for logging
    scheme: String,
}

impl CloudDestination {
    /// Parse a destination URL and create the matching object store.
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` - AWS S3 (or any S3-compatible endpoint)
    /// - `/local/path/` or `./path/` - Local filesystem
    pub fn new(url: &str, storage: &StorageConfig) -> Result<Self> {
        if url.starts_with("s3://") {
            Self::new_s3(url, storage)
        } else {
            Self::new_local(url)
        }
    }

    fn new_s3(url: &str, storage: &StorageConfig) -> Result<Self> {
        let without_scheme = url
            .strip_prefix("s3://")
            .ok_or_else(|| Error::config(format!("Invalid s3 URL: {url}")))?;

        let (bucket, prefix) = match without_scheme.find('/') {
            Some(idx) => (
                &without_scheme[..idx],
                without_scheme[idx + 1..].to_string(),
            ),
            None => (without_scheme, String::new()),
        };
        if bucket.is_empty() {
            return Err(Error::config(format!("Invalid s3 URL: {url}")));
        }

        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(bucket)
            .with_access_key_id(&storage.access_key_id)
            .with_secret_access_key(&storage.secret_access_key)
            .with_region(&storage.region);
        if let Some(endpoint) = &storage.endpoint {
            builder = builder.with_endpoint(endpoint).with_allow_http(true);
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create s3 client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "s3".to_string(),
        })
    }

    fn new_local(path: &str) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);

        std::fs::create_dir_all(path)
            .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            scheme: "file".to_string(),
        })
    }

    /// Check if this is a cloud destination (not local)
    pub fn is_cloud(&self) -> bool {
        self.scheme != "file"
    }

    /// Get the scheme (s3, file)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Upload a cleaned CSV artifact as `{table_name}.csv` under the prefix.
    /// Returns the full destination path for logging.
    pub async fn upload_csv(&self, table_name: &str, data: Bytes) -> Result<String> {
        let filename = format!("{table_name}.csv");
        let path = if self.prefix.is_empty() {
            ObjectPath::from(filename)
        } else {
            ObjectPath::from(format!(
                "{}/{filename}",
                self.prefix.trim_end_matches('/')
            ))
        };

        self.store
            .put(&path, data.into())
            .await
            .map_err(|e| Error::output(format!("Failed to write {path}: {e}")))?;

        let full_path = format!("{}://{path}", self.scheme);
        tracing::info!("Uploaded {table_name}.csv to {full_path}");
        Ok(full_path)
    }
}
