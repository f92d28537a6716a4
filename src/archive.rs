//! # Archive Uploader
//!
//! Serializes fetched collections to JSON and writes them to object storage. [`ArchiveStore`] is the seam between
//! the uploader and the storage backend; [`BucketStore`] adapts any [`ObjectStore`] that is bound to one bucket, the
//! S3-compatible backend being the one used in production.

use crate::error::{
    Error,
    Result,
};
use object_store::{
    aws::AmazonS3Builder,
    path::Path,
    Attribute,
    Attributes,
    ObjectStore,
    PutOptions,
    PutPayload,
};
use serde_json::Value;
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
};
use unifi_scraper_config::StorageConfig;

const DEFAULT_REGION: &str = "us-east-1";

/// Writes object bytes to `(bucket, key)`.
pub trait ArchiveStore: Send + Sync {
    fn put<'a>(
        &'a self,
        bucket: &'a str,
        key: &'a str,
        bytes: Vec<u8>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// An [`ObjectStore`] holding the objects of a single bucket.
#[derive(Clone, Debug)]
pub struct BucketStore {
    bucket: String,
    store: Arc<dyn ObjectStore>,
}

impl BucketStore {
    pub fn new(bucket: impl Into<String>, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            bucket: bucket.into(),
            store,
        }
    }

    /// Connects to the S3-compatible storage described by `config`.
    pub fn s3(config: &StorageConfig) -> Result<Self> {
        let region = if config.region.is_empty() {
            DEFAULT_REGION
        } else {
            config.region.as_str()
        };

        let mut builder = AmazonS3Builder::new()
            .with_access_key_id(&config.access_key)
            .with_secret_access_key(config.secret_key.expose())
            .with_bucket_name(&config.bucket)
            .with_region(region);

        if !config.endpoint.is_empty() {
            builder = builder.with_endpoint(&config.endpoint);
            if config.endpoint.starts_with("http://") {
                builder = builder.with_allow_http(true);
            }
        }

        let store = builder.build()?;
        debug!(bucket = %config.bucket, endpoint = %config.endpoint, region, "connected object storage");
        Ok(Self::new(config.bucket.clone(), Arc::new(store)))
    }
}

impl ArchiveStore for BucketStore {
    fn put<'a>(
        &'a self,
        bucket: &'a str,
        key: &'a str,
        bytes: Vec<u8>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            if bucket != self.bucket {
                return Err(Error::BucketMismatch {
                    expected: self.bucket.clone(),
                    requested: bucket.to_string(),
                });
            }

            let location = Path::parse(key)?;
            let mut attributes = Attributes::new();
            attributes.insert(Attribute::ContentType, "application/json".into());
            let options = PutOptions {
                attributes,
                ..Default::default()
            };

            self.store
                .put_opts(&location, PutPayload::from(bytes), options)
                .await?;
            Ok(())
        })
    }
}

/// Uploads collections as JSON objects. Storage errors are passed on unchanged.
#[derive(Clone)]
pub struct ArchiveUploader {
    store: Arc<dyn ArchiveStore>,
}

impl ArchiveUploader {
    pub fn new(store: Arc<dyn ArchiveStore>) -> Self {
        Self { store }
    }

    /// Returns the number of bytes written.
    pub async fn upload(&self, collection: &Value, bucket: &str, key: &str) -> Result<usize> {
        let bytes = serde_json::to_vec(collection).map_err(Error::Serialize)?;
        let size = bytes.len();
        self.store.put(bucket, key, bytes).await?;
        debug!(bucket, key, size, "uploaded collection");
        Ok(size)
    }
}
