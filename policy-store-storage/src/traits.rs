//! Storage traits defining the interface to an object storage service

use async_trait::async_trait;
use std::pin::Pin;
use tokio::io::AsyncBufRead;

use crate::StorageError;

/// Buffered byte stream over an object's contents
pub type ObjectReader = Pin<Box<dyn AsyncBufRead + Send>>;

/// Trait for the bucket/object operations the policy adapter needs
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Check whether a bucket exists
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StorageError>;

    /// Open a read stream on an object
    ///
    /// Fails with `StorageError::ObjectNotFound` when the key is absent.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectReader, StorageError>;

    /// Replace the full contents of an object
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), StorageError>;
}
