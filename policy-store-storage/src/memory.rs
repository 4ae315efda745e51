//! In-memory object storage for development and testing

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::Cursor;

use crate::{ObjectReader, ObjectStorage, StorageError};

/// In-memory buckets of objects
pub struct InMemoryObjectStorage {
    buckets: RwLock<HashMap<String, HashMap<String, Vec<u8>>>>,
}

impl InMemoryObjectStorage {
    pub fn new() -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
        }
    }

    /// Create an empty bucket. Existing buckets are left untouched.
    pub fn create_bucket(&self, bucket: &str) {
        self.buckets.write().entry(bucket.to_string()).or_default();
    }

    /// Raw bytes of an object, if present
    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.buckets
            .read()
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .cloned()
    }

    /// Number of objects stored in a bucket
    pub fn object_count(&self, bucket: &str) -> usize {
        self.buckets.read().get(bucket).map_or(0, HashMap::len)
    }
}

impl Default for InMemoryObjectStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StorageError> {
        Ok(self.buckets.read().contains_key(bucket))
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectReader, StorageError> {
        let buckets = self.buckets.read();
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))?;
        let data = objects
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::ObjectNotFound(format!("{}/{}", bucket, key)))?;

        let reader: ObjectReader = Box::pin(Cursor::new(data));
        Ok(reader)
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), StorageError> {
        let mut buckets = self.buckets.write();
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))?;

        tracing::debug!("Stored object {}/{} ({} bytes)", bucket, key, body.len());
        objects.insert(key.to_string(), body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_bucket_exists() {
        let storage = InMemoryObjectStorage::new();
        assert!(!storage.bucket_exists("casbin-bucket").await.unwrap());

        storage.create_bucket("casbin-bucket");
        assert!(storage.bucket_exists("casbin-bucket").await.unwrap());
    }

    #[tokio::test]
    async fn test_put_and_get_object() {
        let storage = InMemoryObjectStorage::new();
        storage.create_bucket("casbin-bucket");

        storage
            .put_object("casbin-bucket", "policy.csv", b"p, alice, data1, read\n".to_vec())
            .await
            .unwrap();

        let mut reader = storage.get_object("casbin-bucket", "policy.csv").await.unwrap();
        let mut contents = String::new();
        reader.read_to_string(&mut contents).await.unwrap();
        assert_eq!(contents, "p, alice, data1, read\n");
    }

    #[tokio::test]
    async fn test_put_replaces_object() {
        let storage = InMemoryObjectStorage::new();
        storage.create_bucket("casbin-bucket");

        storage
            .put_object("casbin-bucket", "policy.csv", b"old".to_vec())
            .await
            .unwrap();
        storage
            .put_object("casbin-bucket", "policy.csv", Vec::new())
            .await
            .unwrap();

        assert_eq!(storage.object("casbin-bucket", "policy.csv"), Some(Vec::new()));
        assert_eq!(storage.object_count("casbin-bucket"), 1);
    }

    #[tokio::test]
    async fn test_missing_object_and_bucket() {
        let storage = InMemoryObjectStorage::new();
        storage.create_bucket("casbin-bucket");

        let result = storage.get_object("casbin-bucket", "missing.csv").await;
        assert!(matches!(result, Err(StorageError::ObjectNotFound(_))));

        let result = storage.put_object("other-bucket", "policy.csv", Vec::new()).await;
        assert!(matches!(result, Err(StorageError::BucketNotFound(_))));
    }
}
