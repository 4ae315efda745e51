//! Policy adapter over a single stored object

use async_trait::async_trait;
use policy_store_core::{encode_model, CsvLineCodec, LineCodec, LineDecoder, PolicyModel, Rule};
use policy_store_storage::{ObjectStorage, S3ObjectStorage};
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tokio_stream::{wrappers::LinesStream, StreamExt};

use crate::{AdapterConfig, AdapterError};

const INCREMENTAL_UNSUPPORTED: &str = "incremental auto-save is not implemented";

/// Persistence contract used by the policy engine
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Load every stored rule into `model`
    async fn load_policy(&self, model: &mut PolicyModel) -> Result<(), AdapterError>;

    /// Replace the stored rules with the contents of `model`
    async fn save_policy(&self, model: &PolicyModel) -> Result<(), AdapterError>;

    /// Persist a single added rule
    async fn add_policy(
        &self,
        section: &str,
        rule_type: &str,
        rule: Rule,
    ) -> Result<(), AdapterError>;

    /// Persist a single removed rule
    async fn remove_policy(
        &self,
        section: &str,
        rule_type: &str,
        rule: Rule,
    ) -> Result<(), AdapterError>;

    /// Persist the removal of every rule matching a field filter
    async fn remove_filtered_policy(
        &self,
        section: &str,
        rule_type: &str,
        field_index: usize,
        field_values: Vec<String>,
    ) -> Result<(), AdapterError>;
}

/// Adapter bound to one (bucket, object key) pair.
///
/// Holds no mutable state; a single instance can serve concurrent calls.
pub struct PolicyStorageAdapter {
    storage: Arc<dyn ObjectStorage>,
    codec: Arc<dyn LineCodec>,
    bucket: String,
    object_key: String,
}

impl PolicyStorageAdapter {
    /// Build an S3 client from `config` and check that the bucket exists
    pub async fn connect(config: AdapterConfig) -> Result<Self, AdapterError> {
        let storage = S3ObjectStorage::new(config.s3_config())?;
        Self::with_storage(Arc::new(storage), config.bucket, config.object_key).await
    }

    /// Bind to an existing storage backend and check that the bucket exists
    pub async fn with_storage(
        storage: Arc<dyn ObjectStorage>,
        bucket: impl Into<String>,
        object_key: impl Into<String>,
    ) -> Result<Self, AdapterError> {
        let bucket = bucket.into();
        let object_key = object_key.into();
        if bucket.trim().is_empty() {
            return Err(AdapterError::ClientInit("bucket name is empty".to_string()));
        }
        if object_key.trim().is_empty() {
            return Err(AdapterError::ClientInit("object key is empty".to_string()));
        }

        let exists = storage
            .bucket_exists(&bucket)
            .await
            .map_err(|e| AdapterError::StorageUnavailable(e.to_string()))?;
        if !exists {
            return Err(AdapterError::BucketNotFound(bucket));
        }

        tracing::info!("Policy adapter bound to {}/{}", bucket, object_key);

        Ok(Self {
            storage,
            codec: Arc::new(CsvLineCodec::new()),
            bucket,
            object_key,
        })
    }

    /// Replace the line codec
    pub fn with_codec(mut self, codec: Arc<dyn LineCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn object_key(&self) -> &str {
        &self.object_key
    }
}

#[async_trait]
impl Adapter for PolicyStorageAdapter {
    /// Rules are staged in a scratch model and merged into `model` only once
    /// the whole object has been read, so a failed load leaves it untouched.
    async fn load_policy(&self, model: &mut PolicyModel) -> Result<(), AdapterError> {
        let reader = self.storage.get_object(&self.bucket, &self.object_key).await?;
        let mut lines = LinesStream::new(reader.lines());

        let mut staged = PolicyModel::new();
        let mut line_count = 0usize;
        while let Some(line) = lines.next().await {
            let line = line.map_err(|e| {
                AdapterError::StorageRead(format!(
                    "Failed to read {}/{} after {} lines: {}",
                    self.bucket, self.object_key, line_count, e
                ))
            })?;
            self.codec.decode_line(line.trim(), &mut staged);
            line_count += 1;
        }

        let rule_count = staged.rule_count();
        model.merge(staged);

        tracing::info!(
            "Loaded {} rules ({} lines) from {}/{}",
            rule_count,
            line_count,
            self.bucket,
            self.object_key
        );
        Ok(())
    }

    async fn save_policy(&self, model: &PolicyModel) -> Result<(), AdapterError> {
        let body = encode_model(self.codec.as_ref(), model)?;
        let length = body.len();

        self.storage
            .put_object(&self.bucket, &self.object_key, body.into_bytes())
            .await?;

        tracing::info!(
            "Saved {} rules ({} bytes) to {}/{}",
            model.rule_count(),
            length,
            self.bucket,
            self.object_key
        );
        Ok(())
    }

    async fn add_policy(
        &self,
        _section: &str,
        _rule_type: &str,
        _rule: Rule,
    ) -> Result<(), AdapterError> {
        Err(AdapterError::Unsupported(INCREMENTAL_UNSUPPORTED))
    }

    async fn remove_policy(
        &self,
        _section: &str,
        _rule_type: &str,
        _rule: Rule,
    ) -> Result<(), AdapterError> {
        Err(AdapterError::Unsupported(INCREMENTAL_UNSUPPORTED))
    }

    async fn remove_filtered_policy(
        &self,
        _section: &str,
        _rule_type: &str,
        _field_index: usize,
        _field_values: Vec<String>,
    ) -> Result<(), AdapterError> {
        Err(AdapterError::Unsupported(INCREMENTAL_UNSUPPORTED))
    }
}
