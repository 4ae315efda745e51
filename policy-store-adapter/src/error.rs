//! Adapter error types

use policy_store_core::CoreError;
use policy_store_storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Client initialization failed: {0}")]
    ClientInit(String),

    #[error("Bucket {0} doesn't exist")]
    BucketNotFound(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Storage read error: {0}")]
    StorageRead(String),

    #[error("Storage write error: {0}")]
    StorageWrite(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] CoreError),

    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),
}

impl From<StorageError> for AdapterError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ClientInit(msg) => AdapterError::ClientInit(msg),
            StorageError::BucketNotFound(msg) => AdapterError::BucketNotFound(msg),
            StorageError::ObjectNotFound(msg) => AdapterError::ObjectNotFound(msg),
            StorageError::Connection(msg) => AdapterError::StorageUnavailable(msg),
            StorageError::Read(msg) => AdapterError::StorageRead(msg),
            StorageError::Write(msg) => AdapterError::StorageWrite(msg),
        }
    }
}
