//! Storage layer for Policy Store
//!
//! Provides the object storage boundary used by the policy adapter.
//! Supports both in-memory (for development and tests) and S3 backends.

pub mod error;
pub mod memory;
pub mod traits;

#[cfg(feature = "s3")]
pub mod s3;

pub use error::StorageError;
pub use memory::InMemoryObjectStorage;
pub use traits::{ObjectReader, ObjectStorage};

#[cfg(feature = "s3")]
pub use s3::{S3Config, S3ObjectStorage};
