//! S3-backed persistence adapter for access-control policies
//!
//! Loads a policy model from a single object in a bucket and writes the
//! whole model back as a replacement of that object.

pub mod adapter;
pub mod config;
pub mod error;

pub use adapter::{Adapter, PolicyStorageAdapter};
pub use config::AdapterConfig;
pub use error::AdapterError;
