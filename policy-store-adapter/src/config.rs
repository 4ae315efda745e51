//! Adapter configuration

use policy_store_storage::S3Config;

/// Connection parameters plus the (bucket, object) the adapter is bound to
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// `host[:port]` of the object storage service
    pub endpoint: String,
    /// Access key identifying the account
    pub access_key: String,
    /// Secret key of the account
    pub secret_key: String,
    /// Use HTTPS
    pub secure: bool,
    pub region: String,
    /// Bucket holding the policy object
    pub bucket: String,
    /// Key of the object containing the policy
    pub object_key: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            endpoint: "localhost:9000".to_string(),
            access_key: String::new(),
            secret_key: String::new(),
            secure: false,
            region: "us-east-1".to_string(),
            bucket: "casbin-bucket".to_string(),
            object_key: "policy.csv".to_string(),
        }
    }
}

impl AdapterConfig {
    pub fn new(
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        secure: bool,
        bucket: impl Into<String>,
        object_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            secure,
            bucket: bucket.into(),
            object_key: object_key.into(),
            ..Self::default()
        }
    }

    /// Connection part of the configuration
    pub fn s3_config(&self) -> S3Config {
        S3Config {
            endpoint: self.endpoint.clone(),
            access_key: self.access_key.clone(),
            secret_key: self.secret_key.clone(),
            secure: self.secure,
            region: self.region.clone(),
        }
    }
}
