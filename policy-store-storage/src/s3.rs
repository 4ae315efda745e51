//! S3 storage implementation
//!
//! Talks to any S3-compatible service (AWS S3, MinIO, ...) through the AWS SDK.

use async_trait::async_trait;
use aws_sdk_s3::{
    config::{BehaviorVersion, Credentials, Region},
    error::DisplayErrorContext,
    primitives::ByteStream,
    Client,
};

use crate::{ObjectReader, ObjectStorage, StorageError};

const DEFAULT_REGION: &str = "us-east-1";

/// S3 connection configuration
#[derive(Debug, Clone)]
pub struct S3Config {
    /// `host[:port]` of the service, without scheme
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    /// Use HTTPS instead of HTTP
    pub secure: bool,
    pub region: String,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint: "localhost:9000".to_string(),
            access_key: String::new(),
            secret_key: String::new(),
            secure: false,
            region: DEFAULT_REGION.to_string(),
        }
    }
}

impl S3Config {
    /// Full endpoint URL, validating the `host[:port]` form
    pub fn endpoint_url(&self) -> Result<String, StorageError> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(StorageError::ClientInit("endpoint is empty".to_string()));
        }
        if endpoint.contains("://") || endpoint.contains('/') {
            return Err(StorageError::ClientInit(format!(
                "endpoint '{}' must be host[:port] without scheme or path",
                endpoint
            )));
        }

        let host = match endpoint.rsplit_once(':') {
            Some((host, port)) => {
                port.parse::<u16>().map_err(|_| {
                    StorageError::ClientInit(format!("invalid port in endpoint '{}'", endpoint))
                })?;
                host
            }
            None => endpoint,
        };
        if host.is_empty() || host.chars().any(char::is_whitespace) {
            return Err(StorageError::ClientInit(format!(
                "invalid host in endpoint '{}'",
                endpoint
            )));
        }

        let scheme = if self.secure { "https" } else { "http" };
        Ok(format!("{}://{}", scheme, endpoint))
    }
}

/// Object storage backed by an S3-compatible service
pub struct S3ObjectStorage {
    client: Client,
}

impl S3ObjectStorage {
    /// Build a client from the configuration. No request is made.
    pub fn new(config: S3Config) -> Result<Self, StorageError> {
        let endpoint_url = config.endpoint_url()?;
        let region = if config.region.trim().is_empty() {
            DEFAULT_REGION.to_string()
        } else {
            config.region.clone()
        };

        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "policy-store",
        );

        let sdk_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&endpoint_url)
            .region(Region::new(region))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        tracing::info!("Configured S3 client for {}", endpoint_url);

        Ok(Self {
            client: Client::from_conf(sdk_config),
        })
    }

    /// Wrap an already configured SDK client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StorageError> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                let not_found = e.as_service_error().map_or(false, |se| se.is_not_found())
                    || e.raw_response().map(|r| r.status().as_u16()) == Some(404);
                if not_found {
                    Ok(false)
                } else {
                    Err(StorageError::Connection(format!(
                        "Failed to check bucket {}: {}",
                        bucket,
                        DisplayErrorContext(&e)
                    )))
                }
            }
        }
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectReader, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().map_or(false, |se| se.is_no_such_key()) {
                    StorageError::ObjectNotFound(format!("{}/{}", bucket, key))
                } else {
                    StorageError::Read(format!(
                        "Failed to get object {}/{}: {}",
                        bucket,
                        key,
                        DisplayErrorContext(&e)
                    ))
                }
            })?;

        let reader: ObjectReader = Box::pin(output.body.into_async_read());
        Ok(reader)
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), StorageError> {
        let length = body.len();
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_length(length as i64)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                StorageError::Write(format!(
                    "Failed to put object {}/{}: {}",
                    bucket,
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;

        tracing::debug!("Uploaded object {}/{} ({} bytes)", bucket, key, length);
        Ok(())
    }
}
