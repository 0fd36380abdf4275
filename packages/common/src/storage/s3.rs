//! S3-backed object store.
//!
//! Uploads are followed by a `HEAD` poll so callers only get a URL once the
//! object is readable.

use std::time::Duration;

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, Region};

use super::error::StorageError;
use super::traits::{ObjectStore, VISIBILITY_POLL_INTERVAL, validate_key, wait_until_visible};

/// Connection settings for [`S3ObjectStore`].
#[derive(Clone, Debug)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Key prefix for every object, without slashes (e.g. `images`).
    pub prefix: String,
    /// Custom endpoint (MinIO, R2, ...). Enables path-style addressing.
    pub endpoint: Option<String>,
    /// Static credentials; set both or neither.
    ///
    /// When both are absent, rust-s3 resolves credentials itself from the
    /// `AWS_*` environment variables, then the `AWS_PROFILE` entry of
    /// `~/.aws/credentials`, then the instance metadata service. This chain is
    /// separate from the `aws-config` one that Bedrock and Secrets Manager use;
    /// SSO sessions and `credential_process` profiles do not reach S3.
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    /// Overrides the `https://{bucket}.s3.{region}.amazonaws.com` URL base.
    pub public_url_base: Option<String>,
    pub visibility_timeout: Duration,
}

pub struct S3ObjectStore {
    bucket: Box<Bucket>,
    prefix: String,
    public_url_base: String,
    visibility_timeout: Duration,
}

impl S3ObjectStore {
    pub fn new(config: S3Config) -> Result<Self, StorageError> {
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config.region.parse().map_err(|e| {
                StorageError::Config(format!("invalid region '{}': {e}", config.region))
            })?,
        };

        if config.access_key.is_some() != config.secret_key.is_some() {
            return Err(StorageError::Config(
                "access_key and secret_key must be set together".into(),
            ));
        }
        let credentials = Credentials::new(
            config.access_key.as_deref(),
            config.secret_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Config(format!("failed to resolve S3 credentials: {e}")))?;

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| StorageError::Config(e.to_string()))?;
        if config.endpoint.is_some() {
            bucket = bucket.with_path_style();
        }

        let public_url_base = config
            .public_url_base
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| {
                format!("https://{}.s3.{}.amazonaws.com", config.bucket, config.region)
            });

        Ok(Self {
            bucket,
            prefix: config.prefix.trim_matches('/').to_string(),
            public_url_base,
            visibility_timeout: config.visibility_timeout,
        })
    }

    /// Build the full S3 key from the flat object key.
    fn full_key(&self, key: &str) -> Result<String, StorageError> {
        let key = validate_key(key)?;
        Ok(format!("{}/{}", self.prefix, key))
    }
}

fn is_success(code: u16) -> bool {
    (200..300).contains(&code)
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String, StorageError> {
        let path = self.full_key(key)?;

        let response = self
            .bucket
            .put_object_with_content_type(&path, data, content_type)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        if !is_success(response.status_code()) {
            return Err(StorageError::Backend(format!(
                "PUT {path} returned HTTP {}",
                response.status_code()
            )));
        }

        wait_until_visible(self, key, self.visibility_timeout, VISIBILITY_POLL_INTERVAL).await?;

        Ok(self.url_for(key))
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.full_key(key)?;
        match self.bucket.head_object(&path).await {
            Ok((_, code)) if is_success(code) => Ok(true),
            Ok((_, 404)) | Err(S3Error::HttpFailWithBody(404, _)) => Ok(false),
            Ok((_, code)) => Err(StorageError::Backend(format!(
                "HEAD {path} returned HTTP {code}"
            ))),
            Err(e) => Err(StorageError::Backend(e.to_string())),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.full_key(key)?;
        match self.bucket.delete_object(&path).await {
            Ok(response) if is_success(response.status_code()) || response.status_code() == 404 => {
                Ok(())
            }
            Ok(response) => Err(StorageError::Backend(format!(
                "DELETE {path} returned HTTP {}",
                response.status_code()
            ))),
            Err(S3Error::HttpFailWithBody(404, _)) => Ok(()),
            Err(e) => Err(StorageError::Backend(e.to_string())),
        }
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_url_base, self.prefix, key)
    }
}
