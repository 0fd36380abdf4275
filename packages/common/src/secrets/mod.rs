//! Named credential lookup.

#[cfg(feature = "aws-secrets")]
pub mod aws;

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("secret store request failed: {0}")]
    Backend(String),

    #[error("secret '{0}' has no string value")]
    NotAString(String),

    #[error("secret '{0}' is not a JSON object of strings: {1}")]
    Malformed(String, #[source] serde_json::Error),

    #[error("secret '{secret_id}' has no key '{key}'")]
    MissingKey { secret_id: String, key: String },
}

/// Resolves one value out of a key/value secret.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    async fn get_secret_value(&self, secret_id: &str, key: &str) -> Result<String, SecretError>;
}

/// Pick `key` out of a secret stored as a flat JSON object.
pub fn extract_key(secret_id: &str, secret_string: &str, key: &str) -> Result<String, SecretError> {
    let mut values: HashMap<String, String> = serde_json::from_str(secret_string)
        .map_err(|e| SecretError::Malformed(secret_id.to_string(), e))?;
    values.remove(key).ok_or_else(|| SecretError::MissingKey {
        secret_id: secret_id.to_string(),
        key: key.to_string(),
    })
}
