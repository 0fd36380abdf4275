use async_trait::async_trait;
use aws_sdk_secretsmanager::Client;

use super::{SecretError, SecretProvider, extract_key};

/// AWS Secrets Manager backed [`SecretProvider`].
pub struct AwsSecretsManager {
    client: Client,
}

impl AwsSecretsManager {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl SecretProvider for AwsSecretsManager {
    async fn get_secret_value(&self, secret_id: &str, key: &str) -> Result<String, SecretError> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| SecretError::Backend(e.to_string()))?;

        let secret_string = output
            .secret_string()
            .ok_or_else(|| SecretError::NotAString(secret_id.to_string()))?;

        extract_key(secret_id, secret_string, key)
    }
}
