use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::error::StorageError;

/// Poll interval used while waiting for an upload to become readable.
pub const VISIBILITY_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Key-addressed object storage with public URLs.
///
/// Keys are flat names (`<id>.<ext>`); implementations place them under
/// their configured prefix.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload bytes under `key`, wait until the object is readable and return
    /// its public URL.
    async fn put(&self, key: &str, data: &[u8], content_type: &str)
    -> Result<String, StorageError>;

    /// Check whether an object exists.
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// Delete an object. Deleting a missing object is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Public URL for a key. Does not check existence.
    fn url_for(&self, key: &str) -> String;
}

/// Poll `exists` until the object shows up or `timeout` elapses.
pub async fn wait_until_visible(
    store: &(impl ObjectStore + ?Sized),
    key: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<(), StorageError> {
    let started = Instant::now();
    loop {
        // Transient HEAD failures count as "not yet".
        match store.exists(key).await {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => tracing::debug!(key, error = %e, "Visibility check failed"),
        }

        if started.elapsed() >= timeout {
            return Err(StorageError::VisibilityTimeout {
                key: key.to_string(),
                waited_secs: timeout.as_secs(),
            });
        }
        tokio::time::sleep(interval).await;
    }
}

/// Reject keys that would escape the configured prefix.
pub fn validate_key(key: &str) -> Result<&str, StorageError> {
    if key.is_empty()
        || key == "."
        || key == ".."
        || key.contains('/')
        || key.contains('\\')
        || key.contains('\0')
    {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(key)
}
