use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::traits::{ObjectStore, validate_key};

/// Filesystem-backed object store for local development and tests.
///
/// Objects live at `{root}/{prefix}/{key}` and are served from
/// `{public_url_base}/{prefix}/{key}` by whatever fronts the directory.
pub struct FilesystemObjectStore {
    root: PathBuf,
    prefix: String,
    public_url_base: String,
}

impl FilesystemObjectStore {
    /// Create a new filesystem object store, creating its directories.
    pub async fn new(
        root: PathBuf,
        prefix: impl Into<String>,
        public_url_base: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let prefix = prefix.into();
        fs::create_dir_all(root.join(&prefix)).await?;
        fs::create_dir_all(root.join(".tmp")).await?;
        Ok(Self {
            root,
            prefix,
            public_url_base: public_url_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        Ok(self.root.join(&self.prefix).join(validate_key(key)?))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.root
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    async fn put(
        &self,
        key: &str,
        data: &[u8],
        _content_type: &str,
    ) -> Result<String, StorageError> {
        let object_path = self.object_path(key)?;

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, &object_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(self.url_for(key))
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(fs::try_exists(self.object_path(key)?).await?)
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.object_path(key)?).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_url_base, self.prefix, key)
    }
}
