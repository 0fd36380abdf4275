use thiserror::Error;

/// Errors that can occur during object storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The object key is not a flat, safe name.
    #[error("invalid object key: {0}")]
    InvalidKey(String),
    /// The upload did not become visible within the configured bound.
    #[error("object {key} not visible after {waited_secs}s")]
    VisibilityTimeout { key: String, waited_secs: u64 },
    /// The backend rejected or failed the request.
    #[error("storage backend error: {0}")]
    Backend(String),
    /// The backend could not be constructed from its configuration.
    #[error("storage configuration error: {0}")]
    Config(String),
    /// An I/O error occurred.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
}
