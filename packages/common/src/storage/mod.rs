mod error;
mod traits;

pub mod filesystem;
#[cfg(feature = "object-storage")]
pub mod s3;

pub use error::StorageError;
pub use traits::{ObjectStore, VISIBILITY_POLL_INTERVAL, validate_key, wait_until_visible};
