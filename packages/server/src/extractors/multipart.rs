use axum_typed_multipart::BaseMultipart;

use crate::error::AppError;

/// Typed multipart extractor whose rejections are rendered as `AppError`,
/// so malformed forms get the same JSON envelope as every other failure.
pub type AppMultipart<T> = BaseMultipart<T, AppError>;
