use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_typed_multipart::TypedMultipartError;
use common::storage::StorageError;
use sea_orm::DbErr;
use thiserror::Error;

use crate::generation::GenerationError;
use crate::models::shared::{ApiResponse, Empty};

/// Application-level error type.
///
/// Every variant is rendered as the standard envelope with HTTP 400; the
/// variant only decides how loudly the failure is logged.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Store(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("{0}")]
    Upload(#[from] StorageError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn log(&self) {
        match self {
            AppError::Store(detail) => tracing::error!("Store error: {detail}"),
            AppError::Generation(e) => tracing::error!(error = %e, "Summary generation failed"),
            AppError::Upload(e) => tracing::error!(error = %e, "Cover upload failed"),
            AppError::Validation(_) | AppError::NotFound(_) | AppError::Conflict(_) => {
                tracing::debug!(error = %self, "Request rejected")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        ApiResponse::<Empty>::failure(self.status_code(), self.to_string()).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Store(err.to_string())
    }
}

impl From<TypedMultipartError> for AppError {
    fn from(err: TypedMultipartError) -> Self {
        AppError::Validation(err.to_string())
    }
}
