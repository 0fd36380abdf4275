use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Envelope returned by every `/api` endpoint, on success and on failure.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// `true` on success.
    pub status: bool,
    /// HTTP status code, repeated in the body.
    #[schema(example = 200)]
    pub status_code: u16,
    #[schema(example = "Movie fetched successfully")]
    pub message: String,
    /// Payload, `null` when the operation returns nothing.
    pub data: Option<T>,
}

/// Placeholder payload type for responses whose `data` is always `null`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Empty {}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: true,
            status_code: StatusCode::OK.as_u16(),
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: false,
            status_code: status.as_u16(),
            message: message.into(),
            data: None,
        }
    }
}

impl ApiResponse<Empty> {
    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self {
            status: true,
            status_code: StatusCode::OK.as_u16(),
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
