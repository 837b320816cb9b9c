use crate::paths::PathError;
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Errors returned by the web handlers, rendered as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Failed to upload file: {0}")]
    Upload(String),

    #[error("Missing file field")]
    MissingFile,

    #[error("File too large")]
    TooLarge,

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("File not found")]
    NotFound,

    #[error("Failed to read CSV: {0:#}")]
    ReadCsv(anyhow::Error),

    #[error("{0:#}")]
    Internal(anyhow::Error),
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::TooLarge
        } else {
            ApiError::Upload(err.body_text())
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Upload(_) | ApiError::MissingFile | ApiError::Path(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ReadCsv(_) => StatusCode::BAD_REQUEST,
            ApiError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(e) => {
                error!("Internal error: {e:#}");
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Helper type for handler results
pub type ApiResult<T> = Result<T, ApiError>;
