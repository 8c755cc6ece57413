use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

/// Everything that can go wrong while accepting an upload.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No file uploaded")]
    NoFile,

    #[error("Only .txt files are allowed")]
    NotPlainText,

    #[error("File content is not plain text (detected {0})")]
    BinaryContent(String),

    #[error("Unexpected field")]
    UnexpectedField,

    #[error("{0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Failed to store file: {0}")]
    Storage(#[from] std::io::Error),
}

/// Every upload failure is a client-facing 400 carrying the message verbatim.
impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        if let UploadError::Storage(e) = &err {
            tracing::error!("Upload storage failure: {}", e);
        }
        AppError::BadRequest(err.to_string())
    }
}
