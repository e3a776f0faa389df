//! Domain error types for the file item server.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid input data or malformed resource reference
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Request body exceeded the configured upload limit
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Reading or writing stored files failed
    #[error("File system error: {0}")]
    FileSystem(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::FileSystem(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, response_message) = match self {
            AppError::NotFound(_) => ("NOT_FOUND", self.to_string()),
            AppError::InvalidInput(_) => ("INVALID_INPUT", self.to_string()),
            AppError::PayloadTooLarge(_) => ("PAYLOAD_TOO_LARGE", self.to_string()),
            AppError::FileSystem(err_str) => {
                tracing::error!("File system error: {}", err_str);
                (
                    "FILE_SYSTEM_ERROR",
                    "An internal storage error occurred".to_string(),
                )
            }
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error_code.to_string(),
            message: response_message,
        })
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileSystem(err.to_string())
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        AppError::InvalidInput(format!("Multipart error: {}", err))
    }
}
