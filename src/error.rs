//! Error types for the ReadLab server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::library::LibraryError;
use crate::stores::StoreError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("background task failed: {e}"))
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Library(e) => match e {
                LibraryError::InvalidName(_) | LibraryError::Unsupported(_) => {
                    (StatusCode::BAD_REQUEST, "bad_request", e.to_string())
                }
                LibraryError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", e.to_string()),
                LibraryError::AlreadyExists(_) => (StatusCode::CONFLICT, "conflict", e.to_string()),
                LibraryError::OutsideLibrary(_) => (
                    StatusCode::FORBIDDEN,
                    "access_denied",
                    "Path is outside the library".to_string(),
                ),
                LibraryError::Io(_) | LibraryError::Store(_) => {
                    tracing::error!("Library error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "library_error",
                        "Library error".to_string(),
                    )
                }
            },
            AppError::Store(e) => match e {
                StoreError::InvalidRange { .. } => {
                    (StatusCode::BAD_REQUEST, "bad_request", e.to_string())
                }
                _ => {
                    tracing::error!("Store error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "store_error",
                        "Store error".to_string(),
                    )
                }
            },
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "io_error",
                    "IO error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = self.parts();

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}
