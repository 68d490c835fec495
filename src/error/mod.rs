use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::prompt::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) | StoreError::TemplateNotFound { .. } => {
                AppError::NotFound(err.to_string())
            }
            StoreError::InvalidName(_) | StoreError::Validation(_) | StoreError::Render(_) => {
                AppError::Validation(err.to_string())
            }
            StoreError::Corrupt { .. } | StoreError::Io { .. } | StoreError::Serialization { .. } => {
                AppError::Storage(err.to_string())
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, client_message, log_message) = match &self {
            AppError::Auth(msg) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                msg.clone(),
                msg.clone(),
            ),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                msg.clone(),
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
                msg.clone(),
            ),
            AppError::Storage(e) => {
                let log_msg = e.clone();
                let client_msg = if is_production() {
                    "Storage unavailable".to_string()
                } else {
                    log_msg.clone()
                };
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", client_msg, log_msg)
            }
        };

        // Server faults log at error level, rejected requests at warn
        if status.is_server_error() {
            tracing::error!(
                code = %code,
                status = %status.as_u16(),
                message = %log_message,
                "API error"
            );
        } else {
            tracing::warn!(
                code = %code,
                status = %status.as_u16(),
                message = %log_message,
                "API request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: client_message,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_store_error_mapping() {
        assert!(matches!(
            AppError::from(StoreError::NotFound("x".to_string())),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(StoreError::InvalidName("bad".to_string())),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from(StoreError::Corrupt {
                name: "x".to_string(),
                reason: "eof".to_string()
            }),
            AppError::Storage(_)
        ));
        assert!(matches!(
            AppError::from(StoreError::Io {
                path: PathBuf::from("prompts/x.json"),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            }),
            AppError::Storage(_)
        ));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Auth("no".to_string()), StatusCode::UNAUTHORIZED),
            (AppError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
            (AppError::Validation("x".to_string()), StatusCode::BAD_REQUEST),
            (AppError::Storage("x".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
