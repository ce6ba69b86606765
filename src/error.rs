// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

/// API error with appropriate status codes and client-safe messages.
///
/// Every handler returns `Result<_, ApiError>`; the `IntoResponse` impl
/// renders the shared `{"error": {"message", "code", "details"?}}` body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("{message}")]
    Validation {
        message: String,
        details: HashMap<String, String>,
    },
    #[error("Slug already exists")]
    SlugExists,
    #[error("{0}")]
    InvalidPassword(String),
    #[error("{message}")]
    Upload {
        message: String,
        code: &'static str,
    },

    // 401 Unauthorized
    #[error("{0}")]
    Unauthorized(String),
    #[error("Invalid credentials")]
    InvalidCredentials,

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 500 Internal Server Error (generic message, detail logged server-side)
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::SlugExists => StatusCode::BAD_REQUEST,
            ApiError::InvalidPassword(_) => StatusCode::BAD_REQUEST,
            ApiError::Upload { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::SlugExists => "SLUG_EXISTS",
            ApiError::InvalidPassword(_) => "INVALID_PASSWORD",
            ApiError::Upload { code, .. } => code,
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Client-safe error message. Internal detail is never echoed.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation { message, .. } => message,
            ApiError::SlugExists => "Slug already exists",
            ApiError::InvalidPassword(msg) => msg,
            ApiError::Upload { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::InvalidCredentials => "Invalid credentials",
            ApiError::NotFound(msg) => msg,
            ApiError::Internal(_) => "Internal server error",
        }
    }

    pub fn to_json(&self) -> Value {
        let mut error = json!({
            "message": self.message(),
            "code": self.error_code(),
        });

        if let ApiError::Validation { details, .. } = self {
            if !details.is_empty() {
                error["details"] = json!(details);
            }
        }

        json!({ "error": error })
    }
}

// Constructor helpers
impl ApiError {
    pub fn validation(message: impl Into<String>, details: HashMap<String, String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn invalid_password(message: impl Into<String>) -> Self {
        ApiError::InvalidPassword(message.into())
    }

    pub fn upload(message: impl Into<String>, code: &'static str) -> Self {
        ApiError::Upload {
            message: message.into(),
            code,
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        ApiError::Internal(detail.into())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        // Log the real error but return a generic message
        tracing::error!("database error: {}", err);
        ApiError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("io error: {}", err);
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
