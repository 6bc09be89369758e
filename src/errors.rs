//! Centralized error handling.
//!
//! Every fallible operation returns [`AppResult`]. Raw store errors are
//! classified here, and only here, into an [`ErrorKind`] that decides the
//! HTTP status and the `{status, message, meta}` envelope sent to clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Invalid email or password")]
    InvalidCredentials,

    // Resource errors
    #[error("{0}")]
    NotFound(String),

    /// Unique constraint violation on `field`
    #[error("Unique constraint violation")]
    Conflict { field: String },

    // Validation
    #[error("{message}")]
    Validation {
        message: String,
        meta: Option<Value>,
    },

    // External service errors
    #[error("Database error")]
    Database(#[from] DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Client-facing classification of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ValidationFailure,
    Unauthenticated,
    Forbidden,
    NotFound,
    Conflict,
    InternalStoreFailure,
}

impl ErrorKind {
    /// HTTP status for this kind
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::ValidationFailure => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::InternalStoreFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error envelope returned to clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl AppError {
    /// Classify this error. Store errors are inspected for constraint
    /// violations and missing records; everything else keeps its own kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation { .. } => ErrorKind::ValidationFailure,
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::Jwt(_) => {
                ErrorKind::Unauthenticated
            }
            AppError::Forbidden => ErrorKind::Forbidden,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Conflict { .. } => ErrorKind::Conflict,
            AppError::Database(e) => classify_db_error(e),
            AppError::Internal(_) => ErrorKind::InternalStoreFailure,
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        self.kind().status()
    }

    /// Build the client envelope. Internal details are logged, never returned.
    pub fn to_response_body(&self) -> ErrorResponse {
        let kind = self.kind();
        let status = if kind.status().is_server_error() {
            "error"
        } else {
            "fail"
        };

        let (message, meta) = match self {
            AppError::Validation { message, meta } => (message.clone(), meta.clone()),
            AppError::Conflict { field } => (
                self.to_string(),
                Some(json!({ "target": [field] })),
            ),
            AppError::Database(e) => match kind {
                ErrorKind::Conflict => (
                    "Unique constraint violation".to_string(),
                    Some(json!({ "target": [unique_violation_target(e)] })),
                ),
                ErrorKind::NotFound => ("Record not found".to_string(), None),
                _ => {
                    tracing::error!("Database error: {:?}", e);
                    ("Internal server error".to_string(), None)
                }
            },
            AppError::Jwt(e) => {
                tracing::debug!("JWT rejected: {:?}", e);
                ("Invalid or expired token".to_string(), None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal server error".to_string(), None)
            }
            _ => (self.to_string(), None),
        };

        ErrorResponse {
            status,
            message,
            meta,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_response_body())).into_response()
    }
}

fn classify_db_error(err: &DbErr) -> ErrorKind {
    match err {
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => ErrorKind::NotFound,
        _ => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ErrorKind::Conflict,
            _ => ErrorKind::InternalStoreFailure,
        },
    }
}

/// Unique constraints whose column name differs from the `{table}_{column}_key` default.
const UNIQUE_CONSTRAINT_FIELDS: &[(&str, &str)] = &[
    ("users_email_key", "email"),
    ("categories_name_key", "name"),
];

/// Column behind a unique violation, for `meta.target`.
fn unique_violation_target(err: &DbErr) -> String {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => violated_field(&detail),
        _ => "unknown".to_string(),
    }
}

/// Map a driver message such as
/// `duplicate key value violates unique constraint "users_email_key"` to `email`.
fn violated_field(detail: &str) -> String {
    let constraint = detail.split('"').nth(1).unwrap_or(detail);

    UNIQUE_CONSTRAINT_FIELDS
        .iter()
        .find(|(name, _)| *name == constraint)
        .map(|(_, field)| field.to_string())
        .unwrap_or_else(|| constraint.strip_suffix("_key").unwrap_or(constraint).to_string())
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(entity))
    }
}

/// Convenience constructors
impl AppError {
    /// `"{entity} not found"`
    pub fn not_found(entity: &str) -> Self {
        AppError::NotFound(format!("{} not found", entity))
    }

    pub fn conflict(field: impl Into<String>) -> Self {
        AppError::Conflict {
            field: field.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation {
            message: msg.into(),
            meta: None,
        }
    }

    pub fn validation_with_meta(msg: impl Into<String>, meta: Value) -> Self {
        AppError::Validation {
            message: msg.into(),
            meta: Some(meta),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
