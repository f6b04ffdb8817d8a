//! Unified error handling
//!
//! Provides the application-level error type and response structures:
//! - [`AppError`] - application error enum
//! - [`AppResponse`] - error payload written to the wire
//!
//! Database and internal failures are logged via tracing; the response
//! body only ever carries a generic message for those.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use shared::{ErrorCode, FieldError};
use tracing::error;

use crate::db::repository::RepoError;
use crate::ledger::LedgerError;

/// Error payload for API responses
///
/// ```json
/// {
///   "code": 2,
///   "message": "Validation failed",
///   "errors": [{ "field": "quantity", "message": "must be at least 1" }]
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Business Logic Errors ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Business rule violation: {0}")]
    BusinessRule(ErrorCode, String),

    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i64, requested: i64 },

    // ========== System Errors ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, errors) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg, None),

            AppError::Conflict(msg) => (StatusCode::CONFLICT, ErrorCode::AlreadyExists, msg, None),

            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::ValidationFailed,
                "Validation failed".to_string(),
                Some(errors),
            ),

            AppError::BusinessRule(code, msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, code, msg, None)
            }

            AppError::InsufficientStock {
                available,
                requested,
            } => (
                StatusCode::CONFLICT,
                ErrorCode::InsufficientStock,
                format!("Insufficient stock: {available} available, {requested} requested"),
                None,
            ),

            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DatabaseError,
                    "Database error".to_string(),
                    None,
                )
            }

            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalError,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(AppResponse {
            code,
            message,
            errors,
        });

        (status, body).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Single-field validation failure
    pub fn validation(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, msg)])
    }

    pub fn business(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self::BusinessRule(code, msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

// ========== Conversions from layer error types ==========

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::validation("request", msg),
            RepoError::Business(code, msg) => AppError::BusinessRule(code, msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::ItemNotFound(id) => AppError::not_found(format!("Item {id} not found")),
            LedgerError::InsufficientStock {
                available,
                requested,
            } => AppError::InsufficientStock {
                available,
                requested,
            },
            LedgerError::Validation(field, msg) => AppError::validation(field, msg),
            LedgerError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for API handlers
pub type AppResult<T> = Result<T, AppError>;
