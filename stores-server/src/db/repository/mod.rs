//! Repository Module
//!
//! Typed CRUD access to each table, as free functions over the shared
//! `SqlitePool`. No business rules live here beyond column constraints;
//! multi-step operations (ledger movements, order creation, awards)
//! belong to the `ledger` and `procurement` modules.

pub mod bid;
pub mod chandler;
pub mod invoice;
pub mod item;
pub mod order;
pub mod stock_transaction;
pub mod user;

use shared::ErrorCode;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Business rule: {1}")]
    Business(ErrorCode, String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
