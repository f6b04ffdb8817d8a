//! Shared types for the ShipStores inventory system
//!
//! Common types used across crates: entity models, error codes,
//! and id/time utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ErrorCode, FieldError};
pub use serde::{Deserialize, Serialize};
