//! Unified error codes for the ShipStores system
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Stock / ledger errors
//! - 5xxx: Order / bid errors
//! - 6xxx: Invoice errors
//! - 8xxx: User errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 4xxx: Stock ====================
    /// Item not found
    ItemNotFound = 4001,
    /// Movement would drive stock below zero
    InsufficientStock = 4002,
    /// Item is referenced by ledger entries or order lines
    ItemInUse = 4003,

    // ==================== 5xxx: Orders / Bids ====================
    /// Order not found
    OrderNotFound = 5001,
    /// Illegal order status transition
    InvalidTransition = 5002,
    /// Bid does not cover the order's items
    BidIncomplete = 5003,
    /// Bid not found
    BidNotFound = 5004,

    // ==================== 6xxx: Invoices ====================
    /// Invoice not found
    InvoiceNotFound = 6001,
    /// Paid amount outside [0, total]
    InvalidPaidAmount = 6002,

    // ==================== 8xxx: Users ====================
    /// User not found
    UserNotFound = 8001,
    /// Username already taken
    UsernameTaken = 8002,
    /// User is referenced by purchase orders
    UserInUse = 8003,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
    /// Internal server error
    InternalError = 9001,
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::AlreadyExists),
            5 => Ok(Self::InvalidRequest),
            4001 => Ok(Self::ItemNotFound),
            4002 => Ok(Self::InsufficientStock),
            4003 => Ok(Self::ItemInUse),
            5001 => Ok(Self::OrderNotFound),
            5002 => Ok(Self::InvalidTransition),
            5003 => Ok(Self::BidIncomplete),
            5004 => Ok(Self::BidNotFound),
            6001 => Ok(Self::InvoiceNotFound),
            6002 => Ok(Self::InvalidPaidAmount),
            8001 => Ok(Self::UserNotFound),
            8002 => Ok(Self::UsernameTaken),
            8003 => Ok(Self::UserInUse),
            9001 => Ok(Self::InternalError),
            9002 => Ok(Self::DatabaseError),
            other => Err(format!("Unknown error code: {other}")),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", *self as u16)
    }
}

/// A single field-level validation failure.
///
/// Mutating endpoints collect these and reply 400 with the full list,
/// so the UI can mark every offending form field at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
