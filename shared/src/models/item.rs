//! Item Model

use serde::{Deserialize, Serialize};

/// Stock item entity
///
/// `current_stock` is owned by the ledger engine: the only mutation paths
/// are stock movements and item creation. Direct patches deliberately
/// exclude it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Item {
    pub id: i64,
    pub name: String,
    /// Free-form category tag ("Provisions", "Engine Stores", ...)
    pub category: String,
    /// Unit of measure ("kg", "pcs", "ltr", ...)
    pub unit: String,
    pub current_stock: i64,
    pub minimum_stock: i64,
    /// On-board storage location
    pub location: String,
    pub description: Option<String>,
    /// Refreshed on every mutation, including ledger movements
    pub last_updated: i64,
}

/// Create item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCreate {
    pub name: String,
    pub category: String,
    pub unit: String,
    /// Opening stock; defaults to 0
    pub current_stock: Option<i64>,
    /// Low-stock threshold; defaults to 0
    pub minimum_stock: Option<i64>,
    pub location: String,
    pub description: Option<String>,
}

/// Update item payload (partial patch; stock is ledger-only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub minimum_stock: Option<i64>,
    pub location: Option<String>,
    pub description: Option<String>,
}
