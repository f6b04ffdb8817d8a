//! Stock Transaction Model (ledger entry)

use serde::{Deserialize, Serialize};

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

/// Ledger entry: one stock movement against one item
///
/// Append-only. Rows are never updated or deleted; an item's
/// `current_stock` equals the sum of its committed movement deltas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StockTransaction {
    pub id: i64,
    pub item_id: i64,
    pub direction: Direction,
    /// Always positive; the sign comes from `direction`
    pub quantity: i64,
    pub created_at: i64,
    pub remarks: Option<String>,
}

/// Apply-movement payload (POST /api/transactions)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementCreate {
    pub item_id: i64,
    pub direction: Direction,
    pub quantity: i64,
    pub remarks: Option<String>,
}
