//! Bid Models (chandler quotes)

use serde::{Deserialize, Serialize};

/// Bid status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum BidStatus {
    Pending,
    Accepted,
    Rejected,
}

impl BidStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BidStatus::Pending => "pending",
            BidStatus::Accepted => "accepted",
            BidStatus::Rejected => "rejected",
        }
    }
}

/// One chandler's priced response to one order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Bid {
    pub id: i64,
    pub order_id: i64,
    pub chandler_id: i64,
    pub status: BidStatus,
    pub submitted_at: i64,
    pub valid_until: Option<i64>,
    pub notes: Option<String>,
    /// Always the sum of this bid's line totals
    pub total_amount: f64,
}

/// Priced line of a bid, keyed to one order line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BidItem {
    pub id: i64,
    pub bid_id: i64,
    pub order_item_id: i64,
    pub unit_price: f64,
    /// unit_price × order line quantity, computed server-side
    pub total_price: f64,
    /// Availability tag, e.g. "in-stock" or "3-days"
    pub availability: String,
}

/// Bid line in a submit request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidItemCreate {
    pub order_item_id: i64,
    pub unit_price: f64,
    pub availability: String,
}

/// Submit bid payload — bid plus its lines in one request.
/// Must carry exactly one line per order line of the parent order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidCreate {
    pub order_id: i64,
    pub chandler_id: i64,
    pub valid_until: Option<i64>,
    pub notes: Option<String>,
    pub items: Vec<BidItemCreate>,
}

/// Update bid payload
///
/// A patch to `accepted` awards the parent order to this bid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BidUpdate {
    pub status: Option<BidStatus>,
    pub valid_until: Option<i64>,
    pub notes: Option<String>,
}

/// Bid with its lines (assembled into order detail responses)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidWithItems {
    #[serde(flatten)]
    pub bid: Bid,
    pub items: Vec<BidItem>,
}
