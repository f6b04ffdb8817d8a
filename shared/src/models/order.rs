//! Purchase Order Models

use super::bid::BidWithItems;
use serde::{Deserialize, Serialize};

/// Order lifecycle status
///
/// Legal transitions:
/// `pending-quotes → quotes-received → approved → delivered`, with
/// `cancelled` reachable from the two pre-approval states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "kebab-case"))]
pub enum OrderStatus {
    PendingQuotes,
    QuotesReceived,
    Approved,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::PendingQuotes => "pending-quotes",
            OrderStatus::QuotesReceived => "quotes-received",
            OrderStatus::Approved => "approved",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

/// Purchase order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// Human-readable number, `ORD-<year>-<seq:03>`
    pub order_no: String,
    pub status: OrderStatus,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub required_date: Option<i64>,
    pub notes: Option<String>,
    /// Set when a bid is accepted
    pub selected_chandler_id: Option<i64>,
    /// Derived from the accepted bid's total
    pub total_amount: Option<f64>,
}

/// One requested line of a purchase order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub item_id: i64,
    pub quantity: i64,
    pub unit: String,
}

/// Order line in a create request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemCreate {
    pub item_id: i64,
    pub quantity: i64,
    pub unit: String,
}

/// Create order payload — order plus its lines in one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub created_by: Option<i64>,
    pub required_date: Option<i64>,
    pub notes: Option<String>,
    pub items: Vec<OrderItemCreate>,
}

/// Update order payload
///
/// `status` patches go through the lifecycle transition guard; approval
/// happens only by accepting a bid, never by a direct patch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub required_date: Option<i64>,
    pub notes: Option<String>,
    pub status: Option<OrderStatus>,
}

/// Order with its lines and bids assembled (GET /api/orders/:id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithDetails {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub bids: Vec<BidWithItems>,
}
