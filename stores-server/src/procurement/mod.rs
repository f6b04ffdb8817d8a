//! Order/Bid/Invoice Lifecycle
//!
//! 订单生命周期状态机。 The state machine governing a purchase order from
//! creation through quote collection, award, delivery and billing:
//!
//! `pending-quotes → quotes-received → approved → delivered`
//!
//! with `cancelled` reachable from the two pre-approval states. Approval
//! never happens by a direct status patch — only by accepting a bid,
//! which also records the winning chandler and total on the order.

pub mod bid;
pub mod invoice;
pub mod order;

pub use bid::{award_bid, submit_bid};
pub use invoice::{create_invoice, update_invoice};
pub use order::{create_order, transition_order};

use shared::models::OrderStatus;

/// Legal lifecycle transitions. Everything else is a business-rule error.
pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;
    matches!(
        (from, to),
        (PendingQuotes, QuotesReceived)
            | (PendingQuotes, Cancelled)
            | (QuotesReceived, Approved)
            | (QuotesReceived, Cancelled)
            | (Approved, Delivered)
    )
}
