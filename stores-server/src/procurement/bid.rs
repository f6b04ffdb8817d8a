//! Bid submission and award.
//!
//! Line totals and the bid total are never taken from the request:
//! `total_price = unit_price × order line quantity` is computed here and
//! the bid total is the sum of its lines, so the two can never disagree.

use std::collections::HashMap;

use crate::db::repository::{RepoError, RepoResult, bid, chandler, order};
use shared::ErrorCode;
use shared::models::{Bid, BidCreate, BidStatus, BidWithItems, Order, OrderStatus};
use sqlx::SqlitePool;

/// Submit a chandler's quote against an order.
///
/// The bid must price every line of the order exactly once. Submitting
/// the first bid moves a `pending-quotes` order to `quotes-received`.
pub async fn submit_bid(pool: &SqlitePool, data: BidCreate) -> RepoResult<BidWithItems> {
    let order = order::find_by_id(pool, data.order_id)
        .await?
        .ok_or_else(|| {
            RepoError::Business(
                ErrorCode::OrderNotFound,
                format!("Order {} not found", data.order_id),
            )
        })?;
    if !matches!(
        order.status,
        OrderStatus::PendingQuotes | OrderStatus::QuotesReceived
    ) {
        return Err(RepoError::Business(
            ErrorCode::InvalidTransition,
            format!(
                "Order '{}' is not accepting bids in status '{}'",
                order.order_no,
                order.status.as_str()
            ),
        ));
    }
    chandler::find_by_id(pool, data.chandler_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Chandler {} not found", data.chandler_id)))?;

    // Exactly one priced line per order line
    let order_lines = order::find_items(pool, data.order_id).await?;
    let quantities: HashMap<i64, i64> = order_lines
        .iter()
        .map(|l| (l.id, l.quantity))
        .collect();
    if data.items.len() != order_lines.len() {
        return Err(RepoError::Business(
            ErrorCode::BidIncomplete,
            format!(
                "Bid must price all {} order lines, got {}",
                order_lines.len(),
                data.items.len()
            ),
        ));
    }
    let mut seen = Vec::with_capacity(data.items.len());
    for line in &data.items {
        if !quantities.contains_key(&line.order_item_id) {
            return Err(RepoError::Business(
                ErrorCode::BidIncomplete,
                format!(
                    "Order line {} does not belong to order {}",
                    line.order_item_id, data.order_id
                ),
            ));
        }
        if seen.contains(&line.order_item_id) {
            return Err(RepoError::Business(
                ErrorCode::BidIncomplete,
                format!("Order line {} priced more than once", line.order_item_id),
            ));
        }
        if line.unit_price < 0.0 {
            return Err(RepoError::Validation("Unit price cannot be negative".into()));
        }
        seen.push(line.order_item_id);
    }

    let now = shared::util::now_millis();
    let bid_id = shared::util::snowflake_id();
    let total_amount: f64 = data
        .items
        .iter()
        .map(|l| l.unit_price * quantities[&l.order_item_id] as f64)
        .sum();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO bid (id, order_id, chandler_id, status, submitted_at, valid_until, notes, total_amount) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(bid_id)
    .bind(data.order_id)
    .bind(data.chandler_id)
    .bind(BidStatus::Pending)
    .bind(now)
    .bind(data.valid_until)
    .bind(&data.notes)
    .bind(total_amount)
    .execute(&mut *tx)
    .await?;

    for line in &data.items {
        sqlx::query(
            "INSERT INTO bid_item (id, bid_id, order_item_id, unit_price, total_price, availability) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(shared::util::snowflake_id())
        .bind(bid_id)
        .bind(line.order_item_id)
        .bind(line.unit_price)
        .bind(line.unit_price * quantities[&line.order_item_id] as f64)
        .bind(&line.availability)
        .execute(&mut *tx)
        .await?;
    }

    if order.status == OrderStatus::PendingQuotes {
        // Guarded: a concurrent first bid may already have moved it along
        sqlx::query("UPDATE purchase_order SET status = ?1 WHERE id = ?2 AND status = ?3")
            .bind(OrderStatus::QuotesReceived)
            .bind(data.order_id)
            .bind(OrderStatus::PendingQuotes)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    tracing::info!(
        order_no = order.order_no,
        chandler_id = data.chandler_id,
        total_amount,
        "Bid submitted"
    );

    let bid = bid::find_by_id(pool, bid_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create bid".into()))?;
    let items = bid::find_items(pool, bid_id).await?;
    Ok(BidWithItems { bid, items })
}

/// Accept a bid, awarding the order to its chandler.
///
/// The order must be in `quotes-received`. The winning bid becomes
/// `accepted`, every sibling bid `rejected`, and the order takes the
/// winner's chandler and total, moving to `approved`.
pub async fn award_bid(pool: &SqlitePool, bid_id: i64) -> RepoResult<Order> {
    let winner: Bid = bid::find_by_id(pool, bid_id).await?.ok_or_else(|| {
        RepoError::Business(ErrorCode::BidNotFound, format!("Bid {bid_id} not found"))
    })?;
    let order = order::find_by_id(pool, winner.order_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", winner.order_id)))?;

    let mut tx = pool.begin().await?;
    // Guarded award: only one bid can win the quotes-received row
    let awarded = sqlx::query(
        "UPDATE purchase_order SET status = ?1, selected_chandler_id = ?2, total_amount = ?3 WHERE id = ?4 AND status = ?5",
    )
    .bind(OrderStatus::Approved)
    .bind(winner.chandler_id)
    .bind(winner.total_amount)
    .bind(order.id)
    .bind(OrderStatus::QuotesReceived)
    .execute(&mut *tx)
    .await?;
    if awarded.rows_affected() == 0 {
        return Err(RepoError::Business(
            ErrorCode::InvalidTransition,
            format!(
                "Cannot accept a bid while order '{}' is not awaiting award",
                order.order_no
            ),
        ));
    }
    sqlx::query("UPDATE bid SET status = ? WHERE id = ?")
        .bind(BidStatus::Accepted)
        .bind(winner.id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE bid SET status = ? WHERE order_id = ? AND id != ?")
        .bind(BidStatus::Rejected)
        .bind(order.id)
        .bind(winner.id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(
        order_no = order.order_no,
        chandler_id = winner.chandler_id,
        total_amount = winner.total_amount,
        "Bid accepted, order approved"
    );

    order::find_by_id(pool, order.id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order.id)))
}
