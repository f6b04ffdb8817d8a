//! Bid Repository
//!
//! Reads and simple patches. Bid submission and award run in
//! `procurement`, which owns the total/line invariants.

use super::{RepoError, RepoResult};
use shared::models::{Bid, BidItem, BidStatus, BidWithItems};
use sqlx::SqlitePool;

const BID_SELECT: &str = "SELECT id, order_id, chandler_id, status, submitted_at, valid_until, notes, total_amount FROM bid";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Bid>> {
    let sql = format!("{BID_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Bid>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_order(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<Bid>> {
    let sql = format!("{BID_SELECT} WHERE order_id = ? ORDER BY submitted_at, id");
    let rows = sqlx::query_as::<_, Bid>(&sql)
        .bind(order_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_items(pool: &SqlitePool, bid_id: i64) -> RepoResult<Vec<BidItem>> {
    let rows = sqlx::query_as::<_, BidItem>(
        "SELECT id, bid_id, order_item_id, unit_price, total_price, availability FROM bid_item WHERE bid_id = ? ORDER BY id",
    )
    .bind(bid_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Bids of an order with their lines attached (order detail assembly).
pub async fn find_by_order_with_items(
    pool: &SqlitePool,
    order_id: i64,
) -> RepoResult<Vec<BidWithItems>> {
    let bids = find_by_order(pool, order_id).await?;
    let mut out = Vec::with_capacity(bids.len());
    for bid in bids {
        let items = find_items(pool, bid.id).await?;
        out.push(BidWithItems { bid, items });
    }
    Ok(out)
}

pub async fn set_status(pool: &SqlitePool, id: i64, status: BidStatus) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE bid SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Bid {id} not found")));
    }
    Ok(())
}

/// Patch the editable metadata (status changes go through `procurement`).
pub async fn update_meta(
    pool: &SqlitePool,
    id: i64,
    valid_until: Option<i64>,
    notes: Option<&str>,
) -> RepoResult<Bid> {
    let rows = sqlx::query(
        "UPDATE bid SET valid_until = COALESCE(?1, valid_until), notes = COALESCE(?2, notes) WHERE id = ?3",
    )
    .bind(valid_until)
    .bind(notes)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Bid {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Bid {id} not found")))
}
