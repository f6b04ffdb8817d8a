//! Purchase Order Repository
//!
//! Simple reads and patches. Multi-step lifecycle operations — creation
//! with lines, bid award, status transitions — live in `procurement`.

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderItem, OrderStatus};
use sqlx::SqlitePool;

const ORDER_SELECT: &str = "SELECT id, order_no, status, created_by, created_at, required_date, notes, selected_chandler_id, total_amount FROM purchase_order";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Order>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let rows = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, item_id, quantity, unit FROM order_item WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Patch the editable metadata (not status — that is a lifecycle transition).
pub async fn update_meta(
    pool: &SqlitePool,
    id: i64,
    required_date: Option<i64>,
    notes: Option<&str>,
) -> RepoResult<Order> {
    let rows = sqlx::query(
        "UPDATE purchase_order SET required_date = COALESCE(?1, required_date), notes = COALESCE(?2, notes) WHERE id = ?3",
    )
    .bind(required_date)
    .bind(notes)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Guarded status flip: applies only while the row still holds `from`,
/// so racing transitions cannot both win. Returns whether it applied.
pub async fn set_status(
    pool: &SqlitePool,
    id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE purchase_order SET status = ?1 WHERE id = ?2 AND status = ?3")
        .bind(to)
        .bind(id)
        .bind(from)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Delete an order. Order lines and bids cascade; invoices are kept and
/// block the delete (billing records outlive procurement paperwork).
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let invoice_refs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoice WHERE order_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if invoice_refs > 0 {
        return Err(RepoError::Validation(format!(
            "Cannot delete order: {invoice_refs} invoice(s) reference it"
        )));
    }

    let rows = sqlx::query("DELETE FROM purchase_order WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
