//! Order creation and lifecycle transitions.

use crate::db::repository::{RepoError, RepoResult, order};
use shared::ErrorCode;
use shared::models::{Order, OrderCreate, OrderStatus};
use sqlx::{SqliteConnection, SqlitePool};

/// Next order number for the given year, `ORD-<year>-<seq:03>`.
///
/// Reads MAX(seq) inside the caller's write transaction, so two orders
/// created concurrently cannot draw the same number. The UNIQUE
/// constraint on `order_no` backstops this.
async fn next_order_no(conn: &mut SqliteConnection, year: i32) -> Result<String, sqlx::Error> {
    let prefix = format!("ORD-{year}-");
    let max_seq: Option<i64> = sqlx::query_scalar(
        "SELECT MAX(CAST(substr(order_no, 10) AS INTEGER)) FROM purchase_order WHERE order_no LIKE ? || '%'",
    )
    .bind(&prefix)
    .fetch_one(&mut *conn)
    .await?;
    Ok(format!("{prefix}{:03}", max_seq.unwrap_or(0) + 1))
}

/// Create an order together with its lines, in one transaction.
/// Initial status is `pending-quotes`.
pub async fn create_order(pool: &SqlitePool, data: OrderCreate) -> RepoResult<Order> {
    if data.items.is_empty() {
        return Err(RepoError::Validation(
            "Order must contain at least one item".into(),
        ));
    }
    for line in &data.items {
        if line.quantity < 1 {
            return Err(RepoError::Validation(format!(
                "Requested quantity for item {} must be at least 1",
                line.item_id
            )));
        }
        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM item WHERE id = ?")
            .bind(line.item_id)
            .fetch_one(pool)
            .await?;
        if exists == 0 {
            return Err(RepoError::Business(
                ErrorCode::ItemNotFound,
                format!("Item {} not found", line.item_id),
            ));
        }
    }

    let now = shared::util::now_millis();
    let order_id = shared::util::snowflake_id();

    let mut tx = pool.begin().await?;
    let order_no = next_order_no(&mut tx, shared::util::current_year()).await?;

    sqlx::query(
        "INSERT INTO purchase_order (id, order_no, status, created_by, created_at, required_date, notes) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(order_id)
    .bind(&order_no)
    .bind(OrderStatus::PendingQuotes)
    .bind(data.created_by)
    .bind(now)
    .bind(data.required_date)
    .bind(&data.notes)
    .execute(&mut *tx)
    .await?;

    for line in &data.items {
        sqlx::query(
            "INSERT INTO order_item (id, order_id, item_id, quantity, unit) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(shared::util::snowflake_id())
        .bind(order_id)
        .bind(line.item_id)
        .bind(line.quantity)
        .bind(&line.unit)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!(order_no, lines = data.items.len(), "Purchase order created");

    order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

/// Apply a guarded status transition.
///
/// `approved` is refused here: an order becomes approved only by
/// accepting a bid, which also records the winner and the total.
pub async fn transition_order(
    pool: &SqlitePool,
    order_id: i64,
    to: OrderStatus,
) -> RepoResult<Order> {
    let current = order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))?;

    if to == OrderStatus::Approved {
        return Err(RepoError::Business(
            ErrorCode::InvalidTransition,
            "Orders are approved by accepting a bid, not by a status patch".into(),
        ));
    }
    if !super::can_transition(current.status, to) {
        return Err(RepoError::Business(
            ErrorCode::InvalidTransition,
            format!(
                "Cannot transition order from '{}' to '{}'",
                current.status.as_str(),
                to.as_str()
            ),
        ));
    }

    // Guarded flip: a racing transition that got in first loses us the row
    if !order::set_status(pool, order_id, current.status, to).await? {
        return Err(RepoError::Business(
            ErrorCode::InvalidTransition,
            format!(
                "Order '{}' left status '{}' concurrently",
                current.order_no,
                current.status.as_str()
            ),
        ));
    }
    tracing::info!(
        order_no = current.order_no,
        from = current.status.as_str(),
        to = to.as_str(),
        "Order status changed"
    );
    order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))
}
