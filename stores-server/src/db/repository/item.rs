//! Item Repository
//!
//! `current_stock` is never written here except at creation: movements go
//! through the ledger engine, which pushes the arithmetic into a single
//! atomic UPDATE.

use super::{RepoError, RepoResult};
use shared::models::{Item, ItemCreate, ItemUpdate};
use sqlx::SqlitePool;

const ITEM_SELECT: &str = "SELECT id, name, category, unit, current_stock, minimum_stock, location, description, last_updated FROM item";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Item>> {
    let sql = format!("{ITEM_SELECT} ORDER BY last_updated DESC");
    let items = sqlx::query_as::<_, Item>(&sql).fetch_all(pool).await?;
    Ok(items)
}

pub async fn find_by_category(pool: &SqlitePool, category: &str) -> RepoResult<Vec<Item>> {
    let sql = format!("{ITEM_SELECT} WHERE category = ? ORDER BY last_updated DESC");
    let items = sqlx::query_as::<_, Item>(&sql)
        .bind(category)
        .fetch_all(pool)
        .await?;
    Ok(items)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Item>> {
    let sql = format!("{ITEM_SELECT} WHERE id = ?");
    let item = sqlx::query_as::<_, Item>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

/// Items below their minimum threshold, most-depleted first.
/// Ties break by id for a stable order.
pub async fn find_low_stock(pool: &SqlitePool) -> RepoResult<Vec<Item>> {
    let sql = format!(
        "{ITEM_SELECT} WHERE current_stock < minimum_stock ORDER BY CAST(current_stock AS REAL) / minimum_stock, id"
    );
    let items = sqlx::query_as::<_, Item>(&sql).fetch_all(pool).await?;
    Ok(items)
}

pub async fn create(pool: &SqlitePool, data: ItemCreate) -> RepoResult<Item> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO item (id, name, category, unit, current_stock, minimum_stock, location, description, last_updated) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.category)
    .bind(&data.unit)
    .bind(data.current_stock.unwrap_or(0))
    .bind(data.minimum_stock.unwrap_or(0))
    .bind(&data.location)
    .bind(&data.description)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create item".into()))
}

/// Partial patch. Always refreshes `last_updated`, whatever changed.
pub async fn update(pool: &SqlitePool, id: i64, data: ItemUpdate) -> RepoResult<Item> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE item SET name = COALESCE(?1, name), category = COALESCE(?2, category), unit = COALESCE(?3, unit), minimum_stock = COALESCE(?4, minimum_stock), location = COALESCE(?5, location), description = COALESCE(?6, description), last_updated = ?7 WHERE id = ?8",
    )
    .bind(&data.name)
    .bind(&data.category)
    .bind(&data.unit)
    .bind(data.minimum_stock)
    .bind(&data.location)
    .bind(&data.description)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Item {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Item {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    // Items stay while the ledger or order lines reference them
    let ledger_refs: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM stock_transaction WHERE item_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
    let order_refs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_item WHERE item_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if ledger_refs > 0 || order_refs > 0 {
        return Err(RepoError::Business(
            shared::ErrorCode::ItemInUse,
            format!(
                "Cannot delete item: {ledger_refs} ledger entries and {order_refs} order lines reference it"
            ),
        ));
    }

    let rows = sqlx::query("DELETE FROM item WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
