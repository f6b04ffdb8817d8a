//! Stock Transaction Repository (read side)
//!
//! The ledger is append-only and writes happen exclusively inside
//! `ledger::apply_movement`, atomically with the stock update. Only
//! reads live here.

use super::RepoResult;
use shared::models::StockTransaction;
use sqlx::SqlitePool;

const TXN_SELECT: &str =
    "SELECT id, item_id, direction, quantity, created_at, remarks FROM stock_transaction";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<StockTransaction>> {
    let sql = format!("{TXN_SELECT} ORDER BY created_at DESC, id DESC");
    let rows = sqlx::query_as::<_, StockTransaction>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_recent(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<StockTransaction>> {
    let sql = format!("{TXN_SELECT} ORDER BY created_at DESC, id DESC LIMIT ?");
    let rows = sqlx::query_as::<_, StockTransaction>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_item(pool: &SqlitePool, item_id: i64) -> RepoResult<Vec<StockTransaction>> {
    let sql = format!("{TXN_SELECT} WHERE item_id = ? ORDER BY created_at DESC, id DESC");
    let rows = sqlx::query_as::<_, StockTransaction>(&sql)
        .bind(item_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
