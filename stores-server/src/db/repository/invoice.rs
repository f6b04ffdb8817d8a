//! Invoice Repository
//!
//! Reads and raw row access. Creation and payment recording live in
//! `procurement`, which derives the stored status from the amounts.

use super::RepoResult;
use shared::models::{Invoice, InvoiceStatus};
use sqlx::SqlitePool;

const INVOICE_SELECT: &str = "SELECT id, invoice_no, order_id, chandler_id, issue_date, due_date, status, total_amount, paid_amount, notes FROM invoice";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Invoice>> {
    let sql = format!("{INVOICE_SELECT} ORDER BY issue_date DESC, id DESC");
    let rows = sqlx::query_as::<_, Invoice>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_status(pool: &SqlitePool, status: InvoiceStatus) -> RepoResult<Vec<Invoice>> {
    let sql = format!("{INVOICE_SELECT} WHERE status = ? ORDER BY issue_date DESC, id DESC");
    let rows = sqlx::query_as::<_, Invoice>(&sql)
        .bind(status)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Invoice>> {
    let sql = format!("{INVOICE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Invoice>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}
