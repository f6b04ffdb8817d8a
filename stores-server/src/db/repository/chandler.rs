//! Chandler Repository

use super::{RepoError, RepoResult};
use shared::models::{Chandler, ChandlerCreate, ChandlerUpdate};
use sqlx::SqlitePool;

const CHANDLER_SELECT: &str =
    "SELECT id, name, contact_person, email, phone, address, rating FROM chandler";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Chandler>> {
    let sql = format!("{CHANDLER_SELECT} ORDER BY name");
    let rows = sqlx::query_as::<_, Chandler>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Chandler>> {
    let sql = format!("{CHANDLER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Chandler>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: ChandlerCreate) -> RepoResult<Chandler> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO chandler (id, name, contact_person, email, phone, address, rating) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.contact_person)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.address)
    .bind(data.rating)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create chandler".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ChandlerUpdate) -> RepoResult<Chandler> {
    let rows = sqlx::query(
        "UPDATE chandler SET name = COALESCE(?1, name), contact_person = COALESCE(?2, contact_person), email = COALESCE(?3, email), phone = COALESCE(?4, phone), address = COALESCE(?5, address), rating = COALESCE(?6, rating) WHERE id = ?7",
    )
    .bind(&data.name)
    .bind(&data.contact_person)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.address)
    .bind(data.rating)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Chandler {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Chandler {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    // Chandlers with bids or invoices stay on record
    let bid_refs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bid WHERE chandler_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    let invoice_refs: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM invoice WHERE chandler_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
    if bid_refs > 0 || invoice_refs > 0 {
        return Err(RepoError::Validation(format!(
            "Cannot delete chandler: {bid_refs} bid(s) and {invoice_refs} invoice(s) reference it"
        )));
    }

    let rows = sqlx::query("DELETE FROM chandler WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
