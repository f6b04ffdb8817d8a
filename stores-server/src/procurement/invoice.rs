//! Invoice creation and payment recording.
//!
//! The stored status is always derived from the amounts; `overdue` is a
//! read-time view (see `shared::models::Invoice::effective_status`), so
//! an invoice never goes stale sitting in the table.

use crate::db::repository::{RepoError, RepoResult, chandler, invoice, order};
use shared::ErrorCode;
use shared::models::{Invoice, InvoiceCreate, InvoiceStatus, InvoiceUpdate};
use sqlx::{SqliteConnection, SqlitePool};

/// Next invoice number for the given year, `INV-<year>-<seq:03>`.
async fn next_invoice_no(conn: &mut SqliteConnection, year: i32) -> Result<String, sqlx::Error> {
    let prefix = format!("INV-{year}-");
    let max_seq: Option<i64> = sqlx::query_scalar(
        "SELECT MAX(CAST(substr(invoice_no, 10) AS INTEGER)) FROM invoice WHERE invoice_no LIKE ? || '%'",
    )
    .bind(&prefix)
    .fetch_one(&mut *conn)
    .await?;
    Ok(format!("{prefix}{:03}", max_seq.unwrap_or(0) + 1))
}

fn check_amounts(paid: f64, total: f64) -> RepoResult<()> {
    if total < 0.0 {
        return Err(RepoError::Validation(
            "Total amount cannot be negative".into(),
        ));
    }
    if paid < 0.0 || paid > total {
        return Err(RepoError::Business(
            ErrorCode::InvalidPaidAmount,
            format!("Paid amount must be between 0 and {total}, got {paid}"),
        ));
    }
    Ok(())
}

pub async fn create_invoice(pool: &SqlitePool, data: InvoiceCreate) -> RepoResult<Invoice> {
    let order = order::find_by_id(pool, data.order_id)
        .await?
        .ok_or_else(|| {
            RepoError::Business(
                ErrorCode::OrderNotFound,
                format!("Order {} not found", data.order_id),
            )
        })?;
    chandler::find_by_id(pool, data.chandler_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Chandler {} not found", data.chandler_id)))?;

    let paid = data.paid_amount.unwrap_or(0.0);
    check_amounts(paid, data.total_amount)?;

    let id = shared::util::snowflake_id();
    let issue_date = data.issue_date.unwrap_or_else(shared::util::now_millis);
    let status = InvoiceStatus::derive(paid, data.total_amount);

    let mut tx = pool.begin().await?;
    let invoice_no = next_invoice_no(&mut tx, shared::util::current_year()).await?;
    sqlx::query(
        "INSERT INTO invoice (id, invoice_no, order_id, chandler_id, issue_date, due_date, status, total_amount, paid_amount, notes) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(id)
    .bind(&invoice_no)
    .bind(data.order_id)
    .bind(data.chandler_id)
    .bind(issue_date)
    .bind(data.due_date)
    .bind(status)
    .bind(data.total_amount)
    .bind(paid)
    .bind(&data.notes)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    tracing::info!(
        invoice_no,
        order_no = order.order_no,
        total_amount = data.total_amount,
        "Invoice created"
    );

    invoice::find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create invoice".into()))
}

/// Patch an invoice. A new `paid_amount` re-derives the stored status.
pub async fn update_invoice(
    pool: &SqlitePool,
    id: i64,
    data: InvoiceUpdate,
) -> RepoResult<Invoice> {
    let current = invoice::find_by_id(pool, id).await?.ok_or_else(|| {
        RepoError::Business(
            ErrorCode::InvoiceNotFound,
            format!("Invoice {id} not found"),
        )
    })?;

    let paid = data.paid_amount.unwrap_or(current.paid_amount);
    check_amounts(paid, current.total_amount)?;
    let status = InvoiceStatus::derive(paid, current.total_amount);

    sqlx::query(
        "UPDATE invoice SET paid_amount = ?1, status = ?2, due_date = COALESCE(?3, due_date), notes = COALESCE(?4, notes) WHERE id = ?5",
    )
    .bind(paid)
    .bind(status)
    .bind(data.due_date)
    .bind(&data.notes)
    .bind(id)
    .execute(pool)
    .await?;

    invoice::find_by_id(pool, id).await?.ok_or_else(|| {
        RepoError::Business(
            ErrorCode::InvoiceNotFound,
            format!("Invoice {id} not found"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{seed_chandler, seed_item, test_pool};
    use crate::procurement::create_order;
    use shared::models::{EffectiveInvoiceStatus, InvoiceView, OrderCreate, OrderItemCreate};

    async fn seed_refs(pool: &SqlitePool) -> (i64, i64) {
        let item_id = seed_item(pool, "Chart paper", 1, 5).await;
        let order = create_order(
            pool,
            OrderCreate {
                created_by: None,
                required_date: None,
                notes: None,
                items: vec![OrderItemCreate {
                    item_id,
                    quantity: 2,
                    unit: "roll".into(),
                }],
            },
        )
        .await
        .unwrap();
        let chandler_id = seed_chandler(pool, "Seven Seas Supply").await;
        (order.id, chandler_id)
    }

    fn payload(order_id: i64, chandler_id: i64, total: f64, paid: Option<f64>) -> InvoiceCreate {
        InvoiceCreate {
            order_id,
            chandler_id,
            issue_date: None,
            due_date: shared::util::now_millis() + 30 * 86_400_000,
            total_amount: total,
            paid_amount: paid,
            notes: None,
        }
    }

    #[tokio::test]
    async fn status_derivation_across_payment_lifecycle() {
        let pool = test_pool().await;
        let (order_id, chandler_id) = seed_refs(&pool).await;

        let inv = create_invoice(&pool, payload(order_id, chandler_id, 1000.0, None))
            .await
            .unwrap();
        assert_eq!(inv.status, InvoiceStatus::Unpaid);

        let inv = update_invoice(
            &pool,
            inv.id,
            InvoiceUpdate {
                paid_amount: Some(400.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(inv.status, InvoiceStatus::Partial);
        assert_eq!(inv.paid_amount, 400.0);

        let inv = update_invoice(
            &pool,
            inv.id,
            InvoiceUpdate {
                paid_amount: Some(1000.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(inv.status, InvoiceStatus::Paid);
    }

    #[tokio::test]
    async fn overpayment_is_rejected() {
        let pool = test_pool().await;
        let (order_id, chandler_id) = seed_refs(&pool).await;
        let err = create_invoice(&pool, payload(order_id, chandler_id, 500.0, Some(600.0)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepoError::Business(ErrorCode::InvalidPaidAmount, _)
        ));
    }

    #[tokio::test]
    async fn invoice_numbers_are_sequential() {
        let pool = test_pool().await;
        let (order_id, chandler_id) = seed_refs(&pool).await;
        let year = shared::util::current_year();
        let a = create_invoice(&pool, payload(order_id, chandler_id, 100.0, None))
            .await
            .unwrap();
        let b = create_invoice(&pool, payload(order_id, chandler_id, 200.0, None))
            .await
            .unwrap();
        assert_eq!(a.invoice_no, format!("INV-{year}-001"));
        assert_eq!(b.invoice_no, format!("INV-{year}-002"));
    }

    #[tokio::test]
    async fn unknown_order_is_a_business_error() {
        let pool = test_pool().await;
        let chandler_id = seed_chandler(&pool, "Harbour Stores").await;
        let err = create_invoice(&pool, payload(777, chandler_id, 100.0, None))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepoError::Business(ErrorCode::OrderNotFound, _)
        ));
    }

    #[tokio::test]
    async fn unpaid_invoice_past_due_reads_overdue() {
        let pool = test_pool().await;
        let (order_id, chandler_id) = seed_refs(&pool).await;
        let mut payload = payload(order_id, chandler_id, 100.0, None);
        payload.due_date = shared::util::now_millis() - 1000;
        let inv = create_invoice(&pool, payload).await.unwrap();

        let view = InvoiceView::at(inv, shared::util::now_millis());
        assert_eq!(view.effective_status, EffectiveInvoiceStatus::Overdue);
    }
}
