//! Stock Ledger Engine
//!
//! The only sanctioned path for changing `item.current_stock`. A movement
//! appends one immutable `stock_transaction` row and applies the delta to
//! the item in the same database transaction — either both writes commit
//! or neither does, so the sum of committed deltas always equals the
//! item's current stock.
//!
//! The stock arithmetic runs inside a single UPDATE statement
//! (`current_stock = current_stock ± ?`) with a `current_stock >= ?`
//! guard for outbound movements. Concurrent movements against the same
//! item therefore serialize at the persistence layer; there is no
//! read-modify-write window and no way to drive stock negative.

use shared::models::{Direction, MovementCreate, StockTransaction};
use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Item {0} not found")]
    ItemNotFound(i64),

    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i64, requested: i64 },

    #[error("Invalid {0}: {1}")]
    Validation(&'static str, &'static str),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        LedgerError::Database(err.to_string())
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Apply a stock movement.
///
/// Exactly one ledger row is created and exactly one item row updated
/// per successful call. Failures leave no partial state and are not
/// retried here; resubmission is the caller's decision.
pub async fn apply_movement(
    pool: &SqlitePool,
    data: MovementCreate,
) -> LedgerResult<StockTransaction> {
    if data.quantity < 1 {
        return Err(LedgerError::Validation("quantity", "must be at least 1"));
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let updated = match data.direction {
        Direction::In => {
            sqlx::query(
                "UPDATE item SET current_stock = current_stock + ?1, last_updated = ?2 WHERE id = ?3",
            )
            .bind(data.quantity)
            .bind(now)
            .bind(data.item_id)
            .execute(&mut *tx)
            .await?
        }
        Direction::Out => {
            sqlx::query(
                "UPDATE item SET current_stock = current_stock - ?1, last_updated = ?2 WHERE id = ?3 AND current_stock >= ?1",
            )
            .bind(data.quantity)
            .bind(now)
            .bind(data.item_id)
            .execute(&mut *tx)
            .await?
        }
    };

    if updated.rows_affected() == 0 {
        // Guard refused: missing item or not enough stock for an `out`
        let available: Option<i64> =
            sqlx::query_scalar("SELECT current_stock FROM item WHERE id = ?")
                .bind(data.item_id)
                .fetch_optional(&mut *tx)
                .await?;
        return match available {
            None => Err(LedgerError::ItemNotFound(data.item_id)),
            Some(available) => Err(LedgerError::InsufficientStock {
                available,
                requested: data.quantity,
            }),
        };
    }

    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO stock_transaction (id, item_id, direction, quantity, created_at, remarks) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(data.item_id)
    .bind(data.direction)
    .bind(data.quantity)
    .bind(now)
    .bind(&data.remarks)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!(
        item_id = data.item_id,
        direction = data.direction.as_str(),
        quantity = data.quantity,
        "Stock movement applied"
    );

    Ok(StockTransaction {
        id,
        item_id: data.item_id,
        direction: data.direction,
        quantity: data.quantity,
        created_at: now,
        remarks: data.remarks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{item, stock_transaction};
    use crate::db::test_support::{seed_item, test_pool};

    fn movement(item_id: i64, direction: Direction, quantity: i64) -> MovementCreate {
        MovementCreate {
            item_id,
            direction,
            quantity,
            remarks: None,
        }
    }

    #[tokio::test]
    async fn inbound_movement_increases_stock_and_appends_ledger() {
        let pool = test_pool().await;
        let id = seed_item(&pool, "Rice 25kg", 10, 5).await;

        let txn = apply_movement(&pool, movement(id, Direction::In, 15))
            .await
            .unwrap();
        assert_eq!(txn.quantity, 15);

        let item = item::find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(item.current_stock, 25);
        assert_eq!(
            stock_transaction::find_by_item(&pool, id).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn spec_scenario_out_movement_and_rejection() {
        let pool = test_pool().await;
        let id = seed_item(&pool, "Lube oil drum", 100, 50).await;

        apply_movement(&pool, movement(id, Direction::Out, 30))
            .await
            .unwrap();
        let item = item::find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(item.current_stock, 70);

        // Would go to -10: rejected, no ledger row, stock unchanged
        let err = apply_movement(&pool, movement(id, Direction::Out, 80))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientStock {
                available: 70,
                requested: 80
            }
        ));

        let item = item::find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(item.current_stock, 70);
        assert_eq!(
            stock_transaction::find_by_item(&pool, id).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn draining_to_exactly_zero_is_allowed() {
        let pool = test_pool().await;
        let id = seed_item(&pool, "Fresh water", 40, 10).await;

        apply_movement(&pool, movement(id, Direction::Out, 40))
            .await
            .unwrap();
        let item = item::find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(item.current_stock, 0);

        // Even one more unit is refused at zero
        let err = apply_movement(&pool, movement(id, Direction::Out, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientStock { .. }));
    }

    #[tokio::test]
    async fn ledger_conservation_over_a_movement_sequence() {
        let pool = test_pool().await;
        let id = seed_item(&pool, "Gasket set", 50, 20).await;

        let moves = [
            (Direction::In, 30),
            (Direction::Out, 25),
            (Direction::In, 5),
            (Direction::Out, 40),
            (Direction::In, 12),
        ];
        for (direction, qty) in moves {
            apply_movement(&pool, movement(id, direction, qty))
                .await
                .unwrap();
        }

        let item = item::find_by_id(&pool, id).await.unwrap().unwrap();
        // S0 + Σin − Σout
        assert_eq!(item.current_stock, 50 + 30 - 25 + 5 - 40 + 12);

        // current_stock equals the sum of persisted ledger deltas
        let ledger_sum: i64 = stock_transaction::find_by_item(&pool, id)
            .await
            .unwrap()
            .iter()
            .map(|t| match t.direction {
                Direction::In => t.quantity,
                Direction::Out => -t.quantity,
            })
            .sum();
        assert_eq!(item.current_stock, 50 + ledger_sum);
    }

    #[tokio::test]
    async fn zero_quantity_is_a_validation_error() {
        let pool = test_pool().await;
        let id = seed_item(&pool, "Paint tin", 10, 2).await;
        let err = apply_movement(&pool, movement(id, Direction::In, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation("quantity", _)));
        assert!(
            stock_transaction::find_by_item(&pool, id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn unknown_item_is_not_found() {
        let pool = test_pool().await;
        let err = apply_movement(&pool, movement(424242, Direction::In, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::ItemNotFound(424242)));
    }

    #[tokio::test]
    async fn movement_refreshes_item_last_updated() {
        let pool = test_pool().await;
        let id = seed_item(&pool, "Coffee", 10, 4).await;
        sqlx::query("UPDATE item SET last_updated = 1 WHERE id = ?")
            .bind(id)
            .execute(&pool)
            .await
            .unwrap();

        apply_movement(&pool, movement(id, Direction::In, 1))
            .await
            .unwrap();
        let item = item::find_by_id(&pool, id).await.unwrap().unwrap();
        assert!(item.last_updated > 1);
    }
}
