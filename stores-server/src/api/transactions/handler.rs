//! Stock Transaction API Handlers
//!
//! POST delegates to the ledger engine; the flat CRUD path never touches
//! `item.current_stock` itself.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::stock_transaction;
use crate::ledger;
use crate::utils::validation::{MAX_NOTE_LEN, Validator};
use crate::utils::AppResult;
use shared::models::{MovementCreate, StockTransaction};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    limit: Option<i64>,
}

/// GET /api/transactions - 流水列表，最新在前 (可选 ?limit=)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<StockTransaction>>> {
    let rows = match query.limit {
        Some(limit) => stock_transaction::find_recent(&state.pool, limit.max(0)).await?,
        None => stock_transaction::find_all(&state.pool).await?,
    };
    Ok(Json(rows))
}

/// GET /api/transactions/item/:item_id - 单个物品的流水
pub async fn list_by_item(
    State(state): State<ServerState>,
    Path(item_id): Path<i64>,
) -> AppResult<Json<Vec<StockTransaction>>> {
    let rows = stock_transaction::find_by_item(&state.pool, item_id).await?;
    Ok(Json(rows))
}

/// POST /api/transactions - 应用一次库存移动
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MovementCreate>,
) -> AppResult<(StatusCode, Json<StockTransaction>)> {
    let mut v = Validator::new();
    v.positive("quantity", payload.quantity);
    v.optional_text("remarks", &payload.remarks, MAX_NOTE_LEN);
    v.finish()?;

    let txn = ledger::apply_movement(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(txn)))
}
