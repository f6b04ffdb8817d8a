//! Purchase Order API Handlers
//!
//! Status patches go through the lifecycle guard in `procurement`;
//! the detail view assembles order + lines + bids in one response.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::repository::{bid, order};
use crate::procurement;
use crate::utils::validation::{MAX_NOTE_LEN, Validator};
use crate::utils::{AppError, AppResult};
use shared::models::{BidWithItems, Order, OrderCreate, OrderUpdate, OrderWithDetails};

/// GET /api/orders - 订单列表，最新在前
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find_all(&state.pool).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 订单详情 (含行项目与报价)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderWithDetails>> {
    let order = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    let items = order::find_items(&state.pool, id).await?;
    let bids = bid::find_by_order_with_items(&state.pool, id).await?;
    Ok(Json(OrderWithDetails { order, items, bids }))
}

/// POST /api/orders - 创建订单 (含行项目)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let mut v = Validator::new();
    v.optional_text("notes", &payload.notes, MAX_NOTE_LEN);
    if payload.items.is_empty() {
        v.push("items", "must contain at least one line");
    }
    for (idx, line) in payload.items.iter().enumerate() {
        if line.quantity < 1 {
            v.push(format!("items[{idx}].quantity"), "must be at least 1");
        }
        if line.unit.trim().is_empty() {
            v.push(format!("items[{idx}].unit"), "must not be empty");
        }
    }
    v.finish()?;

    let order = procurement::create_order(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// PATCH /api/orders/:id - 更新备注/交付日期，状态走生命周期守卫
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    let mut v = Validator::new();
    v.optional_text("notes", &payload.notes, MAX_NOTE_LEN);
    v.finish()?;

    // Lifecycle first: an illegal transition must not leave a partial patch
    if let Some(status) = payload.status {
        procurement::transition_order(&state.pool, id, status).await?;
    }
    let order = if payload.required_date.is_some() || payload.notes.is_some() {
        order::update_meta(
            &state.pool,
            id,
            payload.required_date,
            payload.notes.as_deref(),
        )
        .await?
    } else {
        order::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?
    };
    Ok(Json(order))
}

/// GET /api/orders/:id/bids - 订单的所有报价 (含行项目)
pub async fn list_bids(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<BidWithItems>>> {
    order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    let bids = bid::find_by_order_with_items(&state.pool, id).await?;
    Ok(Json(bids))
}

/// DELETE /api/orders/:id - 行项目与报价级联删除，发票引用时拒绝
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if order::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("Order {id} not found")))
    }
}
