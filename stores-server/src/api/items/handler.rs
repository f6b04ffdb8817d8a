//! Item API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::item;
use crate::lowstock;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, Validator};
use crate::utils::{AppError, AppResult};
use shared::models::{Item, ItemCreate, ItemUpdate};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    category: Option<String>,
}

/// GET /api/items - 获取所有物品 (可按分类过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Item>>> {
    let items = match query.category.as_deref() {
        Some(category) => item::find_by_category(&state.pool, category).await?,
        None => item::find_all(&state.pool).await?,
    };
    Ok(Json(items))
}

/// GET /api/items/low-stock - 低库存物品，按缺口比例排序
pub async fn low_stock(State(state): State<ServerState>) -> AppResult<Json<Vec<Item>>> {
    let items = lowstock::list_low_stock(&state.pool).await?;
    Ok(Json(items))
}

/// GET /api/items/:id - 获取单个物品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Item>> {
    let item = item::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Item {id} not found")))?;
    Ok(Json(item))
}

/// POST /api/items - 创建物品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ItemCreate>,
) -> AppResult<(StatusCode, Json<Item>)> {
    let mut v = Validator::new();
    v.require_text("name", &payload.name, MAX_NAME_LEN);
    v.require_text("category", &payload.category, MAX_SHORT_TEXT_LEN);
    v.require_text("unit", &payload.unit, MAX_SHORT_TEXT_LEN);
    v.require_text("location", &payload.location, MAX_SHORT_TEXT_LEN);
    v.optional_text("description", &payload.description, MAX_NOTE_LEN);
    if let Some(stock) = payload.current_stock {
        v.non_negative("current_stock", stock);
    }
    if let Some(minimum) = payload.minimum_stock {
        v.non_negative("minimum_stock", minimum);
    }
    v.finish()?;

    let item = item::create(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PATCH /api/items/:id - 部分更新 (库存只能通过流水变更)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ItemUpdate>,
) -> AppResult<Json<Item>> {
    let mut v = Validator::new();
    if let Some(ref name) = payload.name {
        v.require_text("name", name, MAX_NAME_LEN);
    }
    v.optional_text("category", &payload.category, MAX_SHORT_TEXT_LEN);
    v.optional_text("unit", &payload.unit, MAX_SHORT_TEXT_LEN);
    v.optional_text("location", &payload.location, MAX_SHORT_TEXT_LEN);
    v.optional_text("description", &payload.description, MAX_NOTE_LEN);
    if let Some(minimum) = payload.minimum_stock {
        v.non_negative("minimum_stock", minimum);
    }
    v.finish()?;

    let item = item::update(&state.pool, id, payload).await?;
    Ok(Json(item))
}

/// DELETE /api/items/:id - 删除物品 (有流水或订单引用时拒绝)
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if item::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("Item {id} not found")))
    }
}
