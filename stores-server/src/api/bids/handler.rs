//! Bid API Handlers
//!
//! Submission and award run through `procurement`: totals are computed
//! server-side and a patch to `accepted` awards the parent order.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::repository::bid;
use crate::procurement;
use crate::utils::validation::{MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, Validator};
use crate::utils::{AppError, AppResult};
use shared::models::{Bid, BidCreate, BidStatus, BidUpdate, BidWithItems};

/// GET /api/bids/:id - 报价详情 (含行项目)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<BidWithItems>> {
    let bid = bid::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Bid {id} not found")))?;
    let items = bid::find_items(&state.pool, id).await?;
    Ok(Json(BidWithItems { bid, items }))
}

/// POST /api/bids - 提交报价 (必须覆盖订单全部行项目)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BidCreate>,
) -> AppResult<(StatusCode, Json<BidWithItems>)> {
    let mut v = Validator::new();
    v.optional_text("notes", &payload.notes, MAX_NOTE_LEN);
    if payload.items.is_empty() {
        v.push("items", "must contain at least one line");
    }
    for (idx, line) in payload.items.iter().enumerate() {
        if !line.unit_price.is_finite() || line.unit_price < 0.0 {
            v.push(
                format!("items[{idx}].unit_price"),
                "must be a non-negative amount",
            );
        }
        if line.availability.trim().is_empty() || line.availability.len() > MAX_SHORT_TEXT_LEN {
            v.push(format!("items[{idx}].availability"), "must be a short tag");
        }
    }
    v.finish()?;

    let bid = procurement::submit_bid(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(bid)))
}

/// PATCH /api/bids/:id - 更新有效期/备注；status=accepted 触发授标
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<BidUpdate>,
) -> AppResult<Json<Bid>> {
    let mut v = Validator::new();
    v.optional_text("notes", &payload.notes, MAX_NOTE_LEN);
    v.finish()?;

    // Lifecycle first: a refused status change must not leave a partial patch
    match payload.status {
        Some(BidStatus::Accepted) => {
            procurement::award_bid(&state.pool, id).await?;
        }
        Some(BidStatus::Rejected) => {
            bid::set_status(&state.pool, id, BidStatus::Rejected).await?;
        }
        Some(BidStatus::Pending) => {
            return Err(AppError::validation(
                "status",
                "a bid cannot be moved back to pending",
            ));
        }
        None => {}
    }

    if payload.valid_until.is_some() || payload.notes.is_some() {
        bid::update_meta(&state.pool, id, payload.valid_until, payload.notes.as_deref()).await?;
    }

    let bid = bid::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Bid {id} not found")))?;
    Ok(Json(bid))
}
