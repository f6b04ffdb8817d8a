//! Invoice API Handlers
//!
//! Responses carry `effective_status`, the read-time view that reports
//! `overdue` for unpaid/partial invoices past their due date.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::invoice;
use crate::procurement;
use crate::utils::validation::{MAX_NOTE_LEN, Validator};
use crate::utils::{AppError, AppResult};
use shared::models::{InvoiceCreate, InvoiceStatus, InvoiceUpdate, InvoiceView};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    status: Option<InvoiceStatus>,
}

/// GET /api/invoices - 发票列表 (可按存储状态过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<InvoiceView>>> {
    let rows = match query.status {
        Some(status) => invoice::find_by_status(&state.pool, status).await?,
        None => invoice::find_all(&state.pool).await?,
    };
    let now = shared::util::now_millis();
    Ok(Json(
        rows.into_iter().map(|inv| InvoiceView::at(inv, now)).collect(),
    ))
}

/// GET /api/invoices/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<InvoiceView>> {
    let inv = invoice::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Invoice {id} not found")))?;
    Ok(Json(InvoiceView::at(inv, shared::util::now_millis())))
}

/// POST /api/invoices - 开票 (状态由金额推导)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<InvoiceCreate>,
) -> AppResult<(StatusCode, Json<InvoiceView>)> {
    let mut v = Validator::new();
    v.non_negative_amount("total_amount", payload.total_amount);
    if let Some(paid) = payload.paid_amount {
        v.non_negative_amount("paid_amount", paid);
    }
    v.optional_text("notes", &payload.notes, MAX_NOTE_LEN);
    v.finish()?;

    let inv = procurement::create_invoice(&state.pool, payload).await?;
    let view = InvoiceView::at(inv, shared::util::now_millis());
    Ok((StatusCode::CREATED, Json(view)))
}

/// PATCH /api/invoices/:id - 记录付款/改期，状态重新推导
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<InvoiceUpdate>,
) -> AppResult<Json<InvoiceView>> {
    let mut v = Validator::new();
    if let Some(paid) = payload.paid_amount {
        v.non_negative_amount("paid_amount", paid);
    }
    v.optional_text("notes", &payload.notes, MAX_NOTE_LEN);
    v.finish()?;

    let inv = procurement::update_invoice(&state.pool, id, payload).await?;
    Ok(Json(InvoiceView::at(inv, shared::util::now_millis())))
}
