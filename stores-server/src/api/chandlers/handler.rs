//! Chandler API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::repository::chandler;
use crate::utils::validation::{MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, Validator};
use crate::utils::{AppError, AppResult};
use shared::models::{Chandler, ChandlerCreate, ChandlerUpdate};

fn check_rating(v: &mut Validator, rating: Option<f64>) {
    if let Some(r) = rating
        && !(0.0..=5.0).contains(&r)
    {
        v.push("rating", "must be between 0 and 5");
    }
}

/// GET /api/chandlers - 获取所有供应商
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Chandler>>> {
    let chandlers = chandler::find_all(&state.pool).await?;
    Ok(Json(chandlers))
}

/// GET /api/chandlers/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Chandler>> {
    let row = chandler::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Chandler {id} not found")))?;
    Ok(Json(row))
}

/// POST /api/chandlers - 创建供应商
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ChandlerCreate>,
) -> AppResult<(StatusCode, Json<Chandler>)> {
    let mut v = Validator::new();
    v.require_text("name", &payload.name, MAX_NAME_LEN);
    v.optional_text("contact_person", &payload.contact_person, MAX_NAME_LEN);
    v.optional_text("email", &payload.email, MAX_EMAIL_LEN);
    v.optional_text("phone", &payload.phone, MAX_SHORT_TEXT_LEN);
    v.optional_text("address", &payload.address, MAX_NAME_LEN);
    check_rating(&mut v, payload.rating);
    v.finish()?;

    let row = chandler::create(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /api/chandlers/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ChandlerUpdate>,
) -> AppResult<Json<Chandler>> {
    let mut v = Validator::new();
    if let Some(ref name) = payload.name {
        v.require_text("name", name, MAX_NAME_LEN);
    }
    v.optional_text("contact_person", &payload.contact_person, MAX_NAME_LEN);
    v.optional_text("email", &payload.email, MAX_EMAIL_LEN);
    v.optional_text("phone", &payload.phone, MAX_SHORT_TEXT_LEN);
    v.optional_text("address", &payload.address, MAX_NAME_LEN);
    check_rating(&mut v, payload.rating);
    v.finish()?;

    let row = chandler::update(&state.pool, id, payload).await?;
    Ok(Json(row))
}

/// DELETE /api/chandlers/:id - 有报价或发票引用时拒绝
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if chandler::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("Chandler {id} not found")))
    }
}
