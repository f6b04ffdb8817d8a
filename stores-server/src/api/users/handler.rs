//! User API Handlers
//!
//! Responses are always [`UserResponse`]; the stored argon2 hash never
//! crosses this boundary.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::validation::{MAX_NAME_LEN, MAX_PASSWORD_LEN, Validator};
use crate::utils::{AppError, AppResult};
use shared::models::{UserCreate, UserResponse, UserUpdate};

/// GET /api/users - 用户列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = user::find_all(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/users/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    let user = user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
    Ok(Json(user.into()))
}

/// POST /api/users - 创建用户
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let mut v = Validator::new();
    v.require_text("username", &payload.username, MAX_NAME_LEN);
    v.require_text("display_name", &payload.display_name, MAX_NAME_LEN);
    if payload.password.len() < 8 {
        v.push("password", "must be at least 8 characters");
    } else if payload.password.len() > MAX_PASSWORD_LEN {
        v.push("password", "is too long");
    }
    v.finish()?;

    let user = user::create(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PATCH /api/users/:id - 新密码在存储前重新哈希
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserResponse>> {
    let mut v = Validator::new();
    if let Some(ref username) = payload.username {
        v.require_text("username", username, MAX_NAME_LEN);
    }
    if let Some(ref display_name) = payload.display_name {
        v.require_text("display_name", display_name, MAX_NAME_LEN);
    }
    if let Some(ref password) = payload.password {
        if password.len() < 8 {
            v.push("password", "must be at least 8 characters");
        } else if password.len() > MAX_PASSWORD_LEN {
            v.push("password", "is too long");
        }
    }
    v.finish()?;

    let user = user::update(&state.pool, id, payload).await?;
    Ok(Json(user.into()))
}

/// DELETE /api/users/:id
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if user::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("User {id} not found")))
    }
}
