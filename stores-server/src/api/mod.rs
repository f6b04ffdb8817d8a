//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`items`] - 库存物品接口 (含低库存视图)
//! - [`transactions`] - 库存流水接口
//! - [`chandlers`] - 供应商接口
//! - [`orders`] - 采购订单接口
//! - [`bids`] - 报价接口
//! - [`invoices`] - 发票接口
//! - [`users`] - 用户接口

pub mod health;

pub mod bids;
pub mod chandlers;
pub mod invoices;
pub mod items;
pub mod orders;
pub mod transactions;
pub mod users;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// All routes, merged into one router.
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(items::router())
        .merge(transactions::router())
        .merge(chandlers::router())
        .merge(orders::router())
        .merge(bids::router())
        .merge(invoices::router())
        .merge(users::router())
}
