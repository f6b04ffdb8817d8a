//! Ship Stores Server - 船舶库存管理后端
//!
//! REST backend for on-board stores: stock items and their movement
//! ledger, low-stock reporting, purchase orders with chandler bids, and
//! invoicing.
//!
//! # 模块结构
//!
//! ```text
//! stores-server/src/
//! ├── core/          # 配置、状态、HTTP 服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 连接池、迁移、仓储层
//! ├── ledger/        # 库存流水引擎 (唯一的库存变更路径)
//! ├── lowstock/      # 低库存视图
//! ├── procurement/   # 订单/报价/发票生命周期
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod ledger;
pub mod lowstock;
pub mod procurement;
pub mod utils;

pub use crate::core::{Config, Server, ServerState};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    utils::logger::init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
}
