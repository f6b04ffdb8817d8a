//! Data models
//!
//! Shared between stores-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes, all timestamps epoch milliseconds.

pub mod bid;
pub mod chandler;
pub mod invoice;
pub mod item;
pub mod order;
pub mod stock_transaction;
pub mod user;

// Re-exports
pub use bid::*;
pub use chandler::*;
pub use invoice::*;
pub use item::*;
pub use order::*;
pub use stock_transaction::*;
pub use user::*;
