//! Low-Stock Classifier
//!
//! Read-side derivation over the item table: which items have fallen
//! below their configured minimum, ordered by how far below they are.
//! Nothing on this path mutates state.

use std::collections::BTreeMap;

use crate::db::repository::{RepoResult, item};
use shared::models::Item;
use sqlx::SqlitePool;

/// All items with `current_stock < minimum_stock`, ordered ascending by
/// the ratio `current_stock / minimum_stock` so the most depleted item
/// comes first. Ties break by id.
pub async fn list_low_stock(pool: &SqlitePool) -> RepoResult<Vec<Item>> {
    item::find_low_stock(pool).await
}

/// Rough projection of how many days of stock remain.
///
/// There is no historical-usage model on board; this is a placeholder
/// heuristic (`max(1, round(stock / daily_usage))`), not a forecast.
pub fn estimate_days_until_empty(item: &Item, assumed_daily_usage: f64) -> i64 {
    if assumed_daily_usage <= 0.0 {
        return i64::MAX;
    }
    ((item.current_stock as f64 / assumed_daily_usage).round() as i64).max(1)
}

/// Partition a low-stock set by category for the dashboard. Categories
/// come back in sorted order; items keep their input order within each.
pub fn group_by_category(items: Vec<Item>) -> BTreeMap<String, Vec<Item>> {
    let mut groups: BTreeMap<String, Vec<Item>> = BTreeMap::new();
    for item in items {
        groups.entry(item.category.clone()).or_default().push(item);
    }
    groups
}
