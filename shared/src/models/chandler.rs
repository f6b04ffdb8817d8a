//! Chandler Model (ship supplier)

use serde::{Deserialize, Serialize};

/// Chandler entity — third-party supplier quoting against orders
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Chandler {
    pub id: i64,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Informal quality score, 0.0–5.0
    pub rating: Option<f64>,
}

/// Create chandler payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChandlerCreate {
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub rating: Option<f64>,
}

/// Update chandler payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChandlerUpdate {
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub rating: Option<f64>,
}
