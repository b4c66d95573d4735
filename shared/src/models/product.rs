//! Product catalog models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product in the catalog
///
/// Stock is decremented by storefront sales and incremented when a purchase
/// order is received. The replenishment engine writes
/// `average_monthly_sales` and, when suggestions are applied, the three
/// threshold fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub price: Decimal,
    pub cost_price: Option<Decimal>,
    pub stock: i32,
    pub is_active: bool,
    /// Days between placing a purchase order and receiving stock
    pub lead_time_days: Option<i32>,
    /// Manually configured buffer inventory, overrides the computed value
    pub safety_stock: Option<i32>,
    /// Manually configured reorder trigger level
    pub reorder_point: Option<i32>,
    /// Manually configured replenishment quantity
    pub reorder_quantity: Option<i32>,
    /// Rolling demand estimate maintained by the replenishment engine
    pub average_monthly_sales: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
