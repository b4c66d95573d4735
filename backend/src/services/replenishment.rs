//! Inventory replenishment engine
//!
//! Demand estimation, threshold suggestions, and the two reorder-selection
//! strategies. The formulas themselves live in
//! `shared::models::replenishment`; this service wires them to the catalog.
//!
//! Products with no sales history estimate to zero demand, which makes both
//! safety stock and reorder point zero and keeps them off the reorder list
//! regardless of stock level until they accrue history. Raised with product
//! owners; until they decide otherwise the behavior is kept as-is.

use chrono::{Months, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{
    average_monthly_sales, classify_urgency, classify_urgency_fixed, reorder_point,
    reorder_quantity, suggested_safety_stock, InventorySuggestions, OrderStatus,
    ReorderCandidate, ReplenishmentPolicy,
};

/// Replenishment service for demand metrics and threshold suggestions
#[derive(Clone)]
pub struct ReplenishmentService {
    db: PgPool,
    policy: ReplenishmentPolicy,
}

/// Outcome of a batch demand-metric refresh
#[derive(Debug, Serialize)]
pub struct DemandMetricsUpdate {
    pub updated: u64,
    pub total: u64,
}

/// Threshold fields loaded for suggestion math
#[derive(Debug, FromRow)]
struct ProductThresholdRow {
    lead_time_days: Option<i32>,
    safety_stock: Option<i32>,
    reorder_quantity: Option<i32>,
}

/// Fields both reorder strategies scan
#[derive(Debug, FromRow)]
struct ReorderScanRow {
    id: Uuid,
    sku: String,
    name: String,
    stock: i32,
    cost_price: Option<Decimal>,
    price: Decimal,
    lead_time_days: Option<i32>,
    safety_stock: Option<i32>,
    reorder_point: Option<i32>,
    reorder_quantity: Option<i32>,
    average_monthly_sales: Option<Decimal>,
}

impl ReplenishmentService {
    /// Create a new ReplenishmentService instance
    pub fn new(db: PgPool, policy: ReplenishmentPolicy) -> Self {
        Self { db, policy }
    }

    /// Average monthly units sold over the trailing demand window
    ///
    /// Lines on cancelled orders are excluded. An unknown product simply has
    /// no qualifying lines and estimates to zero, not an error.
    pub async fn average_monthly_sales(&self, product_id: Uuid) -> AppResult<Decimal> {
        let window = self.policy.demand_window_months;
        let cutoff = Utc::now()
            .checked_sub_months(Months::new(window))
            .ok_or_else(|| AppError::Internal("Demand window underflow".to_string()))?;

        let total_units = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(oi.quantity), 0)
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            WHERE oi.product_id = $1
              AND o.created_at >= $2
              AND o.status <> $3
            "#,
        )
        .bind(product_id)
        .bind(cutoff)
        .bind(OrderStatus::Cancelled.as_str())
        .fetch_one(&self.db)
        .await?;

        Ok(average_monthly_sales(total_units, window))
    }

    /// Compute inventory suggestions for one product
    pub async fn suggestions_for(&self, product_id: Uuid) -> AppResult<InventorySuggestions> {
        let product = sqlx::query_as::<_, ProductThresholdRow>(
            "SELECT lead_time_days, safety_stock, reorder_quantity FROM products WHERE id = $1",
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let avg = self.average_monthly_sales(product_id).await?;

        Ok(InventorySuggestions {
            average_monthly_sales: avg,
            suggested_safety_stock: suggested_safety_stock(
                &self.policy,
                avg,
                product.lead_time_days,
            ),
            suggested_reorder_point: reorder_point(
                &self.policy,
                avg,
                product.lead_time_days,
                product.safety_stock,
            ),
            suggested_reorder_quantity: reorder_quantity(
                &self.policy,
                avg,
                product.reorder_quantity,
            ),
        })
    }

    /// Compute suggestions, persist the fresh demand estimate, and
    /// optionally apply the three thresholds
    pub async fn calculate(
        &self,
        product_id: Uuid,
        apply: bool,
    ) -> AppResult<InventorySuggestions> {
        let suggestions = self.suggestions_for(product_id).await?;

        // The demand estimate is always persisted; thresholds only on apply
        sqlx::query(
            "UPDATE products SET average_monthly_sales = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(suggestions.average_monthly_sales)
        .bind(product_id)
        .execute(&self.db)
        .await?;

        if apply {
            sqlx::query(
                r#"
                UPDATE products
                SET safety_stock = $1, reorder_point = $2, reorder_quantity = $3,
                    updated_at = NOW()
                WHERE id = $4
                "#,
            )
            .bind(suggestions.suggested_safety_stock)
            .bind(suggestions.suggested_reorder_point)
            .bind(suggestions.suggested_reorder_quantity)
            .bind(product_id)
            .execute(&self.db)
            .await?;
        }

        Ok(suggestions)
    }

    /// Recompute and persist the demand estimate for every active product
    ///
    /// Invoked by an externally-scheduled call; safe to re-run at any time
    /// because it overwrites rather than accumulates.
    pub async fn update_all_demand_metrics(&self) -> AppResult<DemandMetricsUpdate> {
        let product_ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM products WHERE is_active = TRUE",
        )
        .fetch_all(&self.db)
        .await?;

        let total = product_ids.len() as u64;
        let mut updated = 0;

        for product_id in product_ids {
            let avg = self.average_monthly_sales(product_id).await?;

            sqlx::query(
                "UPDATE products SET average_monthly_sales = $1, updated_at = NOW() WHERE id = $2",
            )
            .bind(avg)
            .bind(product_id)
            .execute(&self.db)
            .await?;

            updated += 1;
        }

        Ok(DemandMetricsUpdate { updated, total })
    }
}

/// Common capability of the two reorder selectors
///
/// Both strategies are deliberate redundancy, not dead code: the analytical
/// one serves batch/review use, the fixed one serves interactive actions
/// with a tight latency budget. Keep both.
#[axum::async_trait]
pub trait ReorderStrategy {
    /// Products whose stock warrants replenishment, most urgent first
    async fn products_needing_reorder(&self) -> AppResult<Vec<ReorderCandidate>>;
}

/// Formula-based selector: flags products at or below their reorder point
///
/// Uses the stored demand estimate (maintained by the metrics refresh), so a
/// scan is a single query plus in-memory math.
#[derive(Clone)]
pub struct ThresholdReorderStrategy {
    db: PgPool,
    policy: ReplenishmentPolicy,
}

impl ThresholdReorderStrategy {
    pub fn new(db: PgPool, policy: ReplenishmentPolicy) -> Self {
        Self { db, policy }
    }
}

#[axum::async_trait]
impl ReorderStrategy for ThresholdReorderStrategy {
    async fn products_needing_reorder(&self) -> AppResult<Vec<ReorderCandidate>> {
        let rows = sqlx::query_as::<_, ReorderScanRow>(
            r#"
            SELECT id, sku, name, stock, cost_price, price, lead_time_days,
                   safety_stock, reorder_point, reorder_quantity, average_monthly_sales
            FROM products
            WHERE is_active = TRUE
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut candidates: Vec<ReorderCandidate> = rows
            .into_iter()
            .filter_map(|row| {
                let avg = row.average_monthly_sales.unwrap_or(Decimal::ZERO);
                let point = row.reorder_point.unwrap_or_else(|| {
                    reorder_point(&self.policy, avg, row.lead_time_days, row.safety_stock)
                });

                if row.stock > point {
                    return None;
                }

                let stored_safety = row.safety_stock.unwrap_or(0);
                Some(ReorderCandidate {
                    id: row.id,
                    sku: row.sku,
                    name: row.name,
                    stock: row.stock,
                    cost_price: row.cost_price,
                    price: row.price,
                    reorder_point: point,
                    suggested_quantity: reorder_quantity(&self.policy, avg, row.reorder_quantity),
                    safety_stock: stored_safety,
                    urgency: classify_urgency(row.stock, stored_safety),
                })
            })
            .collect();

        candidates.sort_by_key(|candidate| candidate.urgency.rank());

        Ok(candidates)
    }
}

/// Fixed-threshold selector: one query, constant suggestions
///
/// The fast path behind interactive "create orders now" actions; no demand
/// history required.
#[derive(Clone)]
pub struct FixedThresholdStrategy {
    db: PgPool,
    policy: ReplenishmentPolicy,
}

impl FixedThresholdStrategy {
    pub fn new(db: PgPool, policy: ReplenishmentPolicy) -> Self {
        Self { db, policy }
    }
}

#[axum::async_trait]
impl ReorderStrategy for FixedThresholdStrategy {
    async fn products_needing_reorder(&self) -> AppResult<Vec<ReorderCandidate>> {
        let rows = sqlx::query_as::<_, ReorderScanRow>(
            r#"
            SELECT id, sku, name, stock, cost_price, price, lead_time_days,
                   safety_stock, reorder_point, reorder_quantity, average_monthly_sales
            FROM products
            WHERE is_active = TRUE AND stock <= $1
            ORDER BY stock ASC
            "#,
        )
        .bind(self.policy.low_stock_threshold)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ReorderCandidate {
                id: row.id,
                sku: row.sku,
                name: row.name,
                stock: row.stock,
                cost_price: row.cost_price,
                price: row.price,
                reorder_point: self.policy.low_stock_threshold,
                suggested_quantity: self.policy.fixed_reorder_quantity,
                safety_stock: self.policy.fixed_safety_stock,
                urgency: classify_urgency_fixed(&self.policy, row.stock),
            })
            .collect())
    }
}
