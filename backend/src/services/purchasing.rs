//! Purchase order generation and lifecycle
//!
//! Covers the consolidated reorder purchase, the single-product quick
//! purchase, the caller-selected bulk purchase, and the receive/delete
//! lifecycle of existing orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::SupplierService;
use shared::models::{
    estimate_unit_cost, line_total, next_invoice_number, order_total, PurchaseOrder,
    PurchaseOrderStatus, ReorderCandidate, ReplenishmentPolicy,
};
use shared::validation::validate_quantity;

/// Purchasing service
#[derive(Clone)]
pub struct PurchasingService {
    db: PgPool,
    policy: ReplenishmentPolicy,
}

/// One product/quantity pair supplied by a caller
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItemInput {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Summary of a freshly created consolidated order
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedPurchase {
    pub invoice_number: String,
    pub total_amount: Decimal,
    pub item_count: usize,
}

/// List entry for the purchases screen
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderSummary {
    pub id: Uuid,
    pub invoice_number: String,
    pub supplier_name: String,
    pub status: PurchaseOrderStatus,
    pub total_amount: Decimal,
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
}

/// A purchase order with resolved supplier and product names
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderDetail {
    pub id: Uuid,
    pub invoice_number: String,
    pub supplier_name: String,
    pub status: PurchaseOrderStatus,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub items: Vec<PurchaseOrderLineDetail>,
}

/// A line with resolved product identity
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderLineDetail {
    pub product_id: Uuid,
    pub product_sku: String,
    pub product_name: String,
    pub quantity: i32,
    pub unit_cost: Decimal,
    pub total_cost: Decimal,
}

/// Priced line ready for insertion
#[derive(Debug)]
struct OrderLineSpec {
    product_id: Uuid,
    quantity: i32,
    unit_cost: Decimal,
    total_cost: Decimal,
}

#[derive(Debug, FromRow)]
struct ProductCostRow {
    id: Uuid,
    sku: String,
    price: Decimal,
    cost_price: Option<Decimal>,
}

#[derive(Debug, FromRow)]
struct OrderHeaderRow {
    id: Uuid,
    invoice_number: String,
    supplier_name: String,
    status: String,
    total_amount: Decimal,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct OrderListRow {
    id: Uuid,
    invoice_number: String,
    supplier_name: String,
    status: String,
    total_amount: Decimal,
    item_count: i64,
    created_at: DateTime<Utc>,
}

impl PurchasingService {
    /// Create a new PurchasingService instance
    pub fn new(db: PgPool, policy: ReplenishmentPolicy) -> Self {
        Self { db, policy }
    }

    /// Create one consolidated purchase order covering every candidate
    ///
    /// Callers are expected to have checked for an empty candidate list; a
    /// zero-candidate reorder is a success with no order, not an error.
    pub async fn create_consolidated(
        &self,
        candidates: &[ReorderCandidate],
    ) -> AppResult<ConsolidatedPurchase> {
        let lines: Vec<OrderLineSpec> = candidates
            .iter()
            .map(|candidate| {
                self.price_line(
                    candidate.id,
                    &candidate.sku,
                    candidate.cost_price,
                    candidate.price,
                    candidate.suggested_quantity,
                )
            })
            .collect::<AppResult<_>>()?;

        let supplier = SupplierService::new(self.db.clone())
            .find_or_create_fallback(&self.policy.fallback_supplier_name)
            .await?;

        let order = self.create_order(supplier.id, &lines).await?;

        Ok(ConsolidatedPurchase {
            invoice_number: order.invoice_number,
            total_amount: order.total_amount,
            item_count: lines.len(),
        })
    }

    /// Create a purchase order for exactly one product/quantity pair
    pub async fn quick_purchase(
        &self,
        product_id: Uuid,
        quantity: i32,
    ) -> AppResult<PurchaseOrderDetail> {
        validate_quantity(quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;

        let product = sqlx::query_as::<_, ProductCostRow>(
            "SELECT id, sku, price, cost_price FROM products WHERE id = $1",
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let line = self.price_line(
            product.id,
            &product.sku,
            product.cost_price,
            product.price,
            quantity,
        )?;

        let supplier = SupplierService::new(self.db.clone())
            .find_or_create_fallback(&self.policy.fallback_supplier_name)
            .await?;

        let order = self.create_order(supplier.id, &[line]).await?;

        self.get(order.id).await
    }

    /// Create one consolidated purchase order from a caller-selected list
    pub async fn bulk_purchase(
        &self,
        items: &[PurchaseItemInput],
    ) -> AppResult<ConsolidatedPurchase> {
        if items.is_empty() {
            return Err(AppError::ValidationError(
                "At least one product is required".to_string(),
            ));
        }

        for item in items {
            validate_quantity(item.quantity).map_err(|msg| AppError::Validation {
                field: "quantity".to_string(),
                message: msg.to_string(),
            })?;
        }

        let product_ids: Vec<Uuid> = items.iter().map(|item| item.product_id).collect();
        let products = sqlx::query_as::<_, ProductCostRow>(
            "SELECT id, sku, price, cost_price FROM products WHERE id = ANY($1)",
        )
        .bind(&product_ids)
        .fetch_all(&self.db)
        .await?;

        let by_id: HashMap<Uuid, &ProductCostRow> =
            products.iter().map(|p| (p.id, p)).collect();

        let lines: Vec<OrderLineSpec> = items
            .iter()
            .map(|item| {
                let product = by_id
                    .get(&item.product_id)
                    .ok_or_else(|| AppError::NotFound("Product".to_string()))?;
                self.price_line(
                    product.id,
                    &product.sku,
                    product.cost_price,
                    product.price,
                    item.quantity,
                )
            })
            .collect::<AppResult<_>>()?;

        let supplier = SupplierService::new(self.db.clone())
            .find_or_create_fallback(&self.policy.fallback_supplier_name)
            .await?;

        let order = self.create_order(supplier.id, &lines).await?;

        Ok(ConsolidatedPurchase {
            invoice_number: order.invoice_number,
            total_amount: order.total_amount,
            item_count: lines.len(),
        })
    }

    /// List purchase orders, newest first
    pub async fn list(&self) -> AppResult<Vec<PurchaseOrderSummary>> {
        let rows = sqlx::query_as::<_, OrderListRow>(
            r#"
            SELECT po.id, po.invoice_number, s.name AS supplier_name, po.status,
                   po.total_amount, po.created_at,
                   (SELECT COUNT(*) FROM purchase_order_items i
                    WHERE i.purchase_order_id = po.id) AS item_count
            FROM purchase_orders po
            JOIN suppliers s ON s.id = po.supplier_id
            ORDER BY po.created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(PurchaseOrderSummary {
                    id: row.id,
                    invoice_number: row.invoice_number,
                    supplier_name: row.supplier_name,
                    status: parse_status(&row.status)?,
                    total_amount: row.total_amount,
                    item_count: row.item_count,
                    created_at: row.created_at,
                })
            })
            .collect()
    }

    /// Get one purchase order with its lines
    pub async fn get(&self, order_id: Uuid) -> AppResult<PurchaseOrderDetail> {
        let header = sqlx::query_as::<_, OrderHeaderRow>(
            r#"
            SELECT po.id, po.invoice_number, s.name AS supplier_name, po.status,
                   po.total_amount, po.created_at
            FROM purchase_orders po
            JOIN suppliers s ON s.id = po.supplier_id
            WHERE po.id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase order".to_string()))?;

        let items = sqlx::query_as::<_, (Uuid, String, String, i32, Decimal, Decimal)>(
            r#"
            SELECT i.product_id, p.sku, p.name, i.quantity, i.unit_cost, i.total_cost
            FROM purchase_order_items i
            JOIN products p ON p.id = i.product_id
            WHERE i.purchase_order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        Ok(PurchaseOrderDetail {
            id: header.id,
            invoice_number: header.invoice_number,
            supplier_name: header.supplier_name,
            status: parse_status(&header.status)?,
            total_amount: header.total_amount,
            created_at: header.created_at,
            items: items
                .into_iter()
                .map(
                    |(product_id, sku, name, quantity, unit_cost, total_cost)| {
                        PurchaseOrderLineDetail {
                            product_id,
                            product_sku: sku,
                            product_name: name,
                            quantity,
                            unit_cost,
                            total_cost,
                        }
                    },
                )
                .collect(),
        })
    }

    /// Receive a pending order: increment stock for every line and mark the
    /// order RECEIVED, all in one transaction
    pub async fn receive(&self, order_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let status = sqlx::query_scalar::<_, String>(
            "SELECT status FROM purchase_orders WHERE id = $1 FOR UPDATE",
        )
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase order".to_string()))?;

        if status != PurchaseOrderStatus::Pending.as_str() {
            return Err(AppError::InvalidStateTransition(
                "Purchase order has already been received".to_string(),
            ));
        }

        sqlx::query(
            r#"
            UPDATE products
            SET stock = products.stock + i.quantity, updated_at = NOW()
            FROM purchase_order_items i
            WHERE i.purchase_order_id = $1 AND products.id = i.product_id
            "#,
        )
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE purchase_orders SET status = 'RECEIVED' WHERE id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Delete a pending order and its lines; received orders are immutable
    /// because their stock has already been applied
    pub async fn delete(&self, order_id: Uuid) -> AppResult<String> {
        let order = sqlx::query_as::<_, (String, String)>(
            "SELECT invoice_number, status FROM purchase_orders WHERE id = $1",
        )
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase order".to_string()))?;

        if order.1 == PurchaseOrderStatus::Received.as_str() {
            return Err(AppError::InvalidStateTransition(
                "Received orders cannot be deleted; stock was already updated".to_string(),
            ));
        }

        sqlx::query("DELETE FROM purchase_orders WHERE id = $1")
            .bind(order_id)
            .execute(&self.db)
            .await?;

        Ok(order.0)
    }

    /// Price one line with checked arithmetic
    ///
    /// A cost that cannot be represented, or a negative component, aborts
    /// the whole purchase naming the offending SKU.
    fn price_line(
        &self,
        product_id: Uuid,
        sku: &str,
        cost_price: Option<Decimal>,
        price: Decimal,
        quantity: i32,
    ) -> AppResult<OrderLineSpec> {
        validate_quantity(quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;

        let unit_cost = estimate_unit_cost(cost_price, price, self.policy.cost_ratio_estimate)
            .ok_or_else(|| AppError::CostIntegrity {
                sku: sku.to_string(),
            })?;

        let total_cost = line_total(quantity, unit_cost).ok_or_else(|| AppError::CostIntegrity {
            sku: sku.to_string(),
        })?;

        Ok(OrderLineSpec {
            product_id,
            quantity,
            unit_cost,
            total_cost,
        })
    }

    /// Insert a purchase order and its lines in one transaction
    ///
    /// The invoice sequence is read under `FOR UPDATE` inside the same
    /// transaction, so concurrent creates serialize instead of racing to a
    /// duplicate number; the unique index on `invoice_number` backstops the
    /// empty-table case.
    async fn create_order(
        &self,
        supplier_id: Uuid,
        lines: &[OrderLineSpec],
    ) -> AppResult<PurchaseOrder> {
        let total_amount = order_total(lines.iter().map(|line| line.total_cost))
            .ok_or_else(|| {
                AppError::Internal("Purchase order total exceeds representable range".to_string())
            })?;

        let mut tx = self.db.begin().await?;

        let last_invoice = sqlx::query_scalar::<_, String>(
            r#"
            SELECT invoice_number FROM purchase_orders
            ORDER BY created_at DESC
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .fetch_optional(&mut *tx)
        .await?;

        let invoice_number = next_invoice_number(last_invoice.as_deref()).ok_or_else(|| {
            AppError::Internal(format!(
                "Unparseable invoice number in sequence: {}",
                last_invoice.unwrap_or_default()
            ))
        })?;

        let (order_id, created_at) = sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
            r#"
            INSERT INTO purchase_orders (invoice_number, supplier_id, status, total_amount)
            VALUES ($1, $2, 'PENDING', $3)
            RETURNING id, created_at
            "#,
        )
        .bind(&invoice_number)
        .bind(supplier_id)
        .bind(total_amount)
        .fetch_one(&mut *tx)
        .await?;

        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO purchase_order_items
                    (purchase_order_id, product_id, quantity, unit_cost, total_cost)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.unit_cost)
            .bind(line.total_cost)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(PurchaseOrder {
            id: order_id,
            invoice_number,
            supplier_id,
            status: PurchaseOrderStatus::Pending,
            total_amount,
            created_at,
        })
    }
}

fn parse_status(status: &str) -> AppResult<PurchaseOrderStatus> {
    match status {
        "PENDING" => Ok(PurchaseOrderStatus::Pending),
        "RECEIVED" => Ok(PurchaseOrderStatus::Received),
        other => Err(AppError::Internal(format!(
            "Unknown purchase order status: {}",
            other
        ))),
    }
}
