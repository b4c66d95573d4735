//! HTTP handlers for purchase order endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::purchasing::{
    PurchaseItemInput, PurchaseOrderDetail, PurchaseOrderSummary, PurchasingService,
};
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickPurchaseRequest {
    pub product_id: Option<Uuid>,
    pub quantity: Option<i32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickPurchaseResponse {
    pub success: bool,
    pub purchase_order: PurchaseOrderDetail,
    pub message: String,
}

#[derive(Deserialize)]
pub struct BulkPurchaseRequest {
    #[serde(default)]
    pub items: Vec<PurchaseItemInput>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkPurchaseResponse {
    pub success: bool,
    pub message: String,
    pub invoice_number: String,
    pub total_amount: Decimal,
    pub item_count: usize,
}

#[derive(Serialize)]
pub struct PurchaseActionResponse {
    pub success: bool,
    pub message: String,
}

/// Create a purchase order for a single product/quantity pair
pub async fn quick_purchase(
    State(state): State<AppState>,
    Json(body): Json<QuickPurchaseRequest>,
) -> AppResult<Json<QuickPurchaseResponse>> {
    let product_id = body.product_id.ok_or_else(|| AppError::Validation {
        field: "productId".to_string(),
        message: "Product ID is required".to_string(),
    })?;
    let quantity = body.quantity.ok_or_else(|| AppError::Validation {
        field: "quantity".to_string(),
        message: "Quantity is required".to_string(),
    })?;

    let service = PurchasingService::new(state.db.clone(), state.config.replenishment.policy());
    let purchase_order = service.quick_purchase(product_id, quantity).await?;

    let message = format!(
        "Purchase order {} created successfully",
        purchase_order.invoice_number
    );

    Ok(Json(QuickPurchaseResponse {
        success: true,
        purchase_order,
        message,
    }))
}

/// Create one consolidated purchase order from a selected product list
pub async fn bulk_purchase(
    State(state): State<AppState>,
    Json(body): Json<BulkPurchaseRequest>,
) -> AppResult<Json<BulkPurchaseResponse>> {
    let service = PurchasingService::new(state.db.clone(), state.config.replenishment.policy());
    let purchase = service.bulk_purchase(&body.items).await?;

    Ok(Json(BulkPurchaseResponse {
        success: true,
        message: format!("Purchase order {} created successfully", purchase.invoice_number),
        invoice_number: purchase.invoice_number,
        total_amount: purchase.total_amount,
        item_count: purchase.item_count,
    }))
}

/// List purchase orders, newest first
pub async fn list_purchases(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PurchaseOrderSummary>>> {
    let service = PurchasingService::new(state.db.clone(), state.config.replenishment.policy());
    let orders = service.list().await?;
    Ok(Json(orders))
}

/// Get one purchase order with its lines
pub async fn get_purchase(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<PurchaseOrderDetail>> {
    let service = PurchasingService::new(state.db.clone(), state.config.replenishment.policy());
    let order = service.get(order_id).await?;
    Ok(Json(order))
}

/// Mark a pending purchase order as received, incrementing stock
pub async fn receive_purchase(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<PurchaseActionResponse>> {
    let service = PurchasingService::new(state.db.clone(), state.config.replenishment.policy());
    service.receive(order_id).await?;

    Ok(Json(PurchaseActionResponse {
        success: true,
        message: "Purchase order received and stock updated".to_string(),
    }))
}

/// Delete a pending purchase order
pub async fn delete_purchase(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<PurchaseActionResponse>> {
    let service = PurchasingService::new(state.db.clone(), state.config.replenishment.policy());
    let invoice_number = service.delete(order_id).await?;

    Ok(Json(PurchaseActionResponse {
        success: true,
        message: format!("Purchase order {} deleted", invoice_number),
    }))
}
