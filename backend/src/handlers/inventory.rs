//! HTTP handlers for the inventory replenishment endpoints

use axum::{extract::State, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{InventorySuggestions, ReorderCandidate};
use crate::services::{
    FixedThresholdStrategy, PurchasingService, ReorderStrategy, ReplenishmentService,
    ThresholdReorderStrategy,
};
use crate::AppState;

/// Products flagged for replenishment
#[derive(Serialize)]
pub struct ReorderListResponse {
    pub success: bool,
    pub count: usize,
    pub products: Vec<ReorderCandidate>,
}

/// Outcome of the consolidated reorder action
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReorderResponse {
    pub success: bool,
    pub message: String,
    pub orders_created: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_products: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateSuggestionsRequest {
    pub product_id: Option<Uuid>,
    #[serde(default)]
    pub apply: bool,
}

#[derive(Serialize)]
pub struct CalculateSuggestionsResponse {
    pub success: bool,
    pub suggestions: InventorySuggestions,
    pub applied: bool,
}

#[derive(Serialize)]
pub struct UpdateMetricsResponse {
    pub success: bool,
    pub message: String,
    pub updated: u64,
    pub total: u64,
}

/// List products needing reorder under the analytical threshold strategy
pub async fn get_reorder_products(
    State(state): State<AppState>,
) -> AppResult<Json<ReorderListResponse>> {
    let strategy =
        ThresholdReorderStrategy::new(state.db.clone(), state.config.replenishment.policy());
    let products = strategy.products_needing_reorder().await?;

    Ok(Json(ReorderListResponse {
        success: true,
        count: products.len(),
        products,
    }))
}

/// List low-stock products under the fixed-threshold fast path
pub async fn get_low_stock_products(
    State(state): State<AppState>,
) -> AppResult<Json<ReorderListResponse>> {
    let strategy =
        FixedThresholdStrategy::new(state.db.clone(), state.config.replenishment.policy());
    let products = strategy.products_needing_reorder().await?;

    Ok(Json(ReorderListResponse {
        success: true,
        count: products.len(),
        products,
    }))
}

/// Create one consolidated purchase order for every flagged product
///
/// Zero flagged products is a success with no order created, explicitly
/// distinct from an error.
pub async fn generate_reorder_orders(
    State(state): State<AppState>,
) -> AppResult<Json<GenerateReorderResponse>> {
    let policy = state.config.replenishment.policy();
    let strategy = ThresholdReorderStrategy::new(state.db.clone(), policy.clone());
    let candidates = strategy.products_needing_reorder().await?;

    if candidates.is_empty() {
        return Ok(Json(GenerateReorderResponse {
            success: true,
            message: "No products require replenishment".to_string(),
            orders_created: 0,
            total_products: None,
            invoice_number: None,
            total_amount: None,
        }));
    }

    let purchasing = PurchasingService::new(state.db.clone(), policy);
    let purchase = purchasing.create_consolidated(&candidates).await?;

    tracing::info!(
        invoice_number = %purchase.invoice_number,
        products = candidates.len(),
        "Consolidated reorder purchase created"
    );

    Ok(Json(GenerateReorderResponse {
        success: true,
        message: format!(
            "Purchase order {} created for {} products",
            purchase.invoice_number,
            candidates.len()
        ),
        orders_created: 1,
        total_products: Some(candidates.len()),
        invoice_number: Some(purchase.invoice_number),
        total_amount: Some(purchase.total_amount),
    }))
}

/// Compute (and optionally apply) inventory suggestions for one product
pub async fn calculate_suggestions(
    State(state): State<AppState>,
    Json(body): Json<CalculateSuggestionsRequest>,
) -> AppResult<Json<CalculateSuggestionsResponse>> {
    let product_id = body.product_id.ok_or_else(|| AppError::Validation {
        field: "productId".to_string(),
        message: "Product ID is required".to_string(),
    })?;

    let service =
        ReplenishmentService::new(state.db.clone(), state.config.replenishment.policy());
    let suggestions = service.calculate(product_id, body.apply).await?;

    Ok(Json(CalculateSuggestionsResponse {
        success: true,
        suggestions,
        applied: body.apply,
    }))
}

/// Batch-refresh the demand estimate of every active product
///
/// Triggered by an externally-scheduled call; each invocation recomputes
/// and overwrites, so re-running is always safe.
pub async fn update_demand_metrics(
    State(state): State<AppState>,
) -> AppResult<Json<UpdateMetricsResponse>> {
    let service =
        ReplenishmentService::new(state.db.clone(), state.config.replenishment.policy());
    let result = service.update_all_demand_metrics().await?;

    tracing::info!(updated = result.updated, total = result.total, "Demand metrics refreshed");

    Ok(Json(UpdateMetricsResponse {
        success: true,
        message: format!("Demand metrics updated for {} products", result.updated),
        updated: result.updated,
        total: result.total,
    }))
}
