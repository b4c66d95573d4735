//! HTTP handlers for supplier endpoints

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::models::Supplier;
use crate::services::supplier::{CreateSupplierInput, SupplierService};
use crate::AppState;

/// List suppliers
pub async fn list_suppliers(State(state): State<AppState>) -> AppResult<Json<Vec<Supplier>>> {
    let service = SupplierService::new(state.db.clone());
    let suppliers = service.list().await?;
    Ok(Json(suppliers))
}

/// Create a supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(input): Json<CreateSupplierInput>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db.clone());
    let supplier = service.create(input).await?;
    Ok(Json(supplier))
}
