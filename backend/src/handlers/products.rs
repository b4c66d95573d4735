//! HTTP handlers for product catalog endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::Product;
use crate::services::product::{CreateProductInput, ProductFilter, ProductService};
use crate::AppState;
use shared::types::{PaginatedResponse, Pagination};

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    /// Only active products
    #[serde(default)]
    pub active: bool,
    /// Only products at or below the configured low-stock threshold
    #[serde(default)]
    pub low_stock: bool,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// List products, optionally filtered to active or low-stock ones
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> AppResult<Json<PaginatedResponse<Product>>> {
    let policy = state.config.replenishment.policy();
    let filter = ProductFilter {
        active_only: query.active,
        max_stock: query.low_stock.then_some(policy.low_stock_threshold),
    };
    let pagination = Pagination {
        page: query.page.unwrap_or(1).max(1),
        per_page: query.per_page.unwrap_or(20).clamp(1, 100),
    };

    let service = ProductService::new(state.db.clone());
    let products = service.list(filter, pagination).await?;
    Ok(Json(products))
}

/// Get a single product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db.clone());
    let product = service.get(product_id).await?;
    Ok(Json(product))
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db.clone());
    let product = service.create(input).await?;
    Ok(Json(product))
}
