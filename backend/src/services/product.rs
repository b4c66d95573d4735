//! Product catalog service for the back office

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Product;
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};
use shared::validation::{validate_money, validate_sku};

/// Product service for catalog lookups and creation
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Filters for listing products
#[derive(Debug, Default, Clone, Copy)]
pub struct ProductFilter {
    pub active_only: bool,
    /// Restrict to products at or below this stock level
    pub max_stock: Option<i32>,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub sku: String,
    pub name: String,
    pub price: Decimal,
    pub cost_price: Option<Decimal>,
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
    pub lead_time_days: Option<i32>,
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    sku: String,
    name: String,
    price: Decimal,
    cost_price: Option<Decimal>,
    stock: i32,
    is_active: bool,
    lead_time_days: Option<i32>,
    safety_stock: Option<i32>,
    reorder_point: Option<i32>,
    reorder_quantity: Option<i32>,
    average_monthly_sales: Option<Decimal>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            sku: row.sku,
            name: row.name,
            price: row.price,
            cost_price: row.cost_price,
            stock: row.stock,
            is_active: row.is_active,
            lead_time_days: row.lead_time_days,
            safety_stock: row.safety_stock,
            reorder_point: row.reorder_point,
            reorder_quantity: row.reorder_quantity,
            average_monthly_sales: row.average_monthly_sales,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, sku, name, price, cost_price, stock, is_active, \
     lead_time_days, safety_stock, reorder_point, reorder_quantity, \
     average_monthly_sales, created_at, updated_at";

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List products, most recent first
    pub async fn list(
        &self,
        filter: ProductFilter,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<Product>> {
        let total_items = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM products
            WHERE ($1 = FALSE OR is_active = TRUE)
              AND ($2::INT IS NULL OR stock <= $2)
            "#,
        )
        .bind(filter.active_only)
        .bind(filter.max_stock)
        .fetch_one(&self.db)
        .await?;

        let query = format!(
            r#"
            SELECT {columns}
            FROM products
            WHERE ($1 = FALSE OR is_active = TRUE)
              AND ($2::INT IS NULL OR stock <= $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
            columns = PRODUCT_COLUMNS,
        );

        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .bind(filter.active_only)
            .bind(filter.max_stock)
            .bind(pagination.per_page as i64)
            .bind(pagination.offset() as i64)
            .fetch_all(&self.db)
            .await?;

        Ok(PaginatedResponse {
            data: rows.into_iter().map(Product::from).collect(),
            pagination: PaginationMeta::new(&pagination, total_items as u64),
        })
    }

    /// Get a single product
    pub async fn get(&self, product_id: Uuid) -> AppResult<Product> {
        let query = format!(
            "SELECT {columns} FROM products WHERE id = $1",
            columns = PRODUCT_COLUMNS,
        );

        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(product_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// Create a product
    pub async fn create(&self, input: CreateProductInput) -> AppResult<Product> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Product name is required".to_string(),
            });
        }

        validate_sku(&input.sku).map_err(|msg| AppError::Validation {
            field: "sku".to_string(),
            message: msg.to_string(),
        })?;

        validate_money(input.price).map_err(|msg| AppError::Validation {
            field: "price".to_string(),
            message: msg.to_string(),
        })?;

        if let Some(cost_price) = input.cost_price {
            validate_money(cost_price).map_err(|msg| AppError::Validation {
                field: "cost_price".to_string(),
                message: msg.to_string(),
            })?;
        }

        let stock = input.stock.unwrap_or(0);
        if stock < 0 {
            return Err(AppError::Validation {
                field: "stock".to_string(),
                message: "Stock cannot be negative".to_string(),
            });
        }

        let sku_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE sku = $1)",
        )
        .bind(&input.sku)
        .fetch_one(&self.db)
        .await?;

        if sku_taken {
            return Err(AppError::Validation {
                field: "sku".to_string(),
                message: "A product with this SKU already exists".to_string(),
            });
        }

        let query = format!(
            r#"
            INSERT INTO products (sku, name, price, cost_price, stock, is_active, lead_time_days)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {columns}
            "#,
            columns = PRODUCT_COLUMNS,
        );

        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(&input.sku)
            .bind(input.name.trim())
            .bind(input.price)
            .bind(input.cost_price)
            .bind(stock)
            .bind(input.is_active.unwrap_or(true))
            .bind(input.lead_time_days)
            .fetch_one(&self.db)
            .await?;

        Ok(row.into())
    }
}
