//! Supplier management service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Supplier;
use shared::validation::{validate_email, validate_phone};

/// Supplier service for lookups and lazy creation
#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
}

/// Input for creating a supplier
#[derive(Debug, Deserialize)]
pub struct CreateSupplierInput {
    pub name: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, FromRow)]
struct SupplierRow {
    id: Uuid,
    name: String,
    contact: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Supplier {
            id: row.id,
            name: row.name,
            contact: row.contact,
            email: row.email,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

impl SupplierService {
    /// Create a new SupplierService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List suppliers alphabetically
    pub async fn list(&self) -> AppResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, SupplierRow>(
            r#"
            SELECT id, name, contact, email, phone, created_at
            FROM suppliers
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Supplier::from).collect())
    }

    /// Create a supplier
    pub async fn create(&self, input: CreateSupplierInput) -> AppResult<Supplier> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Supplier name is required".to_string(),
            });
        }

        if let Some(email) = &input.email {
            validate_email(email).map_err(|msg| AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
            })?;
        }

        if let Some(phone) = &input.phone {
            validate_phone(phone).map_err(|msg| AppError::Validation {
                field: "phone".to_string(),
                message: msg.to_string(),
            })?;
        }

        let row = sqlx::query_as::<_, SupplierRow>(
            r#"
            INSERT INTO suppliers (name, contact, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, contact, email, phone, created_at
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.contact)
        .bind(&input.email)
        .bind(&input.phone)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Look up the fallback supplier by name, lazily creating it with
    /// placeholder contact fields on first use
    ///
    /// The upsert keeps concurrent first uses from racing on the unique
    /// name index.
    pub async fn find_or_create_fallback(&self, name: &str) -> AppResult<Supplier> {
        let row = sqlx::query_as::<_, SupplierRow>(
            r#"
            INSERT INTO suppliers (name, contact, phone)
            VALUES ($1, 'N/A', 'N/A')
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name, contact, email, phone, created_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }
}
