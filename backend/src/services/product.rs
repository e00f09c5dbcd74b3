//! Product catalog service
//!
//! Products supply the unit and default rates used when the stock ledger
//! lazily creates an inventory item for a (product, warehouse) pair.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::ProductCategory;
use shared::types::Unit;

/// Product catalog service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Product row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductRecord {
    pub id: Uuid,
    pub mill_id: Uuid,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub purchase_rate: Option<Decimal>,
    pub sale_rate: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub category: ProductCategory,
    pub unit: Unit,
    pub purchase_rate: Option<Decimal>,
    pub sale_rate: Option<Decimal>,
}

/// Input for updating a product
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub purchase_rate: Option<Decimal>,
    pub sale_rate: Option<Decimal>,
    pub is_active: Option<bool>,
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a product
    pub async fn create_product(
        &self,
        mill_id: Uuid,
        input: CreateProductInput,
    ) -> AppResult<ProductRecord> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Product name is required".to_string(),
            });
        }

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE mill_id = $1 AND name = $2)",
        )
        .bind(mill_id)
        .bind(input.name.trim())
        .fetch_one(&self.db)
        .await?;

        if duplicate {
            return Err(AppError::DuplicateEntry("product name".to_string()));
        }

        let product = sqlx::query_as::<_, ProductRecord>(
            r#"
            INSERT INTO products (mill_id, name, category, unit, purchase_rate, sale_rate)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, mill_id, name, category, unit, purchase_rate, sale_rate,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(mill_id)
        .bind(input.name.trim())
        .bind(input.category.as_str())
        .bind(input.unit.as_str())
        .bind(input.purchase_rate)
        .bind(input.sale_rate)
        .fetch_one(&self.db)
        .await?;

        Ok(product)
    }

    /// Get a product by id
    pub async fn get_product(&self, mill_id: Uuid, product_id: Uuid) -> AppResult<ProductRecord> {
        sqlx::query_as::<_, ProductRecord>(
            r#"
            SELECT id, mill_id, name, category, unit, purchase_rate, sale_rate,
                   is_active, created_at, updated_at
            FROM products
            WHERE id = $1 AND mill_id = $2
            "#,
        )
        .bind(product_id)
        .bind(mill_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    /// List products, optionally filtered by category
    pub async fn list_products(
        &self,
        mill_id: Uuid,
        category: Option<ProductCategory>,
    ) -> AppResult<Vec<ProductRecord>> {
        let products = sqlx::query_as::<_, ProductRecord>(
            r#"
            SELECT id, mill_id, name, category, unit, purchase_rate, sale_rate,
                   is_active, created_at, updated_at
            FROM products
            WHERE mill_id = $1 AND ($2::text IS NULL OR category = $2)
            ORDER BY name
            "#,
        )
        .bind(mill_id)
        .bind(category.map(|c| c.as_str().to_string()))
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// Update a product
    pub async fn update_product(
        &self,
        mill_id: Uuid,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> AppResult<ProductRecord> {
        let existing = self.get_product(mill_id, product_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let purchase_rate = input.purchase_rate.or(existing.purchase_rate);
        let sale_rate = input.sale_rate.or(existing.sale_rate);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        let product = sqlx::query_as::<_, ProductRecord>(
            r#"
            UPDATE products
            SET name = $1, purchase_rate = $2, sale_rate = $3, is_active = $4, updated_at = NOW()
            WHERE id = $5 AND mill_id = $6
            RETURNING id, mill_id, name, category, unit, purchase_rate, sale_rate,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(purchase_rate)
        .bind(sale_rate)
        .bind(is_active)
        .bind(product_id)
        .bind(mill_id)
        .fetch_one(&self.db)
        .await?;

        Ok(product)
    }

    /// Delete a product; rejected once inventory tracks it
    pub async fn delete_product(&self, mill_id: Uuid, product_id: Uuid) -> AppResult<()> {
        let referenced = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM inventory_items WHERE product_id = $1)",
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if referenced {
            return Err(AppError::Conflict(
                "Product has inventory records and cannot be deleted".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM products WHERE id = $1 AND mill_id = $2")
            .bind(product_id)
            .bind(mill_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }
}
