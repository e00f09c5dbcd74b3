//! Warehouse registry service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Warehouse registry service
#[derive(Clone)]
pub struct WarehouseService {
    db: PgPool,
}

/// Warehouse row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WarehouseRecord {
    pub id: Uuid,
    pub mill_id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub capacity: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a warehouse
#[derive(Debug, Deserialize)]
pub struct CreateWarehouseInput {
    pub name: String,
    pub location: Option<String>,
    pub capacity: Option<Decimal>,
}

/// Input for updating a warehouse
#[derive(Debug, Deserialize)]
pub struct UpdateWarehouseInput {
    pub name: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<Decimal>,
    pub is_active: Option<bool>,
}

impl WarehouseService {
    /// Create a new WarehouseService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a warehouse
    pub async fn create_warehouse(
        &self,
        mill_id: Uuid,
        input: CreateWarehouseInput,
    ) -> AppResult<WarehouseRecord> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Warehouse name is required".to_string(),
            });
        }

        let warehouse = sqlx::query_as::<_, WarehouseRecord>(
            r#"
            INSERT INTO warehouses (mill_id, name, location, capacity)
            VALUES ($1, $2, $3, $4)
            RETURNING id, mill_id, name, location, capacity, is_active, created_at, updated_at
            "#,
        )
        .bind(mill_id)
        .bind(input.name.trim())
        .bind(&input.location)
        .bind(input.capacity)
        .fetch_one(&self.db)
        .await?;

        Ok(warehouse)
    }

    /// Get a warehouse by id
    pub async fn get_warehouse(
        &self,
        mill_id: Uuid,
        warehouse_id: Uuid,
    ) -> AppResult<WarehouseRecord> {
        sqlx::query_as::<_, WarehouseRecord>(
            r#"
            SELECT id, mill_id, name, location, capacity, is_active, created_at, updated_at
            FROM warehouses
            WHERE id = $1 AND mill_id = $2
            "#,
        )
        .bind(warehouse_id)
        .bind(mill_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Warehouse".to_string()))
    }

    /// List all warehouses for a mill
    pub async fn list_warehouses(&self, mill_id: Uuid) -> AppResult<Vec<WarehouseRecord>> {
        let warehouses = sqlx::query_as::<_, WarehouseRecord>(
            r#"
            SELECT id, mill_id, name, location, capacity, is_active, created_at, updated_at
            FROM warehouses
            WHERE mill_id = $1
            ORDER BY name
            "#,
        )
        .bind(mill_id)
        .fetch_all(&self.db)
        .await?;

        Ok(warehouses)
    }

    /// Update a warehouse
    pub async fn update_warehouse(
        &self,
        mill_id: Uuid,
        warehouse_id: Uuid,
        input: UpdateWarehouseInput,
    ) -> AppResult<WarehouseRecord> {
        let existing = self.get_warehouse(mill_id, warehouse_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let location = input.location.or(existing.location);
        let capacity = input.capacity.or(existing.capacity);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        let warehouse = sqlx::query_as::<_, WarehouseRecord>(
            r#"
            UPDATE warehouses
            SET name = $1, location = $2, capacity = $3, is_active = $4, updated_at = NOW()
            WHERE id = $5 AND mill_id = $6
            RETURNING id, mill_id, name, location, capacity, is_active, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&location)
        .bind(capacity)
        .bind(is_active)
        .bind(warehouse_id)
        .bind(mill_id)
        .fetch_one(&self.db)
        .await?;

        Ok(warehouse)
    }

    /// Delete a warehouse; rejected once inventory tracks it
    pub async fn delete_warehouse(&self, mill_id: Uuid, warehouse_id: Uuid) -> AppResult<()> {
        let referenced = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM inventory_items WHERE warehouse_id = $1)",
        )
        .bind(warehouse_id)
        .fetch_one(&self.db)
        .await?;

        if referenced {
            return Err(AppError::Conflict(
                "Warehouse has inventory records and cannot be deleted".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM warehouses WHERE id = $1 AND mill_id = $2")
            .bind(warehouse_id)
            .bind(mill_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Warehouse".to_string()));
        }

        Ok(())
    }
}
