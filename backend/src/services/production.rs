//! Milling batch service
//!
//! A batch converts wheat into flour and bran: one `out` movement for the
//! wheat consumed and one `in` movement per output product, all sharing the
//! batch number and committed in a single transaction through the ledger.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::inventory::{
    GetOrCreateItemInput, InventoryService, RecordMovementInput,
};
use shared::models::{generate_reference_number, yield_percent, MovementType, ProductCategory};

/// Milling batch service
#[derive(Clone)]
pub struct ProductionService {
    db: PgPool,
}

/// Milling batch row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BatchRecord {
    pub id: Uuid,
    pub mill_id: Uuid,
    pub warehouse_id: Uuid,
    pub wheat_product_id: Uuid,
    pub wheat_quantity: Decimal,
    pub batch_number: String,
    pub yield_percent: Decimal,
    pub batch_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Batch output row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BatchOutputRecord {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub product_id: Uuid,
    pub quantity: Decimal,
}

/// One output line in a batch request
#[derive(Debug, Deserialize)]
pub struct BatchOutputInput {
    pub product_id: Uuid,
    pub quantity: Decimal,
}

/// Input for creating a milling batch
#[derive(Debug, Deserialize)]
pub struct CreateBatchInput {
    pub warehouse_id: Uuid,
    pub wheat_product_id: Uuid,
    pub wheat_quantity: Decimal,
    pub outputs: Vec<BatchOutputInput>,
    pub batch_date: Option<NaiveDate>,
}

/// Batch with its outputs and post-batch wheat stock
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    #[serde(flatten)]
    pub batch: BatchRecord,
    pub outputs: Vec<BatchOutputRecord>,
    pub wheat_stock_after: Decimal,
}

impl ProductionService {
    /// Create a new ProductionService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Run a milling batch
    pub async fn create_batch(
        &self,
        mill_id: Uuid,
        user_id: Uuid,
        input: CreateBatchInput,
    ) -> AppResult<BatchResponse> {
        if input.wheat_quantity <= Decimal::ZERO {
            return Err(AppError::Validation {
                field: "wheat_quantity".to_string(),
                message: "Wheat quantity must be positive".to_string(),
            });
        }
        if input.outputs.is_empty() {
            return Err(AppError::Validation {
                field: "outputs".to_string(),
                message: "A batch must produce at least one output".to_string(),
            });
        }
        for output in &input.outputs {
            if output.quantity <= Decimal::ZERO {
                return Err(AppError::Validation {
                    field: "outputs".to_string(),
                    message: "Output quantities must be positive".to_string(),
                });
            }
        }

        // The consumed product must be wheat
        let category = sqlx::query_scalar::<_, String>(
            "SELECT category FROM products WHERE id = $1 AND mill_id = $2",
        )
        .bind(input.wheat_product_id)
        .bind(mill_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        if category != ProductCategory::Wheat.as_str() {
            return Err(AppError::Validation {
                field: "wheat_product_id".to_string(),
                message: "Batch input must be a wheat product".to_string(),
            });
        }

        // Resolve every inventory item up front so the movement loop cannot
        // hit a referential error halfway through
        let inventory = InventoryService::new(self.db.clone());
        let wheat_item = inventory
            .get_or_create_item(
                mill_id,
                GetOrCreateItemInput {
                    product_id: input.wheat_product_id,
                    warehouse_id: input.warehouse_id,
                    minimum_stock: None,
                },
            )
            .await?;

        let mut output_items = Vec::with_capacity(input.outputs.len());
        for output in &input.outputs {
            let item = inventory
                .get_or_create_item(
                    mill_id,
                    GetOrCreateItemInput {
                        product_id: output.product_id,
                        warehouse_id: input.warehouse_id,
                        minimum_stock: None,
                    },
                )
                .await?;
            output_items.push(item.id);
        }

        let batch_date = input.batch_date.unwrap_or_else(|| Utc::now().date_naive());
        let batch_number = self.next_batch_number(mill_id, batch_date.year()).await?;

        let output_quantities: Vec<Decimal> = input.outputs.iter().map(|o| o.quantity).collect();
        let batch_yield = yield_percent(input.wheat_quantity, &output_quantities);

        let mut tx = self.db.begin().await?;

        let batch = sqlx::query_as::<_, BatchRecord>(
            r#"
            INSERT INTO milling_batches (mill_id, warehouse_id, wheat_product_id, wheat_quantity,
                                         batch_number, yield_percent, batch_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, mill_id, warehouse_id, wheat_product_id, wheat_quantity,
                      batch_number, yield_percent, batch_date, created_at
            "#,
        )
        .bind(mill_id)
        .bind(input.warehouse_id)
        .bind(input.wheat_product_id)
        .bind(input.wheat_quantity)
        .bind(&batch_number)
        .bind(batch_yield)
        .bind(batch_date)
        .fetch_one(&mut *tx)
        .await?;

        // Consume the wheat; an insufficient balance aborts the whole batch
        let wheat_receipt = InventoryService::apply_movement(
            &mut tx,
            mill_id,
            Some(user_id),
            &RecordMovementInput {
                inventory_item_id: wheat_item.id,
                movement_type: MovementType::Out,
                quantity: input.wheat_quantity,
                reason: "milling".to_string(),
                reference_number: batch_number.clone(),
            },
        )
        .await?;

        let mut outputs = Vec::with_capacity(input.outputs.len());
        for (output, item_id) in input.outputs.iter().zip(output_items.iter()) {
            let record = sqlx::query_as::<_, BatchOutputRecord>(
                r#"
                INSERT INTO milling_batch_outputs (batch_id, product_id, quantity)
                VALUES ($1, $2, $3)
                RETURNING id, batch_id, product_id, quantity
                "#,
            )
            .bind(batch.id)
            .bind(output.product_id)
            .bind(output.quantity)
            .fetch_one(&mut *tx)
            .await?;

            InventoryService::apply_movement(
                &mut tx,
                mill_id,
                Some(user_id),
                &RecordMovementInput {
                    inventory_item_id: *item_id,
                    movement_type: MovementType::In,
                    quantity: output.quantity,
                    reason: "milling".to_string(),
                    reference_number: batch_number.clone(),
                },
            )
            .await?;

            outputs.push(record);
        }

        tx.commit().await?;

        Ok(BatchResponse {
            batch,
            outputs,
            wheat_stock_after: wheat_receipt.current_stock,
        })
    }

    /// Get a batch with its outputs
    pub async fn get_batch(&self, mill_id: Uuid, batch_id: Uuid) -> AppResult<BatchResponse> {
        let batch = sqlx::query_as::<_, BatchRecord>(
            r#"
            SELECT id, mill_id, warehouse_id, wheat_product_id, wheat_quantity,
                   batch_number, yield_percent, batch_date, created_at
            FROM milling_batches
            WHERE id = $1 AND mill_id = $2
            "#,
        )
        .bind(batch_id)
        .bind(mill_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Milling batch".to_string()))?;

        let outputs = sqlx::query_as::<_, BatchOutputRecord>(
            "SELECT id, batch_id, product_id, quantity FROM milling_batch_outputs WHERE batch_id = $1",
        )
        .bind(batch_id)
        .fetch_all(&self.db)
        .await?;

        // Wheat stock is reported live, not as of the batch
        let wheat_stock = sqlx::query_scalar::<_, Decimal>(
            "SELECT current_stock FROM inventory_items WHERE product_id = $1 AND warehouse_id = $2",
        )
        .bind(batch.wheat_product_id)
        .bind(batch.warehouse_id)
        .fetch_optional(&self.db)
        .await?
        .unwrap_or(Decimal::ZERO);

        Ok(BatchResponse {
            batch,
            outputs,
            wheat_stock_after: wheat_stock,
        })
    }

    /// List batches, newest first
    pub async fn list_batches(&self, mill_id: Uuid) -> AppResult<Vec<BatchRecord>> {
        let batches = sqlx::query_as::<_, BatchRecord>(
            r#"
            SELECT id, mill_id, warehouse_id, wheat_product_id, wheat_quantity,
                   batch_number, yield_percent, batch_date, created_at
            FROM milling_batches
            WHERE mill_id = $1
            ORDER BY batch_date DESC, created_at DESC
            "#,
        )
        .bind(mill_id)
        .fetch_all(&self.db)
        .await?;

        Ok(batches)
    }

    /// Generate the next batch number for a mill
    async fn next_batch_number(&self, mill_id: Uuid, year: i32) -> AppResult<String> {
        let mill_code =
            sqlx::query_scalar::<_, String>("SELECT mill_code FROM mills WHERE id = $1")
                .bind(mill_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Mill".to_string()))?;

        let sequence = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) + 1 FROM milling_batches WHERE mill_id = $1",
        )
        .bind(mill_id)
        .fetch_one(&self.db)
        .await?;

        Ok(generate_reference_number(&mill_code, "MB", year, sequence))
    }
}
