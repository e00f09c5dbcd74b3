//! Sale service for flour and bran dispatch
//!
//! A sale's stock effect is exactly one `out` movement recorded through the
//! stock ledger; an insufficient balance rejects the whole sale before any
//! row is committed.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::inventory::{InventoryService, RecordMovementInput};
use shared::models::{generate_reference_number, MovementType, PaymentStatus};
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};

/// Sale service
#[derive(Clone)]
pub struct SaleService {
    db: PgPool,
}

/// Sale row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SaleRecord {
    pub id: Uuid,
    pub mill_id: Uuid,
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub total_amount: Decimal,
    pub received_amount: Decimal,
    pub payment_status: String,
    pub invoice_number: String,
    pub sale_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a sale
#[derive(Debug, Deserialize)]
pub struct CreateSaleInput {
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub received_amount: Option<Decimal>,
    /// Generated from the mill code when omitted
    pub invoice_number: Option<String>,
    pub sale_date: Option<NaiveDate>,
}

/// Input for recording a receipt against a sale
#[derive(Debug, Deserialize)]
pub struct RecordReceiptInput {
    pub amount: Decimal,
}

/// Persisted sale plus the stock level it left behind
#[derive(Debug, Serialize)]
pub struct SaleReceipt {
    #[serde(flatten)]
    pub sale: SaleRecord,
    pub inventory_item_id: Uuid,
    pub current_stock: Decimal,
}

/// Filter for listing sales
#[derive(Debug, Default, Deserialize)]
pub struct SaleFilter {
    pub customer_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl SaleService {
    /// Create a new SaleService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a sale and its stock dispatch
    pub async fn create_sale(
        &self,
        mill_id: Uuid,
        user_id: Uuid,
        input: CreateSaleInput,
    ) -> AppResult<SaleReceipt> {
        if input.quantity <= Decimal::ZERO {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity must be positive".to_string(),
            });
        }
        if input.rate <= Decimal::ZERO {
            return Err(AppError::Validation {
                field: "rate".to_string(),
                message: "Rate must be positive".to_string(),
            });
        }

        let total_amount = input.quantity * input.rate;
        let received_amount = input.received_amount.unwrap_or(Decimal::ZERO);
        if received_amount < Decimal::ZERO || received_amount > total_amount {
            return Err(AppError::Validation {
                field: "received_amount".to_string(),
                message: "Received amount must be between zero and the total".to_string(),
            });
        }

        // Validate the customer
        let is_customer = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM parties WHERE id = $1 AND mill_id = $2 AND party_type = 'customer')",
        )
        .bind(input.customer_id)
        .bind(mill_id)
        .fetch_one(&self.db)
        .await?;

        if !is_customer {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        // A sale can only dispatch from an existing item; there is nothing
        // lazy to create on the way out
        let item_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM inventory_items WHERE product_id = $1 AND warehouse_id = $2 AND mill_id = $3",
        )
        .bind(input.product_id)
        .bind(input.warehouse_id)
        .bind(mill_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))?;

        let sale_date = input.sale_date.unwrap_or_else(|| Utc::now().date_naive());
        let invoice_number = match input.invoice_number {
            Some(number) => number,
            None => self.next_invoice_number(mill_id, sale_date.year()).await?,
        };

        let payment_status = PaymentStatus::derive(total_amount, received_amount);

        let mut tx = self.db.begin().await?;

        // Dispatch first: an insufficient balance aborts before the sale row
        let receipt = InventoryService::apply_movement(
            &mut tx,
            mill_id,
            Some(user_id),
            &RecordMovementInput {
                inventory_item_id: item_id,
                movement_type: MovementType::Out,
                quantity: input.quantity,
                reason: "sale".to_string(),
                reference_number: invoice_number.clone(),
            },
        )
        .await?;

        let sale = sqlx::query_as::<_, SaleRecord>(
            r#"
            INSERT INTO sales (mill_id, customer_id, product_id, warehouse_id, quantity, rate,
                               total_amount, received_amount, payment_status, invoice_number, sale_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, mill_id, customer_id, product_id, warehouse_id, quantity, rate,
                      total_amount, received_amount, payment_status, invoice_number, sale_date, created_at
            "#,
        )
        .bind(mill_id)
        .bind(input.customer_id)
        .bind(input.product_id)
        .bind(input.warehouse_id)
        .bind(input.quantity)
        .bind(input.rate)
        .bind(total_amount)
        .bind(received_amount)
        .bind(payment_status.as_str())
        .bind(&invoice_number)
        .bind(sale_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(SaleReceipt {
            sale,
            inventory_item_id: item_id,
            current_stock: receipt.current_stock,
        })
    }

    /// Record a receipt against a sale
    pub async fn record_receipt(
        &self,
        mill_id: Uuid,
        sale_id: Uuid,
        input: RecordReceiptInput,
    ) -> AppResult<SaleRecord> {
        if input.amount <= Decimal::ZERO {
            return Err(AppError::Validation {
                field: "amount".to_string(),
                message: "Receipt amount must be positive".to_string(),
            });
        }

        // Atomic conditional increment. The cap is enforced in the same
        // statement, so concurrent receipts cannot jointly exceed the total.
        let updated = sqlx::query_as::<_, SaleRecord>(
            r#"
            UPDATE sales
            SET received_amount = received_amount + $1,
                payment_status = CASE
                    WHEN received_amount + $1 >= total_amount THEN 'paid'
                    ELSE 'partial'
                END
            WHERE id = $2 AND mill_id = $3 AND received_amount + $1 <= total_amount
            RETURNING id, mill_id, customer_id, product_id, warehouse_id, quantity, rate,
                      total_amount, received_amount, payment_status, invoice_number, sale_date, created_at
            "#,
        )
        .bind(input.amount)
        .bind(sale_id)
        .bind(mill_id)
        .fetch_optional(&self.db)
        .await?;

        match updated {
            Some(sale) => Ok(sale),
            None => {
                // Distinguish a missing sale from an over-cap receipt
                self.get_sale(mill_id, sale_id).await?;
                Err(AppError::Validation {
                    field: "amount".to_string(),
                    message: "Receipt exceeds outstanding amount".to_string(),
                })
            }
        }
    }

    /// Get a sale by id
    pub async fn get_sale(&self, mill_id: Uuid, sale_id: Uuid) -> AppResult<SaleRecord> {
        sqlx::query_as::<_, SaleRecord>(
            r#"
            SELECT id, mill_id, customer_id, product_id, warehouse_id, quantity, rate,
                   total_amount, received_amount, payment_status, invoice_number, sale_date, created_at
            FROM sales
            WHERE id = $1 AND mill_id = $2
            "#,
        )
        .bind(sale_id)
        .bind(mill_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale".to_string()))
    }

    /// List sales with optional customer and date filters
    pub async fn list_sales(
        &self,
        mill_id: Uuid,
        filter: SaleFilter,
    ) -> AppResult<PaginatedResponse<SaleRecord>> {
        let pagination = Pagination {
            page: filter.page.unwrap_or(1).max(1),
            per_page: filter.per_page.unwrap_or(20).clamp(1, 100),
        };

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM sales
            WHERE mill_id = $1
              AND ($2::uuid IS NULL OR customer_id = $2)
              AND ($3::date IS NULL OR sale_date >= $3)
              AND ($4::date IS NULL OR sale_date <= $4)
            "#,
        )
        .bind(mill_id)
        .bind(filter.customer_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_one(&self.db)
        .await?;

        let sales = sqlx::query_as::<_, SaleRecord>(
            r#"
            SELECT id, mill_id, customer_id, product_id, warehouse_id, quantity, rate,
                   total_amount, received_amount, payment_status, invoice_number, sale_date, created_at
            FROM sales
            WHERE mill_id = $1
              AND ($2::uuid IS NULL OR customer_id = $2)
              AND ($3::date IS NULL OR sale_date >= $3)
              AND ($4::date IS NULL OR sale_date <= $4)
            ORDER BY sale_date DESC, created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(mill_id)
        .bind(filter.customer_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: sales,
            pagination: PaginationMeta {
                page: pagination.page,
                per_page: pagination.per_page,
                total,
            },
        })
    }

    /// Generate the next sale invoice number for a mill
    async fn next_invoice_number(&self, mill_id: Uuid, year: i32) -> AppResult<String> {
        let mill_code =
            sqlx::query_scalar::<_, String>("SELECT mill_code FROM mills WHERE id = $1")
                .bind(mill_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Mill".to_string()))?;

        let sequence =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) + 1 FROM sales WHERE mill_id = $1")
                .bind(mill_id)
                .fetch_one(&self.db)
                .await?;

        Ok(generate_reference_number(&mill_code, "SAL", year, sequence))
    }
}
