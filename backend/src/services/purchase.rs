//! Purchase service for wheat and bag procurement
//!
//! A purchase's stock effect is exactly one `in` movement recorded through
//! the stock ledger, in the same transaction as the purchase row. The
//! purchase code never touches `current_stock` itself.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::inventory::{
    GetOrCreateItemInput, InventoryService, RecordMovementInput,
};
use shared::models::{generate_reference_number, MovementType, PaymentStatus};
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};

/// Purchase service
#[derive(Clone)]
pub struct PurchaseService {
    db: PgPool,
}

/// Purchase row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PurchaseRecord {
    pub id: Uuid,
    pub mill_id: Uuid,
    pub supplier_id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub payment_status: String,
    pub invoice_number: String,
    pub purchase_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a purchase
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseInput {
    pub supplier_id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub paid_amount: Option<Decimal>,
    /// Generated from the mill code when omitted
    pub invoice_number: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    /// Low-stock threshold applied if this purchase creates the item
    pub minimum_stock: Option<Decimal>,
}

/// Input for recording a payment against a purchase
#[derive(Debug, Deserialize)]
pub struct RecordPaymentInput {
    pub amount: Decimal,
}

/// Persisted purchase plus the stock level it produced
#[derive(Debug, Serialize)]
pub struct PurchaseReceipt {
    #[serde(flatten)]
    pub purchase: PurchaseRecord,
    pub inventory_item_id: Uuid,
    pub current_stock: Decimal,
}

/// Filter for listing purchases
#[derive(Debug, Default, Deserialize)]
pub struct PurchaseFilter {
    pub supplier_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PurchaseService {
    /// Create a new PurchaseService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a purchase and its stock intake
    pub async fn create_purchase(
        &self,
        mill_id: Uuid,
        user_id: Uuid,
        input: CreatePurchaseInput,
    ) -> AppResult<PurchaseReceipt> {
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
        let paid_amount = input.paid_amount.unwrap_or(Decimal::ZERO);
        if paid_amount < Decimal::ZERO || paid_amount > total_amount {
            return Err(AppError::Validation {
                field: "paid_amount".to_string(),
                message: "Paid amount must be between zero and the total".to_string(),
            });
        }

        // Validate the supplier
        let is_supplier = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM parties WHERE id = $1 AND mill_id = $2 AND party_type = 'supplier')",
        )
        .bind(input.supplier_id)
        .bind(mill_id)
        .fetch_one(&self.db)
        .await?;

        if !is_supplier {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        // Resolve the inventory item first so the movement never references
        // a dangling row; this also validates product and warehouse
        let inventory = InventoryService::new(self.db.clone());
        let item = inventory
            .get_or_create_item(
                mill_id,
                GetOrCreateItemInput {
                    product_id: input.product_id,
                    warehouse_id: input.warehouse_id,
                    minimum_stock: input.minimum_stock,
                },
            )
            .await?;

        let purchase_date = input.purchase_date.unwrap_or_else(|| Utc::now().date_naive());
        let invoice_number = match input.invoice_number {
            Some(number) => number,
            None => self.next_invoice_number(mill_id, purchase_date.year()).await?,
        };

        let payment_status = PaymentStatus::derive(total_amount, paid_amount);

        let mut tx = self.db.begin().await?;

        let purchase = sqlx::query_as::<_, PurchaseRecord>(
            r#"
            INSERT INTO purchases (mill_id, supplier_id, product_id, warehouse_id, quantity, rate,
                                   total_amount, paid_amount, payment_status, invoice_number, purchase_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, mill_id, supplier_id, product_id, warehouse_id, quantity, rate,
                      total_amount, paid_amount, payment_status, invoice_number, purchase_date, created_at
            "#,
        )
        .bind(mill_id)
        .bind(input.supplier_id)
        .bind(input.product_id)
        .bind(input.warehouse_id)
        .bind(input.quantity)
        .bind(input.rate)
        .bind(total_amount)
        .bind(paid_amount)
        .bind(payment_status.as_str())
        .bind(&invoice_number)
        .bind(purchase_date)
        .fetch_one(&mut *tx)
        .await?;

        let receipt = InventoryService::apply_movement(
            &mut tx,
            mill_id,
            Some(user_id),
            &RecordMovementInput {
                inventory_item_id: item.id,
                movement_type: MovementType::In,
                quantity: input.quantity,
                reason: "purchase".to_string(),
                reference_number: invoice_number.clone(),
            },
        )
        .await?;

        tx.commit().await?;

        Ok(PurchaseReceipt {
            purchase,
            inventory_item_id: item.id,
            current_stock: receipt.current_stock,
        })
    }

    /// Record a payment against a purchase
    pub async fn record_payment(
        &self,
        mill_id: Uuid,
        purchase_id: Uuid,
        input: RecordPaymentInput,
    ) -> AppResult<PurchaseRecord> {
        if input.amount <= Decimal::ZERO {
            return Err(AppError::Validation {
                field: "amount".to_string(),
                message: "Payment amount must be positive".to_string(),
            });
        }

        // Atomic conditional increment. The cap is enforced in the same
        // statement, so concurrent payments cannot jointly exceed the total.
        let updated = sqlx::query_as::<_, PurchaseRecord>(
            r#"
            UPDATE purchases
            SET paid_amount = paid_amount + $1,
                payment_status = CASE
                    WHEN paid_amount + $1 >= total_amount THEN 'paid'
                    ELSE 'partial'
                END
            WHERE id = $2 AND mill_id = $3 AND paid_amount + $1 <= total_amount
            RETURNING id, mill_id, supplier_id, product_id, warehouse_id, quantity, rate,
                      total_amount, paid_amount, payment_status, invoice_number, purchase_date, created_at
            "#,
        )
        .bind(input.amount)
        .bind(purchase_id)
        .bind(mill_id)
        .fetch_optional(&self.db)
        .await?;

        match updated {
            Some(purchase) => Ok(purchase),
            None => {
                // Distinguish a missing purchase from an over-cap payment
                self.get_purchase(mill_id, purchase_id).await?;
                Err(AppError::Validation {
                    field: "amount".to_string(),
                    message: "Payment exceeds outstanding amount".to_string(),
                })
            }
        }
    }

    /// Get a purchase by id
    pub async fn get_purchase(&self, mill_id: Uuid, purchase_id: Uuid) -> AppResult<PurchaseRecord> {
        sqlx::query_as::<_, PurchaseRecord>(
            r#"
            SELECT id, mill_id, supplier_id, product_id, warehouse_id, quantity, rate,
                   total_amount, paid_amount, payment_status, invoice_number, purchase_date, created_at
            FROM purchases
            WHERE id = $1 AND mill_id = $2
            "#,
        )
        .bind(purchase_id)
        .bind(mill_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase".to_string()))
    }

    /// List purchases with optional supplier and date filters
    pub async fn list_purchases(
        &self,
        mill_id: Uuid,
        filter: PurchaseFilter,
    ) -> AppResult<PaginatedResponse<PurchaseRecord>> {
        let pagination = Pagination {
            page: filter.page.unwrap_or(1).max(1),
            per_page: filter.per_page.unwrap_or(20).clamp(1, 100),
        };

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM purchases
            WHERE mill_id = $1
              AND ($2::uuid IS NULL OR supplier_id = $2)
              AND ($3::date IS NULL OR purchase_date >= $3)
              AND ($4::date IS NULL OR purchase_date <= $4)
            "#,
        )
        .bind(mill_id)
        .bind(filter.supplier_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_one(&self.db)
        .await?;

        let purchases = sqlx::query_as::<_, PurchaseRecord>(
            r#"
            SELECT id, mill_id, supplier_id, product_id, warehouse_id, quantity, rate,
                   total_amount, paid_amount, payment_status, invoice_number, purchase_date, created_at
            FROM purchases
            WHERE mill_id = $1
              AND ($2::uuid IS NULL OR supplier_id = $2)
              AND ($3::date IS NULL OR purchase_date >= $3)
              AND ($4::date IS NULL OR purchase_date <= $4)
            ORDER BY purchase_date DESC, created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(mill_id)
        .bind(filter.supplier_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: purchases,
            pagination: PaginationMeta {
                page: pagination.page,
                per_page: pagination.per_page,
                total,
            },
        })
    }

    /// Generate the next purchase invoice number for a mill
    async fn next_invoice_number(&self, mill_id: Uuid, year: i32) -> AppResult<String> {
        let mill_code =
            sqlx::query_scalar::<_, String>("SELECT mill_code FROM mills WHERE id = $1")
                .bind(mill_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Mill".to_string()))?;

        let sequence =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) + 1 FROM purchases WHERE mill_id = $1")
                .bind(mill_id)
                .fetch_one(&self.db)
                .await?;

        Ok(generate_reference_number(&mill_code, "PUR", year, sequence))
    }
}
