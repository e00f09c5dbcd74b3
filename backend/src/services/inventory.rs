//! Stock ledger service: the single write path for inventory aggregates
//!
//! Every stock change is an append-only `stock_movements` row plus an
//! in-place increment of the owning item's `current_stock`, performed in
//! one database transaction. No other code writes `current_stock`; the
//! replay (`recalculate_all`) and audit (`audit_consistency`) operations
//! exist to repair and detect drift against the movement log.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{MovementType, StockStatus};

/// Inventory service for the stock ledger and item registry
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Inventory item row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InventoryItemRecord {
    pub id: Uuid,
    pub mill_id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub current_stock: Decimal,
    pub minimum_stock: Decimal,
    pub unit: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stock movement ledger row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockMovementRecord {
    pub id: Uuid,
    pub mill_id: Uuid,
    pub inventory_item_id: Uuid,
    pub warehouse_id: Uuid,
    pub movement_type: String,
    pub quantity: Decimal,
    pub reason: String,
    pub reference_number: String,
    pub recorded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a stock movement
#[derive(Debug, Clone, Deserialize)]
pub struct RecordMovementInput {
    pub inventory_item_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: Decimal,
    pub reason: String,
    pub reference_number: String,
}

/// Persisted movement plus the post-update aggregate, returned to the caller
#[derive(Debug, Serialize)]
pub struct MovementReceipt {
    #[serde(flatten)]
    pub movement: StockMovementRecord,
    pub current_stock: Decimal,
    pub status: StockStatus,
}

/// Input for resolving an inventory item before its first movement
#[derive(Debug, Deserialize)]
pub struct GetOrCreateItemInput {
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    /// Low-stock threshold; defaults to zero for a new item
    pub minimum_stock: Option<Decimal>,
}

/// One repaired item in a recalculation report
#[derive(Debug, Serialize)]
pub struct RecalculatedItem {
    pub inventory_item_id: Uuid,
    pub previous_stock: Decimal,
    pub recalculated_stock: Decimal,
}

/// Full-replay result
#[derive(Debug, Serialize)]
pub struct RecalculationReport {
    pub items_checked: usize,
    pub items_repaired: Vec<RecalculatedItem>,
}

/// One drifted item in a consistency audit
#[derive(Debug, Serialize, FromRow)]
pub struct DriftEntry {
    pub inventory_item_id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub expected_stock: Decimal,
    pub actual_stock: Decimal,
    pub difference: Decimal,
}

/// Read-only consistency audit result
#[derive(Debug, Serialize)]
pub struct AuditReport {
    pub items_checked: i64,
    pub drifted: Vec<DriftEntry>,
}

/// Filter for listing inventory items
#[derive(Debug, Default, Deserialize)]
pub struct ItemFilter {
    pub warehouse_id: Option<Uuid>,
    pub status: Option<StockStatus>,
}

/// Row for the pre-replay snapshot
#[derive(Debug, FromRow)]
struct StockSnapshotRow {
    id: Uuid,
    current_stock: Decimal,
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Idempotent lookup-or-create for the (product, warehouse) item.
    ///
    /// The row is committed before this returns, so a movement recorded
    /// immediately afterwards never references a dangling item.
    pub async fn get_or_create_item(
        &self,
        mill_id: Uuid,
        input: GetOrCreateItemInput,
    ) -> AppResult<InventoryItemRecord> {
        // Validate product belongs to mill and fetch its unit for defaults
        let product_unit = sqlx::query_scalar::<_, String>(
            "SELECT unit FROM products WHERE id = $1 AND mill_id = $2",
        )
        .bind(input.product_id)
        .bind(mill_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        // Validate warehouse belongs to mill
        let warehouse_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM warehouses WHERE id = $1 AND mill_id = $2)",
        )
        .bind(input.warehouse_id)
        .bind(mill_id)
        .fetch_one(&self.db)
        .await?;

        if !warehouse_exists {
            return Err(AppError::NotFound("Warehouse".to_string()));
        }

        let minimum_stock = input.minimum_stock.unwrap_or(Decimal::ZERO);

        // Atomic upsert: a concurrent create for the same pair resolves to
        // the same row, never a duplicate
        let item = sqlx::query_as::<_, InventoryItemRecord>(
            r#"
            INSERT INTO inventory_items (mill_id, product_id, warehouse_id, current_stock, minimum_stock, unit, status)
            VALUES ($1, $2, $3, 0, $4, $5, 'out_of_stock')
            ON CONFLICT (product_id, warehouse_id) DO UPDATE SET updated_at = NOW()
            RETURNING id, mill_id, product_id, warehouse_id, current_stock, minimum_stock,
                      unit, status, created_at, updated_at
            "#,
        )
        .bind(mill_id)
        .bind(input.product_id)
        .bind(input.warehouse_id)
        .bind(minimum_stock)
        .bind(&product_unit)
        .fetch_one(&self.db)
        .await?;

        Ok(item)
    }

    /// Record a stock movement: one ledger row, one aggregate adjustment,
    /// one transaction.
    pub async fn record_movement(
        &self,
        mill_id: Uuid,
        user_id: Uuid,
        input: RecordMovementInput,
    ) -> AppResult<MovementReceipt> {
        let mut tx = self.db.begin().await?;
        let receipt = Self::apply_movement(&mut tx, mill_id, Some(user_id), &input).await?;
        tx.commit().await?;
        Ok(receipt)
    }

    /// Apply a movement on an open transaction.
    ///
    /// Services that bundle several movements into one logical event
    /// (purchases, sales, milling batches) call this so all their ledger
    /// writes commit or roll back together. This is the only code that
    /// mutates `current_stock`.
    pub(crate) async fn apply_movement(
        conn: &mut PgConnection,
        mill_id: Uuid,
        user_id: Option<Uuid>,
        input: &RecordMovementInput,
    ) -> AppResult<MovementReceipt> {
        // Validate quantity
        if input.quantity <= Decimal::ZERO {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity must be positive".to_string(),
            });
        }

        // Atomic in-place increment. The `out` branch is conditional on
        // sufficient stock, so concurrent withdrawals cannot overdraw.
        let updated = match input.movement_type {
            MovementType::In => {
                sqlx::query_as::<_, (Uuid, Decimal, Decimal)>(
                    r#"
                    UPDATE inventory_items
                    SET current_stock = current_stock + $1, updated_at = NOW()
                    WHERE id = $2 AND mill_id = $3
                    RETURNING warehouse_id, current_stock, minimum_stock
                    "#,
                )
                .bind(input.quantity)
                .bind(input.inventory_item_id)
                .bind(mill_id)
                .fetch_optional(&mut *conn)
                .await?
            }
            MovementType::Out => {
                sqlx::query_as::<_, (Uuid, Decimal, Decimal)>(
                    r#"
                    UPDATE inventory_items
                    SET current_stock = current_stock - $1, updated_at = NOW()
                    WHERE id = $2 AND mill_id = $3 AND current_stock >= $1
                    RETURNING warehouse_id, current_stock, minimum_stock
                    "#,
                )
                .bind(input.quantity)
                .bind(input.inventory_item_id)
                .bind(mill_id)
                .fetch_optional(&mut *conn)
                .await?
            }
        };

        let (warehouse_id, current_stock, minimum_stock) = match updated {
            Some(row) => row,
            None => {
                // Distinguish a missing item from an insufficient withdrawal
                let available = sqlx::query_scalar::<_, Decimal>(
                    "SELECT current_stock FROM inventory_items WHERE id = $1 AND mill_id = $2",
                )
                .bind(input.inventory_item_id)
                .bind(mill_id)
                .fetch_optional(&mut *conn)
                .await?;

                return match available {
                    Some(stock) => Err(AppError::InsufficientStock(format!(
                        "Requested {} but only {} in stock",
                        input.quantity, stock
                    ))),
                    None => Err(AppError::NotFound("Inventory item".to_string())),
                };
            }
        };

        // Status is a pure function of the new stock level
        let status = StockStatus::derive(current_stock, minimum_stock);
        sqlx::query("UPDATE inventory_items SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(input.inventory_item_id)
            .execute(&mut *conn)
            .await?;

        // Append the ledger entry
        let movement = sqlx::query_as::<_, StockMovementRecord>(
            r#"
            INSERT INTO stock_movements (mill_id, inventory_item_id, warehouse_id, movement_type,
                                         quantity, reason, reference_number, recorded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, mill_id, inventory_item_id, warehouse_id, movement_type, quantity,
                      reason, reference_number, recorded_by, created_at
            "#,
        )
        .bind(mill_id)
        .bind(input.inventory_item_id)
        .bind(warehouse_id)
        .bind(input.movement_type.as_str())
        .bind(input.quantity)
        .bind(&input.reason)
        .bind(&input.reference_number)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(MovementReceipt {
            movement,
            current_stock,
            status,
        })
    }

    /// Full-log replay: reset every item's aggregate to zero, fold the
    /// movement log, persist the sums, and refresh statuses.
    ///
    /// Idempotent, and intended as an offline maintenance operation; it is
    /// not safe to run concurrently with live movement traffic.
    pub async fn recalculate_all(&self, mill_id: Uuid) -> AppResult<RecalculationReport> {
        let mut tx = self.db.begin().await?;

        // Snapshot the cached values so the report can show what changed
        let before = sqlx::query_as::<_, StockSnapshotRow>(
            "SELECT id, current_stock FROM inventory_items WHERE mill_id = $1",
        )
        .bind(mill_id)
        .fetch_all(&mut *tx)
        .await?;

        // Reset, then fold the ledger per item
        sqlx::query("UPDATE inventory_items SET current_stock = 0 WHERE mill_id = $1")
            .bind(mill_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            UPDATE inventory_items i
            SET current_stock = m.net, updated_at = NOW()
            FROM (
                SELECT inventory_item_id,
                       SUM(CASE WHEN movement_type = 'in' THEN quantity ELSE -quantity END) AS net
                FROM stock_movements
                WHERE mill_id = $1
                GROUP BY inventory_item_id
            ) m
            WHERE m.inventory_item_id = i.id AND i.mill_id = $1
            "#,
        )
        .bind(mill_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE inventory_items
            SET status = CASE
                WHEN current_stock <= 0 THEN 'out_of_stock'
                WHEN current_stock <= minimum_stock THEN 'low_stock'
                ELSE 'active'
            END
            WHERE mill_id = $1
            "#,
        )
        .bind(mill_id)
        .execute(&mut *tx)
        .await?;

        let after = sqlx::query_as::<_, StockSnapshotRow>(
            "SELECT id, current_stock FROM inventory_items WHERE mill_id = $1",
        )
        .bind(mill_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let previous: std::collections::HashMap<Uuid, Decimal> =
            before.iter().map(|r| (r.id, r.current_stock)).collect();

        let items_repaired: Vec<RecalculatedItem> = after
            .iter()
            .filter_map(|row| {
                let prev = previous.get(&row.id).copied()?;
                if prev != row.current_stock {
                    Some(RecalculatedItem {
                        inventory_item_id: row.id,
                        previous_stock: prev,
                        recalculated_stock: row.current_stock,
                    })
                } else {
                    None
                }
            })
            .collect();

        tracing::info!(
            checked = after.len(),
            repaired = items_repaired.len(),
            "Stock recalculation completed"
        );

        Ok(RecalculationReport {
            items_checked: after.len(),
            items_repaired,
        })
    }

    /// Read-only drift check: recompute each item's expected stock from its
    /// movements and report every item whose cached aggregate disagrees.
    /// Never repairs anything.
    pub async fn audit_consistency(&self, mill_id: Uuid) -> AppResult<AuditReport> {
        let items_checked = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM inventory_items WHERE mill_id = $1",
        )
        .bind(mill_id)
        .fetch_one(&self.db)
        .await?;

        let drifted = sqlx::query_as::<_, DriftEntry>(
            r#"
            SELECT i.id AS inventory_item_id, i.product_id, i.warehouse_id,
                   COALESCE(SUM(CASE WHEN m.movement_type = 'in' THEN m.quantity ELSE -m.quantity END), 0) AS expected_stock,
                   i.current_stock AS actual_stock,
                   i.current_stock - COALESCE(SUM(CASE WHEN m.movement_type = 'in' THEN m.quantity ELSE -m.quantity END), 0) AS difference
            FROM inventory_items i
            LEFT JOIN stock_movements m ON m.inventory_item_id = i.id
            WHERE i.mill_id = $1
            GROUP BY i.id, i.product_id, i.warehouse_id, i.current_stock
            HAVING i.current_stock <> COALESCE(SUM(CASE WHEN m.movement_type = 'in' THEN m.quantity ELSE -m.quantity END), 0)
            "#,
        )
        .bind(mill_id)
        .fetch_all(&self.db)
        .await?;

        if !drifted.is_empty() {
            tracing::warn!(drifted = drifted.len(), "Stock drift detected");
        }

        Ok(AuditReport {
            items_checked,
            drifted,
        })
    }

    /// Get a single inventory item
    pub async fn get_item(&self, mill_id: Uuid, item_id: Uuid) -> AppResult<InventoryItemRecord> {
        sqlx::query_as::<_, InventoryItemRecord>(
            r#"
            SELECT id, mill_id, product_id, warehouse_id, current_stock, minimum_stock,
                   unit, status, created_at, updated_at
            FROM inventory_items
            WHERE id = $1 AND mill_id = $2
            "#,
        )
        .bind(item_id)
        .bind(mill_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))
    }

    /// List inventory items, optionally filtered by warehouse and status
    pub async fn list_items(
        &self,
        mill_id: Uuid,
        filter: ItemFilter,
    ) -> AppResult<Vec<InventoryItemRecord>> {
        let items = sqlx::query_as::<_, InventoryItemRecord>(
            r#"
            SELECT id, mill_id, product_id, warehouse_id, current_stock, minimum_stock,
                   unit, status, created_at, updated_at
            FROM inventory_items
            WHERE mill_id = $1
              AND ($2::uuid IS NULL OR warehouse_id = $2)
              AND ($3::text IS NULL OR status = $3)
            ORDER BY created_at
            "#,
        )
        .bind(mill_id)
        .bind(filter.warehouse_id)
        .bind(filter.status.map(|s| s.as_str().to_string()))
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    /// Get the movement history for an item, newest first
    pub async fn get_item_movements(
        &self,
        mill_id: Uuid,
        item_id: Uuid,
    ) -> AppResult<Vec<StockMovementRecord>> {
        let item_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM inventory_items WHERE id = $1 AND mill_id = $2)",
        )
        .bind(item_id)
        .bind(mill_id)
        .fetch_one(&self.db)
        .await?;

        if !item_exists {
            return Err(AppError::NotFound("Inventory item".to_string()));
        }

        let movements = sqlx::query_as::<_, StockMovementRecord>(
            r#"
            SELECT id, mill_id, inventory_item_id, warehouse_id, movement_type, quantity,
                   reason, reference_number, recorded_by, created_at
            FROM stock_movements
            WHERE inventory_item_id = $1 AND mill_id = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(item_id)
        .bind(mill_id)
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }

    /// List recent movements across all items
    pub async fn list_recent_movements(
        &self,
        mill_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<StockMovementRecord>> {
        let movements = sqlx::query_as::<_, StockMovementRecord>(
            r#"
            SELECT id, mill_id, inventory_item_id, warehouse_id, movement_type, quantity,
                   reason, reference_number, recorded_by, created_at
            FROM stock_movements
            WHERE mill_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(mill_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }
}
