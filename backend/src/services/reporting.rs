//! Reporting service for dashboards and stock analytics
//! Provides stock position, trade summaries, and movement history reports

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use shared::types::DateRange;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Stock position report entry
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct StockReportEntry {
    pub inventory_item_id: Uuid,
    pub product_name: String,
    pub category: String,
    pub unit: String,
    pub warehouse_name: String,
    pub current_stock: Decimal,
    pub minimum_stock: Decimal,
    pub status: String,
    pub movement_count: i64,
}

/// Per-product purchase totals over a period
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct PurchaseSummaryEntry {
    pub product_id: Uuid,
    pub product_name: String,
    pub purchase_count: i64,
    pub total_quantity: Decimal,
    pub total_amount: Decimal,
    pub total_paid: Decimal,
    pub outstanding: Decimal,
}

/// Per-product sale totals over a period
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct SalesSummaryEntry {
    pub product_id: Uuid,
    pub product_name: String,
    pub sale_count: i64,
    pub total_quantity: Decimal,
    pub total_amount: Decimal,
    pub total_received: Decimal,
    pub outstanding: Decimal,
}

/// One recent stock movement with product and warehouse names
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct MovementReportEntry {
    pub movement_id: Uuid,
    pub product_name: String,
    pub warehouse_name: String,
    pub movement_type: String,
    pub quantity: Decimal,
    pub reason: String,
    pub reference_number: String,
    pub created_at: DateTime<Utc>,
}

/// Dashboard metrics
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub total_products: i64,
    pub low_stock_items: i64,
    pub out_of_stock_items: i64,
    pub purchases_this_month: Decimal,
    pub sales_this_month: Decimal,
    pub payable_outstanding: Decimal,
    pub receivable_outstanding: Decimal,
    pub batches_this_month: i64,
}

/// Report filter parameters
#[derive(Debug, Default, Deserialize)]
pub struct ReportFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get the current stock position across all warehouses
    pub async fn get_stock_report(&self, mill_id: Uuid) -> AppResult<Vec<StockReportEntry>> {
        let entries = sqlx::query_as::<_, StockReportEntry>(
            r#"
            SELECT
                i.id as inventory_item_id,
                p.name as product_name,
                p.category,
                p.unit,
                w.name as warehouse_name,
                i.current_stock,
                i.minimum_stock,
                i.status,
                COUNT(m.id) as movement_count
            FROM inventory_items i
            JOIN products p ON p.id = i.product_id
            JOIN warehouses w ON w.id = i.warehouse_id
            LEFT JOIN stock_movements m ON m.inventory_item_id = i.id
            WHERE i.mill_id = $1
            GROUP BY i.id, p.name, p.category, p.unit, w.name,
                     i.current_stock, i.minimum_stock, i.status
            ORDER BY w.name, p.name
            "#,
        )
        .bind(mill_id)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    /// Get per-product purchase totals for a period
    pub async fn get_purchase_summary(
        &self,
        mill_id: Uuid,
        filter: &ReportFilter,
    ) -> AppResult<Vec<PurchaseSummaryEntry>> {
        let range = filter_bounds(filter);

        let entries = sqlx::query_as::<_, PurchaseSummaryEntry>(
            r#"
            SELECT
                p.id as product_id,
                p.name as product_name,
                COUNT(*) as purchase_count,
                COALESCE(SUM(pu.quantity), 0) as total_quantity,
                COALESCE(SUM(pu.total_amount), 0) as total_amount,
                COALESCE(SUM(pu.paid_amount), 0) as total_paid,
                COALESCE(SUM(pu.total_amount - pu.paid_amount), 0) as outstanding
            FROM purchases pu
            JOIN products p ON p.id = pu.product_id
            WHERE pu.mill_id = $1
              AND pu.purchase_date BETWEEN $2 AND $3
            GROUP BY p.id, p.name
            ORDER BY total_amount DESC
            "#,
        )
        .bind(mill_id)
        .bind(range.start_date)
        .bind(range.end_date)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    /// Get per-product sale totals for a period
    pub async fn get_sales_summary(
        &self,
        mill_id: Uuid,
        filter: &ReportFilter,
    ) -> AppResult<Vec<SalesSummaryEntry>> {
        let range = filter_bounds(filter);

        let entries = sqlx::query_as::<_, SalesSummaryEntry>(
            r#"
            SELECT
                p.id as product_id,
                p.name as product_name,
                COUNT(*) as sale_count,
                COALESCE(SUM(s.quantity), 0) as total_quantity,
                COALESCE(SUM(s.total_amount), 0) as total_amount,
                COALESCE(SUM(s.received_amount), 0) as total_received,
                COALESCE(SUM(s.total_amount - s.received_amount), 0) as outstanding
            FROM sales s
            JOIN products p ON p.id = s.product_id
            WHERE s.mill_id = $1
              AND s.sale_date BETWEEN $2 AND $3
            GROUP BY p.id, p.name
            ORDER BY total_amount DESC
            "#,
        )
        .bind(mill_id)
        .bind(range.start_date)
        .bind(range.end_date)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    /// Get recent stock movements with product and warehouse names
    pub async fn get_movement_report(
        &self,
        mill_id: Uuid,
        filter: &ReportFilter,
    ) -> AppResult<Vec<MovementReportEntry>> {
        let range = filter_bounds(filter);

        let entries = sqlx::query_as::<_, MovementReportEntry>(
            r#"
            SELECT
                m.id as movement_id,
                p.name as product_name,
                w.name as warehouse_name,
                m.movement_type,
                m.quantity,
                m.reason,
                m.reference_number,
                m.created_at
            FROM stock_movements m
            JOIN inventory_items i ON i.id = m.inventory_item_id
            JOIN products p ON p.id = i.product_id
            JOIN warehouses w ON w.id = m.warehouse_id
            WHERE m.mill_id = $1
              AND m.created_at::date BETWEEN $2 AND $3
            ORDER BY m.created_at DESC
            LIMIT 500
            "#,
        )
        .bind(mill_id)
        .bind(range.start_date)
        .bind(range.end_date)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    /// Get dashboard metrics
    pub async fn get_dashboard_metrics(&self, mill_id: Uuid) -> AppResult<DashboardMetrics> {
        let total_products: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE mill_id = $1 AND is_active = true",
        )
        .bind(mill_id)
        .fetch_one(&self.db)
        .await?;

        // Low and out-of-stock item counts
        let stock_counts: (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'low_stock') as low,
                COUNT(*) FILTER (WHERE status = 'out_of_stock') as out
            FROM inventory_items WHERE mill_id = $1
            "#,
        )
        .bind(mill_id)
        .fetch_one(&self.db)
        .await?;

        let purchases_this_month: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_amount), 0) FROM purchases
            WHERE mill_id = $1
              AND purchase_date >= DATE_TRUNC('month', CURRENT_DATE)
            "#,
        )
        .bind(mill_id)
        .fetch_one(&self.db)
        .await?;

        let sales_this_month: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_amount), 0) FROM sales
            WHERE mill_id = $1
              AND sale_date >= DATE_TRUNC('month', CURRENT_DATE)
            "#,
        )
        .bind(mill_id)
        .fetch_one(&self.db)
        .await?;

        let payable_outstanding: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_amount - paid_amount), 0) FROM purchases WHERE mill_id = $1",
        )
        .bind(mill_id)
        .fetch_one(&self.db)
        .await?;

        let receivable_outstanding: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_amount - received_amount), 0) FROM sales WHERE mill_id = $1",
        )
        .bind(mill_id)
        .fetch_one(&self.db)
        .await?;

        let batches_this_month: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM milling_batches
            WHERE mill_id = $1
              AND batch_date >= DATE_TRUNC('month', CURRENT_DATE)
            "#,
        )
        .bind(mill_id)
        .fetch_one(&self.db)
        .await?;

        Ok(DashboardMetrics {
            total_products,
            low_stock_items: stock_counts.0,
            out_of_stock_items: stock_counts.1,
            purchases_this_month,
            sales_this_month,
            payable_outstanding,
            receivable_outstanding,
            batches_this_month,
        })
    }
}

fn filter_bounds(filter: &ReportFilter) -> DateRange {
    let start_date = filter
        .start_date
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
    let end_date = filter
        .end_date
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(2100, 12, 31).unwrap());
    DateRange { start_date, end_date }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_bounds_default_covers_today() {
        let range = filter_bounds(&ReportFilter::default());
        assert!(range.contains(Utc::now().date_naive()));
    }

    /// The movement report lists named movements, not per-day aggregates
    #[test]
    fn test_movement_report_entry_carries_names() {
        let entry = MovementReportEntry {
            movement_id: Uuid::nil(),
            product_name: "Fine Flour".to_string(),
            warehouse_name: "Main Godown".to_string(),
            movement_type: "out".to_string(),
            quantity: Decimal::ONE,
            reason: "sale".to_string(),
            reference_number: "SAL-FMM-2025-0001".to_string(),
            created_at: Utc::now(),
        };
        assert_eq!(entry.product_name, "Fine Flour");
        assert_eq!(entry.warehouse_name, "Main Godown");
    }
}
