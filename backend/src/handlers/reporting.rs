//! HTTP handlers for dashboard and reporting endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::reporting::{
    DashboardMetrics, MovementReportEntry, PurchaseSummaryEntry, ReportFilter, ReportingService,
    SalesSummaryEntry, StockReportEntry,
};
use crate::AppState;

/// Get dashboard metrics
pub async fn get_dashboard(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<DashboardMetrics>> {
    let service = ReportingService::new(state.db);
    let metrics = service.get_dashboard_metrics(current_user.0.mill_id).await?;
    Ok(Json(metrics))
}

/// Get the current stock position
pub async fn get_stock_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<StockReportEntry>>> {
    let service = ReportingService::new(state.db);
    let report = service.get_stock_report(current_user.0.mill_id).await?;
    Ok(Json(report))
}

/// Get per-product purchase totals for a period
pub async fn get_purchase_summary(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<Vec<PurchaseSummaryEntry>>> {
    let service = ReportingService::new(state.db);
    let report = service
        .get_purchase_summary(current_user.0.mill_id, &filter)
        .await?;
    Ok(Json(report))
}

/// Get per-product sale totals for a period
pub async fn get_sales_summary(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<Vec<SalesSummaryEntry>>> {
    let service = ReportingService::new(state.db);
    let report = service
        .get_sales_summary(current_user.0.mill_id, &filter)
        .await?;
    Ok(Json(report))
}

/// Get recent stock movements with product and warehouse names
pub async fn get_movement_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<Vec<MovementReportEntry>>> {
    let service = ReportingService::new(state.db);
    let report = service
        .get_movement_report(current_user.0.mill_id, &filter)
        .await?;
    Ok(Json(report))
}
