//! HTTP handlers for stock ledger endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::inventory::{
    AuditReport, GetOrCreateItemInput, InventoryItemRecord, InventoryService, ItemFilter,
    MovementReceipt, RecalculationReport, RecordMovementInput, StockMovementRecord,
};
use crate::AppState;

#[derive(Deserialize)]
pub struct RecentMovementsQuery {
    pub limit: Option<i64>,
}

/// Record a stock movement
pub async fn record_movement(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordMovementInput>,
) -> AppResult<Json<MovementReceipt>> {
    let service = InventoryService::new(state.db);
    let receipt = service
        .record_movement(current_user.0.mill_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(receipt))
}

/// Get or create the inventory item for a product/warehouse pair
pub async fn get_or_create_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<GetOrCreateItemInput>,
) -> AppResult<(StatusCode, Json<InventoryItemRecord>)> {
    let service = InventoryService::new(state.db);
    let item = service
        .get_or_create_item(current_user.0.mill_id, input)
        .await?;
    Ok((StatusCode::OK, Json(item)))
}

/// Get an inventory item
pub async fn get_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<InventoryItemRecord>> {
    let service = InventoryService::new(state.db);
    let item = service.get_item(current_user.0.mill_id, item_id).await?;
    Ok(Json(item))
}

/// List inventory items, optionally filtered by warehouse and status
pub async fn list_items(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<ItemFilter>,
) -> AppResult<Json<Vec<InventoryItemRecord>>> {
    let service = InventoryService::new(state.db);
    let items = service.list_items(current_user.0.mill_id, filter).await?;
    Ok(Json(items))
}

/// Get the movement history for an item
pub async fn get_item_movements(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<Vec<StockMovementRecord>>> {
    let service = InventoryService::new(state.db);
    let movements = service
        .get_item_movements(current_user.0.mill_id, item_id)
        .await?;
    Ok(Json(movements))
}

/// List recent movements across all items
pub async fn list_recent_movements(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<RecentMovementsQuery>,
) -> AppResult<Json<Vec<StockMovementRecord>>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let service = InventoryService::new(state.db);
    let movements = service
        .list_recent_movements(current_user.0.mill_id, limit)
        .await?;
    Ok(Json(movements))
}

/// Rebuild every item's stock level from its movement ledger.
/// Restricted to owners and managers.
pub async fn recalculate_all(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<RecalculationReport>> {
    if !current_user.0.can_run_maintenance() {
        return Err(AppError::InsufficientPermissions);
    }

    let service = InventoryService::new(state.db);
    let report = service.recalculate_all(current_user.0.mill_id).await?;
    Ok(Json(report))
}

/// Report items whose stock level disagrees with their ledger.
/// Read-only; restricted to owners and managers.
pub async fn audit_consistency(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<AuditReport>> {
    if !current_user.0.can_run_maintenance() {
        return Err(AppError::InsufficientPermissions);
    }

    let service = InventoryService::new(state.db);
    let report = service.audit_consistency(current_user.0.mill_id).await?;
    Ok(Json(report))
}
