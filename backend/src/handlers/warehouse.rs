//! HTTP handlers for warehouse endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::warehouse::{
    CreateWarehouseInput, UpdateWarehouseInput, WarehouseRecord, WarehouseService,
};
use crate::AppState;

/// Create a warehouse
pub async fn create_warehouse(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateWarehouseInput>,
) -> AppResult<(StatusCode, Json<WarehouseRecord>)> {
    let service = WarehouseService::new(state.db);
    let warehouse = service
        .create_warehouse(current_user.0.mill_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(warehouse)))
}

/// Get a warehouse
pub async fn get_warehouse(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(warehouse_id): Path<Uuid>,
) -> AppResult<Json<WarehouseRecord>> {
    let service = WarehouseService::new(state.db);
    let warehouse = service
        .get_warehouse(current_user.0.mill_id, warehouse_id)
        .await?;
    Ok(Json(warehouse))
}

/// List warehouses
pub async fn list_warehouses(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<WarehouseRecord>>> {
    let service = WarehouseService::new(state.db);
    let warehouses = service.list_warehouses(current_user.0.mill_id).await?;
    Ok(Json(warehouses))
}

/// Update a warehouse
pub async fn update_warehouse(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(warehouse_id): Path<Uuid>,
    Json(input): Json<UpdateWarehouseInput>,
) -> AppResult<Json<WarehouseRecord>> {
    let service = WarehouseService::new(state.db);
    let warehouse = service
        .update_warehouse(current_user.0.mill_id, warehouse_id, input)
        .await?;
    Ok(Json(warehouse))
}

/// Delete a warehouse
pub async fn delete_warehouse(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(warehouse_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = WarehouseService::new(state.db);
    service
        .delete_warehouse(current_user.0.mill_id, warehouse_id)
        .await?;
    Ok(Json(()))
}
