//! HTTP handlers for sale endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::sale::{
    CreateSaleInput, RecordReceiptInput, SaleFilter, SaleReceipt, SaleRecord, SaleService,
};
use crate::AppState;
use shared::types::PaginatedResponse;

/// Record a sale
pub async fn create_sale(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateSaleInput>,
) -> AppResult<(StatusCode, Json<SaleReceipt>)> {
    let service = SaleService::new(state.db);
    let receipt = service
        .create_sale(current_user.0.mill_id, current_user.0.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Get a sale
pub async fn get_sale(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(sale_id): Path<Uuid>,
) -> AppResult<Json<SaleRecord>> {
    let service = SaleService::new(state.db);
    let sale = service.get_sale(current_user.0.mill_id, sale_id).await?;
    Ok(Json(sale))
}

/// List sales with optional customer and date filters
pub async fn list_sales(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<SaleFilter>,
) -> AppResult<Json<PaginatedResponse<SaleRecord>>> {
    let service = SaleService::new(state.db);
    let sales = service.list_sales(current_user.0.mill_id, filter).await?;
    Ok(Json(sales))
}

/// Record a receipt against a sale
pub async fn record_receipt(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(sale_id): Path<Uuid>,
    Json(input): Json<RecordReceiptInput>,
) -> AppResult<Json<SaleRecord>> {
    let service = SaleService::new(state.db);
    let sale = service
        .record_receipt(current_user.0.mill_id, sale_id, input)
        .await?;
    Ok(Json(sale))
}
