//! HTTP handlers for purchase endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::purchase::{
    CreatePurchaseInput, PurchaseFilter, PurchaseReceipt, PurchaseRecord, PurchaseService,
    RecordPaymentInput,
};
use crate::AppState;
use shared::types::PaginatedResponse;

/// Record a purchase
pub async fn create_purchase(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePurchaseInput>,
) -> AppResult<(StatusCode, Json<PurchaseReceipt>)> {
    let service = PurchaseService::new(state.db);
    let receipt = service
        .create_purchase(current_user.0.mill_id, current_user.0.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Get a purchase
pub async fn get_purchase(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<Json<PurchaseRecord>> {
    let service = PurchaseService::new(state.db);
    let purchase = service
        .get_purchase(current_user.0.mill_id, purchase_id)
        .await?;
    Ok(Json(purchase))
}

/// List purchases with optional supplier and date filters
pub async fn list_purchases(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<PurchaseFilter>,
) -> AppResult<Json<PaginatedResponse<PurchaseRecord>>> {
    let service = PurchaseService::new(state.db);
    let purchases = service
        .list_purchases(current_user.0.mill_id, filter)
        .await?;
    Ok(Json(purchases))
}

/// Record a payment against a purchase
pub async fn record_payment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(purchase_id): Path<Uuid>,
    Json(input): Json<RecordPaymentInput>,
) -> AppResult<Json<PurchaseRecord>> {
    let service = PurchaseService::new(state.db);
    let purchase = service
        .record_payment(current_user.0.mill_id, purchase_id, input)
        .await?;
    Ok(Json(purchase))
}
