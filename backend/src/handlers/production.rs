//! HTTP handlers for milling batch endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::production::{
    BatchRecord, BatchResponse, CreateBatchInput, ProductionService,
};
use crate::AppState;

/// Run a milling batch
pub async fn create_batch(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateBatchInput>,
) -> AppResult<(StatusCode, Json<BatchResponse>)> {
    let service = ProductionService::new(state.db);
    let batch = service
        .create_batch(current_user.0.mill_id, current_user.0.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(batch)))
}

/// Get a batch with its outputs
pub async fn get_batch(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<BatchResponse>> {
    let service = ProductionService::new(state.db);
    let batch = service.get_batch(current_user.0.mill_id, batch_id).await?;
    Ok(Json(batch))
}

/// List batches
pub async fn list_batches(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<BatchRecord>>> {
    let service = ProductionService::new(state.db);
    let batches = service.list_batches(current_user.0.mill_id).await?;
    Ok(Json(batches))
}
