//! HTTP handlers for product catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::product::{
    CreateProductInput, ProductRecord, ProductService, UpdateProductInput,
};
use crate::AppState;
use shared::models::ProductCategory;

#[derive(Deserialize)]
pub struct ListProductsQuery {
    pub category: Option<ProductCategory>,
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateProductInput>,
) -> AppResult<(StatusCode, Json<ProductRecord>)> {
    let service = ProductService::new(state.db);
    let product = service
        .create_product(current_user.0.mill_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product
pub async fn get_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ProductRecord>> {
    let service = ProductService::new(state.db);
    let product = service.get_product(current_user.0.mill_id, product_id).await?;
    Ok(Json(product))
}

/// List products, optionally filtered by category
pub async fn list_products(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListProductsQuery>,
) -> AppResult<Json<Vec<ProductRecord>>> {
    let service = ProductService::new(state.db);
    let products = service
        .list_products(current_user.0.mill_id, query.category)
        .await?;
    Ok(Json(products))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<ProductRecord>> {
    let service = ProductService::new(state.db);
    let product = service
        .update_product(current_user.0.mill_id, product_id, input)
        .await?;
    Ok(Json(product))
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = ProductService::new(state.db);
    service
        .delete_product(current_user.0.mill_id, product_id)
        .await?;
    Ok(Json(()))
}
