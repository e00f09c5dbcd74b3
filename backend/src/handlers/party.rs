//! HTTP handlers for supplier and customer endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::party::{
    CreatePartyInput, PartyBalance, PartyRecord, PartyService, UpdatePartyInput,
};
use crate::AppState;
use shared::models::PartyType;

#[derive(Deserialize)]
pub struct ListPartiesQuery {
    pub party_type: Option<PartyType>,
    pub search: Option<String>,
}

/// Create a supplier or customer
pub async fn create_party(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePartyInput>,
) -> AppResult<(StatusCode, Json<PartyRecord>)> {
    let service = PartyService::new(state.db);
    let party = service.create_party(current_user.0.mill_id, input).await?;
    Ok((StatusCode::CREATED, Json(party)))
}

/// Get a party
pub async fn get_party(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(party_id): Path<Uuid>,
) -> AppResult<Json<PartyRecord>> {
    let service = PartyService::new(state.db);
    let party = service.get_party(current_user.0.mill_id, party_id).await?;
    Ok(Json(party))
}

/// List parties with optional type filter and search term
pub async fn list_parties(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListPartiesQuery>,
) -> AppResult<Json<Vec<PartyRecord>>> {
    let service = PartyService::new(state.db);
    let parties = service
        .list_parties(current_user.0.mill_id, query.party_type, query.search)
        .await?;
    Ok(Json(parties))
}

/// Update a party
pub async fn update_party(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(party_id): Path<Uuid>,
    Json(input): Json<UpdatePartyInput>,
) -> AppResult<Json<PartyRecord>> {
    let service = PartyService::new(state.db);
    let party = service
        .update_party(current_user.0.mill_id, party_id, input)
        .await?;
    Ok(Json(party))
}

/// Delete a party
pub async fn delete_party(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(party_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = PartyService::new(state.db);
    service
        .delete_party(current_user.0.mill_id, party_id)
        .await?;
    Ok(Json(()))
}

/// Get a party with its outstanding balance
pub async fn get_party_balance(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(party_id): Path<Uuid>,
) -> AppResult<Json<PartyBalance>> {
    let service = PartyService::new(state.db);
    let balance = service
        .get_party_balance(current_user.0.mill_id, party_id)
        .await?;
    Ok(Json(balance))
}
