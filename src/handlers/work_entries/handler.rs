//! Work entry handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    handlers::MessageResponse,
    middleware::{AuthenticatedUser, roles},
    services::WorkEntryService,
    state::AppState,
};

use super::{
    request::{
        CreateWorkEntryRequest, MyEntriesQuery, SummaryQuery, UpdateWorkEntryRequest,
        WorkEntryQuery,
    },
    response::{SummaryResponse, WorkEntryResponse},
};

/// Record work for the caller
pub async fn create_entry(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateWorkEntryRequest>,
) -> AppResult<(StatusCode, Json<WorkEntryResponse>)> {
    payload.validate()?;

    let entry = WorkEntryService::create(state.db(), &auth_user.id, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

pub async fn my_entries(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<MyEntriesQuery>,
) -> AppResult<Json<Vec<WorkEntryResponse>>> {
    let entries = WorkEntryService::my_entries(state.db(), &auth_user.id, query.month).await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

pub async fn list_entries(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<WorkEntryQuery>,
) -> AppResult<Json<Vec<WorkEntryResponse>>> {
    auth_user.require(roles::MANAGERS)?;

    let entries = WorkEntryService::list(state.db(), &auth_user, query.into()).await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

pub async fn summary(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<SummaryResponse>> {
    auth_user.require(roles::MANAGERS)?;

    let (totals, entries) = WorkEntryService::summary(state.db(), &auth_user, query.into()).await?;
    Ok(Json(SummaryResponse {
        totals,
        entries: entries.into_iter().map(Into::into).collect(),
    }))
}

pub async fn get_entry(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<WorkEntryResponse>> {
    let entry = WorkEntryService::get(state.db(), &auth_user, &id).await?;
    Ok(Json(entry.into()))
}

pub async fn update_entry(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateWorkEntryRequest>,
) -> AppResult<Json<WorkEntryResponse>> {
    payload.validate()?;

    let entry = WorkEntryService::update(state.db(), &auth_user.id, &id, payload.into()).await?;
    Ok(Json(entry.into()))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    WorkEntryService::delete(state.db(), &auth_user.id, &id).await?;
    Ok(Json(MessageResponse::new("Work entry deleted successfully")))
}
