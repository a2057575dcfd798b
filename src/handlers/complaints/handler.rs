//! Complaint handler implementations

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
    models::{Complaint, NewComplaint},
    services::{ComplaintService, complaint_service::PageRequest},
    state::AppState,
};

use super::{
    request::{
        BulkAssignRequest, BulkStatusRequest, ComplaintQuery, CreateComplaintRequest, StatsQuery,
        UpdateStatusRequest,
    },
    response::{BulkCreateResult, BulkUpdateResult, ComplaintPage, ComplaintStats},
};

/// Import complaints; rows identical to stored ones are skipped
pub async fn bulk_create(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<Vec<CreateComplaintRequest>>,
) -> AppResult<(StatusCode, Json<BulkCreateResult>)> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;
    for item in &payload {
        item.validate()?;
    }

    let items: Vec<NewComplaint> = payload.into_iter().map(Into::into).collect();
    let result = ComplaintService::create_many(state.db(), items).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

pub async fn bulk_assign(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<BulkAssignRequest>,
) -> AppResult<Json<BulkUpdateResult>> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;
    payload.validate()?;

    let result =
        ComplaintService::bulk_assign(state.db(), &payload.complaint_ids, &payload.user_id).await?;
    Ok(Json(result))
}

pub async fn bulk_status(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<BulkStatusRequest>,
) -> AppResult<Json<BulkUpdateResult>> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;
    payload.validate()?;

    let result =
        ComplaintService::bulk_set_status(state.db(), &payload.complaint_ids, &payload.status)
            .await?;
    Ok(Json(result))
}

pub async fn list_complaints(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ComplaintQuery>,
) -> AppResult<Json<ComplaintPage>> {
    auth_user.require(roles::MANAGERS)?;

    let descending = query.descending()?;
    let page = ComplaintService::list(
        state.db(),
        query.filter(),
        PageRequest::new(query.page, query.limit),
        query.sort_by.as_deref(),
        descending,
    )
    .await?;
    Ok(Json(page))
}

pub async fn stats(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<ComplaintStats>> {
    auth_user.require(roles::MANAGERS)?;

    let stats =
        ComplaintService::stats(state.db(), query.year, query.month, query.status.as_deref())
            .await?;
    Ok(Json(stats))
}

pub async fn get_complaint(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Complaint>> {
    auth_user.require(roles::MANAGERS)?;

    Ok(Json(ComplaintService::get(state.db(), id).await?))
}

pub async fn assign_complaint(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path((id, user_id)): Path<(i32, Uuid)>,
) -> AppResult<Json<Complaint>> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;

    Ok(Json(ComplaintService::assign(state.db(), id, &user_id).await?))
}

pub async fn update_status(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<Complaint>> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;
    payload.validate()?;

    Ok(Json(
        ComplaintService::set_status(state.db(), id, &payload.status).await?,
    ))
}

pub async fn delete_complaint(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;

    ComplaintService::delete(state.db(), id).await?;
    Ok(Json(MessageResponse::new("Complaint deleted successfully")))
}
