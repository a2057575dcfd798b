//! Region handler implementations

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    handlers::MessageResponse,
    middleware::{AuthenticatedUser, roles},
    models::Route,
    services::RegionService,
    state::AppState,
    utils::sanitize_string,
};

use super::{
    request::{AddRoutesRequest, CreateRegionRequest, SetLeaderRequest, UpdateRegionRequest},
    response::RegionResponse,
};

pub async fn create_region(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateRegionRequest>,
) -> AppResult<(StatusCode, Json<RegionResponse>)> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;
    payload.validate()?;

    let details = RegionService::create(
        state.db(),
        &sanitize_string(&payload.name),
        payload.description.as_deref(),
        payload.leader_id,
        &auth_user.id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(details.into())))
}

pub async fn list_regions(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<Vec<RegionResponse>>> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;

    let regions = RegionService::list(state.db()).await?;
    Ok(Json(regions.into_iter().map(Into::into).collect()))
}

/// Regions led by the caller
pub async fn my_regions(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<Vec<RegionResponse>>> {
    auth_user.require(roles::LEADER)?;

    let regions = RegionService::my_regions(state.db(), &auth_user.id).await?;
    Ok(Json(regions.into_iter().map(Into::into).collect()))
}

pub async fn get_region(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RegionResponse>> {
    auth_user.require(roles::MANAGERS)?;

    let details = RegionService::get_visible(state.db(), &auth_user, &id).await?;
    Ok(Json(details.into()))
}

pub async fn region_routes(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Route>>> {
    auth_user.require(roles::MANAGERS)?;

    let routes = RegionService::routes_visible(state.db(), &auth_user, &id).await?;
    Ok(Json(routes))
}

pub async fn update_region(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRegionRequest>,
) -> AppResult<Json<RegionResponse>> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;
    payload.validate()?;

    let name = payload.name.as_deref().map(sanitize_string);
    let details = RegionService::update(
        state.db(),
        &id,
        name.as_deref(),
        payload.description.as_deref(),
        &auth_user.id,
    )
    .await?;
    Ok(Json(details.into()))
}

/// Delete a region; its routes stay, detached
pub async fn delete_region(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;

    RegionService::delete(state.db(), &id).await?;
    Ok(Json(MessageResponse::new("Region deleted successfully")))
}

pub async fn add_routes(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddRoutesRequest>,
) -> AppResult<Json<RegionResponse>> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;
    payload.validate()?;

    let details =
        RegionService::add_routes(state.db(), &id, &payload.route_ids, &auth_user.id).await?;
    Ok(Json(details.into()))
}

pub async fn remove_route(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path((id, route_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<MessageResponse>> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;

    RegionService::remove_route(state.db(), &id, &route_id, &auth_user.id).await?;
    Ok(Json(MessageResponse::new("Route removed from region")))
}

pub async fn set_leader(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetLeaderRequest>,
) -> AppResult<Json<RegionResponse>> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;

    let details =
        RegionService::set_leader(state.db(), &id, &payload.leader_id, &auth_user.id).await?;
    Ok(Json(details.into()))
}

pub async fn remove_leader(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RegionResponse>> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;

    let details = RegionService::remove_leader(state.db(), &id, &auth_user.id).await?;
    Ok(Json(details.into()))
}
