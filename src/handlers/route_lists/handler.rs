//! Routes-list handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
};
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::{AuthenticatedUser, roles},
    models::RouteList,
    services::{RouteListService, route_list_service::TransferResult},
    state::AppState,
    utils::sanitize_string,
};

use super::request::{RenameRouteListRequest, RouteListQuery, TransferRequest};

/// Newest first
pub async fn list_route_lists(
    State(state): State<AppState>,
    Query(query): Query<RouteListQuery>,
) -> AppResult<Json<Vec<RouteList>>> {
    query.validate()?;

    let lists = RouteListService::list(state.db(), query.into()).await?;
    Ok(Json(lists))
}

pub async fn get_route_list(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<RouteList>> {
    Ok(Json(RouteListService::get(state.db(), id).await?))
}

pub async fn rename_route_list(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<RenameRouteListRequest>,
) -> AppResult<Json<RouteList>> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;
    payload.validate()?;

    let list = RouteListService::rename(state.db(), id, &sanitize_string(&payload.route)).await?;
    Ok(Json(list))
}

pub async fn transfer(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<TransferRequest>,
) -> AppResult<Json<TransferResult>> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;
    payload.validate()?;

    let result =
        RouteListService::transfer(state.db(), id, payload.target()?, payload.amount()).await?;
    Ok(Json(result))
}
