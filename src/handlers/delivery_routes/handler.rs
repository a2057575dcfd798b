//! Route handler implementations

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
    services::{RouteService, UserService},
    state::AppState,
    utils::sanitize_string,
};

use super::{
    request::{AssignRouteRequest, CreateRouteRequest, UpdateRouteRequest},
    response::RouteResponse,
};

async fn to_responses(state: &AppState, routes: Vec<Route>) -> AppResult<Vec<RouteResponse>> {
    let ids = routes
        .iter()
        .flat_map(|r| [r.assigned_user_id, r.updated_by])
        .flatten()
        .collect::<Vec<Uuid>>();
    let people = UserService::summaries(state.db(), ids).await?;

    Ok(routes
        .into_iter()
        .map(|route| RouteResponse::new(route, &people))
        .collect())
}

async fn to_response(state: &AppState, route: Route) -> AppResult<RouteResponse> {
    let mut responses = to_responses(state, vec![route]).await?;
    Ok(responses.remove(0))
}

pub async fn create_route(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateRouteRequest>,
) -> AppResult<(StatusCode, Json<RouteResponse>)> {
    auth_user.require(roles::ADMIN)?;
    payload.validate()?;

    let route = RouteService::create(
        state.db(),
        &sanitize_string(&payload.name),
        payload.description.as_deref(),
        payload.region_id,
        &auth_user.id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(to_response(&state, route).await?)))
}

pub async fn list_routes(State(state): State<AppState>) -> AppResult<Json<Vec<RouteResponse>>> {
    let routes = RouteService::list(state.db()).await?;
    Ok(Json(to_responses(&state, routes).await?))
}

pub async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RouteResponse>> {
    let route = RouteService::get(state.db(), &id).await?;
    Ok(Json(to_response(&state, route).await?))
}

pub async fn update_route(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRouteRequest>,
) -> AppResult<Json<RouteResponse>> {
    auth_user.require(roles::ADMIN)?;
    payload.validate()?;

    let route = RouteService::update(state.db(), &id, payload.into(), &auth_user.id).await?;
    Ok(Json(to_response(&state, route).await?))
}

pub async fn assign_route(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignRouteRequest>,
) -> AppResult<Json<RouteResponse>> {
    auth_user.require(roles::ADMIN)?;

    let route = RouteService::assign(
        state.db(),
        state.mailer(),
        &id,
        payload.assigned_user_id,
        &auth_user.id,
    )
    .await?;
    Ok(Json(to_response(&state, route).await?))
}

pub async fn unassign_route(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RouteResponse>> {
    auth_user.require(roles::ADMIN)?;

    let route = RouteService::assign(state.db(), state.mailer(), &id, None, &auth_user.id).await?;
    Ok(Json(to_response(&state, route).await?))
}

pub async fn soft_delete_route(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RouteResponse>> {
    auth_user.require(roles::ADMIN)?;

    let route = RouteService::soft_delete(state.db(), &id, &auth_user.id).await?;
    Ok(Json(to_response(&state, route).await?))
}

pub async fn delete_route(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    auth_user.require(roles::ADMIN)?;

    RouteService::delete(state.db(), &id).await?;
    Ok(Json(MessageResponse::new("Route deleted successfully")))
}
