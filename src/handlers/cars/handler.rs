//! Car handler implementations

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
    models::Car,
    services::{CarService, UserService},
    state::AppState,
};

use super::{
    request::{AssignCarRequest, CreateCarRequest, UpdateCarRequest, UpdateCarStatusRequest},
    response::CarResponse,
};

/// Attach assigned-user and updated-by summaries
async fn to_responses(state: &AppState, cars: Vec<Car>) -> AppResult<Vec<CarResponse>> {
    let ids = cars
        .iter()
        .flat_map(|c| [c.assigned_user_id, c.updated_by])
        .flatten()
        .collect::<Vec<Uuid>>();
    let people = UserService::summaries(state.db(), ids).await?;

    Ok(cars
        .into_iter()
        .map(|car| CarResponse::new(car, &people))
        .collect())
}

async fn to_response(state: &AppState, car: Car) -> AppResult<CarResponse> {
    let people =
        UserService::summaries(state.db(), [car.assigned_user_id, car.updated_by].into_iter().flatten())
            .await?;
    Ok(CarResponse::new(car, &people))
}

pub async fn create_car(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateCarRequest>,
) -> AppResult<(StatusCode, Json<CarResponse>)> {
    auth_user.require(roles::ADMIN)?;
    payload.validate()?;

    let car = CarService::create(state.db(), payload.into(), &auth_user.id).await?;
    Ok((StatusCode::CREATED, Json(to_response(&state, car).await?)))
}

pub async fn list_cars(State(state): State<AppState>) -> AppResult<Json<Vec<CarResponse>>> {
    let cars = CarService::list(state.db()).await?;
    Ok(Json(to_responses(&state, cars).await?))
}

pub async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CarResponse>> {
    let car = CarService::get(state.db(), &id).await?;
    Ok(Json(to_response(&state, car).await?))
}

pub async fn update_car(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCarRequest>,
) -> AppResult<Json<CarResponse>> {
    auth_user.require(roles::ADMIN)?;
    payload.validate()?;

    let car = CarService::update(state.db(), &id, payload.into(), &auth_user.id).await?;
    Ok(Json(to_response(&state, car).await?))
}

/// Hand the car to a user; `null` takes it back
pub async fn assign_car(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignCarRequest>,
) -> AppResult<Json<CarResponse>> {
    auth_user.require(roles::ADMIN)?;

    let car = CarService::assign(
        state.db(),
        state.mailer(),
        &id,
        payload.assigned_user_id,
        &auth_user.id,
    )
    .await?;
    Ok(Json(to_response(&state, car).await?))
}

pub async fn unassign_car(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CarResponse>> {
    auth_user.require(roles::ADMIN)?;

    let car = CarService::assign(state.db(), state.mailer(), &id, None, &auth_user.id).await?;
    Ok(Json(to_response(&state, car).await?))
}

pub async fn update_car_status(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCarStatusRequest>,
) -> AppResult<Json<CarResponse>> {
    auth_user.require(roles::ADMIN)?;
    payload.validate()?;

    let car = CarService::set_status(state.db(), &id, &payload.status, &auth_user.id).await?;
    Ok(Json(to_response(&state, car).await?))
}

/// Mark the car inactive, keeping its history
pub async fn soft_delete_car(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CarResponse>> {
    auth_user.require(roles::ADMIN)?;

    let car = CarService::soft_delete(state.db(), &id, &auth_user.id).await?;
    Ok(Json(to_response(&state, car).await?))
}

pub async fn delete_car(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    auth_user.require(roles::ADMIN)?;

    CarService::delete(state.db(), &id).await?;
    Ok(Json(MessageResponse::new("Car deleted successfully")))
}
