//! User handler implementations

use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    handlers::MessageResponse,
    middleware::{AuthenticatedUser, roles},
    models::Role,
    services::UserService,
    state::AppState,
};

use super::{
    request::{
        ChangePasswordRequest, MakeAdminRequest, PaidPerStopRequest, ToggleActiveRequest,
        UpdateProfileRequest, UpdateUserRequest,
    },
    response::UserResponse,
};

/// List all users with their car and route
pub async fn list_users(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<Vec<UserResponse>>> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;

    let users = UserService::list(state.db()).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get a specific user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let details = UserService::get_details(state.db(), &id).await?;
    Ok(Json(details.into()))
}

/// Edit the caller's own profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    payload.validate()?;

    let details = UserService::update_profile(state.db(), &auth_user.id, payload.into()).await?;
    Ok(Json(details.into()))
}

/// Edit any account, including its car and route
pub async fn update_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;
    payload.validate()?;

    let details =
        UserService::update_user(state.db(), state.mailer(), &auth_user, &id, payload.into())
            .await?;
    Ok(Json(details.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;

    UserService::delete_user(state.db(), &auth_user, &id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// Grant the admin role. Owners may not do this.
pub async fn make_admin(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<MakeAdminRequest>,
) -> AppResult<Json<UserResponse>> {
    if auth_user.role != Role::Admin {
        return Err(AppError::Forbidden(
            "Only admins can grant the admin role".to_string(),
        ));
    }
    payload.validate()?;

    let user = UserService::make_admin(state.db(), &payload.email).await?;
    let details = UserService::get_details(state.db(), &user.id).await?;
    Ok(Json(details.into()))
}

pub async fn toggle_active(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ToggleActiveRequest>,
) -> AppResult<Json<UserResponse>> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;

    UserService::set_active(state.db(), &auth_user, &id, payload.active).await?;
    let details = UserService::get_details(state.db(), &id).await?;
    Ok(Json(details.into()))
}

pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    payload.validate()?;

    UserService::change_password(
        state.db(),
        &auth_user.id,
        &payload.current_password,
        &payload.new_password,
    )
    .await?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}

pub async fn set_paid_per_stop(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaidPerStopRequest>,
) -> AppResult<Json<UserResponse>> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;

    UserService::set_paid_per_stop(state.db(), &auth_user, &id, payload.paid_per_stop).await?;
    let details = UserService::get_details(state.db(), &id).await?;
    Ok(Json(details.into()))
}
