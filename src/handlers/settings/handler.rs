//! Settings handler implementations

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    error::AppResult,
    middleware::{AuthenticatedUser, roles},
    services::SettingService,
    state::AppState,
};

use super::{request::UpdateSettingRequest, response::SettingResponse};

pub async fn list_settings(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<Vec<SettingResponse>>> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;

    let settings = SettingService::list(state.db()).await?;
    Ok(Json(settings.into_iter().map(Into::into).collect()))
}

pub async fn update_setting(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(key): Path<String>,
    Json(payload): Json<UpdateSettingRequest>,
) -> AppResult<Json<SettingResponse>> {
    auth_user.require(roles::ADMIN_OR_OWNER)?;

    let raw = payload.raw_value()?;
    let setting = SettingService::update(state.db(), &key, &raw).await?;
    Ok(Json(setting.into()))
}
