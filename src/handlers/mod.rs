//! HTTP Request Handlers
//!
//! One module per domain. Everything except health checks and the public
//! auth endpoints sits behind the auth middleware.

pub mod auth;
pub mod cars;
pub mod complaints;
pub mod delivery_routes;
pub mod files;
pub mod health;
pub mod regions;
pub mod route_lists;
pub mod settings;
pub mod users;
pub mod work_entries;

use axum::{Router, middleware};
use serde::Serialize;

use crate::{middleware::auth_middleware, state::AppState};

/// Plain acknowledgement body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Create all API routes
pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/users", users::routes())
        .nest("/cars", cars::routes())
        .nest("/routes", delivery_routes::routes())
        .nest("/regions", regions::routes())
        .nest("/settings", settings::routes())
        .nest("/work-entries", work_entries::routes())
        .nest("/complaints", complaints::routes())
        .nest("/files", files::routes())
        .nest("/routes-lists", route_lists::routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .nest("/auth", auth::routes(state))
        .merge(protected)
}
