//! User management handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// User routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_users))
        .route("/profile", patch(handler::update_profile))
        .route("/make-admin", post(handler::make_admin))
        .route("/change-password", post(handler::change_password))
        .route(
            "/{id}",
            get(handler::get_user)
                .patch(handler::update_user)
                .delete(handler::delete_user),
        )
        .route("/{id}/toggle-active", post(handler::toggle_active))
        .route("/{id}/paid-per-stop", patch(handler::set_paid_per_stop))
}
