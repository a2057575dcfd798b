//! Delivery route handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::state::AppState;

/// Route routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_routes).post(handler::create_route))
        .route(
            "/{id}",
            get(handler::get_route)
                .patch(handler::update_route)
                .delete(handler::delete_route),
        )
        .route("/{id}/assign", patch(handler::assign_route))
        .route("/{id}/unassign", post(handler::unassign_route))
        .route("/{id}/soft", delete(handler::soft_delete_route))
}
