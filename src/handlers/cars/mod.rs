//! Car handlers

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

/// Car routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_cars).post(handler::create_car))
        .route(
            "/{id}",
            get(handler::get_car)
                .patch(handler::update_car)
                .delete(handler::delete_car),
        )
        .route("/{id}/assign", patch(handler::assign_car))
        .route("/{id}/unassign", post(handler::unassign_car))
        .route("/{id}/status", patch(handler::update_car_status))
        .route("/{id}/soft", delete(handler::soft_delete_car))
}
