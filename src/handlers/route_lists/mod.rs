//! Routes-list handlers

mod handler;
pub mod request;

pub use handler::*;
pub use request::*;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Routes-list routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_route_lists))
        .route(
            "/{id}",
            get(handler::get_route_list).patch(handler::rename_route_list),
        )
        .route("/{id}/transfer", post(handler::transfer))
}
