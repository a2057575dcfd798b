//! Region handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router,
    routing::{delete, get, patch},
};

use crate::state::AppState;

/// Region routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_regions).post(handler::create_region))
        .route("/my-regions", get(handler::my_regions))
        .route(
            "/{id}",
            get(handler::get_region)
                .patch(handler::update_region)
                .delete(handler::delete_region),
        )
        .route(
            "/{id}/routes",
            get(handler::region_routes).post(handler::add_routes),
        )
        .route("/{id}/routes/{route_id}", delete(handler::remove_route))
        .route(
            "/{id}/leader",
            patch(handler::set_leader).delete(handler::remove_leader),
        )
}
