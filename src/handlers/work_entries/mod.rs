//! Work entry handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Work entry routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_entries).post(handler::create_entry))
        .route("/my-entries", get(handler::my_entries))
        .route("/summary", get(handler::summary))
        .route(
            "/{id}",
            get(handler::get_entry)
                .patch(handler::update_entry)
                .delete(handler::delete_entry),
        )
}
