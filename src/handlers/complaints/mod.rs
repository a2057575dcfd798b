//! Complaint handlers

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

/// Complaint routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_complaints))
        .route("/bulk", post(handler::bulk_create))
        .route("/bulk-assign", post(handler::bulk_assign))
        .route("/bulk-status", post(handler::bulk_status))
        .route("/stats", get(handler::stats))
        .route(
            "/{id}",
            get(handler::get_complaint).delete(handler::delete_complaint),
        )
        .route("/{id}/assign/{user_id}", patch(handler::assign_complaint))
        .route("/{id}/status", patch(handler::update_status))
}
