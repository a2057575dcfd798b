//! Settings handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

/// Settings routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_settings))
        .route("/{key}", patch(handler::update_setting))
}
