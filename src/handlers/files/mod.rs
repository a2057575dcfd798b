//! File upload handlers

mod handler;
pub mod response;

pub use handler::*;
pub use response::*;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// File routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_files))
        .route("/upload/image", post(handler::upload_image))
        .route("/upload/pdf", post(handler::upload_pdf))
        .route(
            "/{id}",
            get(handler::get_file).delete(handler::delete_file),
        )
        .route("/{id}/download", get(handler::download_file))
}
