//! Authentication handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{middleware::auth_middleware, state::AppState};

/// Authentication routes. Logout, profile and invite need a session.
pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/signup", post(handler::signup))
        .route("/login", post(handler::login))
        .route("/refresh", post(handler::refresh_token))
        .route("/validate-invitation", post(handler::validate_invitation))
        .route("/complete-registration", post(handler::complete_registration))
        .route("/reset-password-request", post(handler::request_password_reset))
        .route("/reset-password", post(handler::reset_password));

    let protected = Router::new()
        .route("/logout", post(handler::logout))
        .route("/profile", get(handler::profile))
        .route("/invite", post(handler::invite))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(protected)
}
