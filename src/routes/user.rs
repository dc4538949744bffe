//! User profile routes

use axum::{routing::put, Router};

use crate::handlers::user;
use crate::state::AppState;

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users/profile", put(user::update_profile))
}
