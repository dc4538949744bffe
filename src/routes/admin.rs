//! Administrative routes (admin role required)

use axum::{
    routing::{get, patch},
    Router,
};

use crate::handlers::admin;
use crate::state::AppState;

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/:id/disabled", patch(admin::set_user_disabled))
}
