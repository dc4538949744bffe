//! Administrative handlers
//!
//! Every route here sits behind the admin gate.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use super::AdminUser;
use crate::error::ApiError;
use crate::models::{SetDisabledRequest, User, UserMutationResponse};
use crate::state::AppState;

/// GET /admin/users - List all users (secrets omitted)
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.auth_service.list_users().await?;
    Ok(Json(users))
}

/// PATCH /admin/users/:id/disabled - Disable or re-enable an account.
/// A disabled account fails every subsequent authentication until re-enabled.
pub async fn set_user_disabled(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(user_id): Path<Uuid>,
    Json(request): Json<SetDisabledRequest>,
) -> Result<Json<UserMutationResponse>, ApiError> {
    let updated = state
        .auth_service
        .set_user_disabled(user_id, request.disabled)
        .await?;

    tracing::info!(
        admin_id = %admin.0.user.id,
        user_id = %user_id,
        disabled = request.disabled,
        "Account disabled flag changed"
    );

    Ok(Json(UserMutationResponse {
        message: if request.disabled {
            "User disabled".to_string()
        } else {
            "User enabled".to_string()
        },
        user: updated,
    }))
}
