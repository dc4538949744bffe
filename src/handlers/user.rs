//! User profile handlers

use axum::{extract::State, Json};

use super::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::{UpdateProfileRequest, UserMutationResponse};
use crate::state::AppState;

/// PUT /users/profile - Update the caller's profile fields
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserMutationResponse>, ApiError> {
    let updated = state
        .auth_service
        .update_profile(user.user.id, request)
        .await?;

    Ok(Json(UserMutationResponse {
        message: "Profile updated successfully".to_string(),
        user: updated,
    }))
}
