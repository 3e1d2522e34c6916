//! Profile handlers for the authenticated user.

use axum::{Json, extract::State};
use serde::Deserialize;

use storekeeper_core::Email;

use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::User;
use crate::routes::ApiResponse;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Profile update payload. All fields are optional; a password change
/// requires the current password alongside the new one.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Current user's profile.
///
/// GET /api/v1/user/profile
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<User>>> {
    let profile = UserRepository::new(state.pool())
        .get_by_id(user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;

    Ok(Json(ApiResponse::ok(profile)))
}

/// Update the current user's profile and, optionally, their password.
///
/// PUT /api/v1/user/profile
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<User>>> {
    let users = UserRepository::new(state.pool());

    if let Some(new_password) = &request.new_password {
        let current = request.current_password.as_deref().ok_or_else(|| {
            AppError::Validation("current password is required to change password".to_owned())
        })?;

        AuthService::new(state.pool())
            .change_password(user.user_id, current, new_password)
            .await?;
    }

    let existing = users
        .get_by_id(user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;

    let email = match &request.email {
        Some(raw) => Email::parse(raw).map_err(|e| AppError::Validation(e.to_string()))?,
        None => existing.email.clone(),
    };
    let username = request.username.as_deref().unwrap_or(&existing.username);

    let updated = users.update_profile(user.user_id, &email, username).await?;

    Ok(Json(ApiResponse::with_message("profile updated", updated)))
}
