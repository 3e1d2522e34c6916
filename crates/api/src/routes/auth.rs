//! Registration and login handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::User;
use crate::routes::ApiResponse;
use crate::services::auth::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Create a customer account.
///
/// POST /api/v1/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<User>>> {
    let user = AuthService::new(state.pool())
        .register(&request.email, &request.username, &request.password)
        .await?;

    Ok(Json(ApiResponse::with_message("user registered", user)))
}

/// Login with email and password, returning a bearer token.
///
/// POST /api/v1/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>> {
    let outcome = AuthService::new(state.pool())
        .login(&state, &request.email, &request.password)
        .await?;

    Ok(Json(ApiResponse::ok(LoginResponse {
        token: outcome.token,
        user: outcome.user,
    })))
}
