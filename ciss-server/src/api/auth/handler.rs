//! Authentication Handlers

use std::time::Duration;

use axum::{Json, extract::State};
use shared::ErrorCode;
use shared::client::{LoginRequest, LoginResponse, UserInfo};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppError;

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Login handler
///
/// Authenticates an operator and returns a JWT. The error message never
/// distinguishes a wrong password from an unknown username.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state.db.admin_users().find_by_username(&req.username).await?;

    // Fixed delay before checking the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(u) => {
            if !u.is_active {
                return Err(AppError::new(ErrorCode::AccountDisabled));
            }
            if !u.verify_password(&req.password) {
                tracing::warn!(username = %req.username, "login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }
            u
        }
        None => {
            tracing::warn!(username = %req.username, "login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();

    let token = state
        .jwt_service
        .generate_token(&user_id, &user.username, &user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(user_id = %user_id, username = %user.username, "user logged in");

    Ok(Json(LoginResponse {
        token,
        expires_in: state.jwt_service.config.expiration_minutes * 60,
        user: UserInfo {
            id: user_id,
            username: user.username,
            role: user.role,
        },
    }))
}

/// Current user info, straight from the validated token
pub async fn me(user: CurrentUser) -> Json<UserInfo> {
    Json(UserInfo {
        id: user.id,
        username: user.username,
        role: user.role,
    })
}
