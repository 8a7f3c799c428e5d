//! Authentication handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use shared::models::StaffInfo;
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::auth::{CurrentUser, verify_password};
use crate::core::ServerState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: StaffInfo,
}

/// Login: verify credentials, return a JWT and the staff profile.
///
/// Unknown username and wrong password share one error so usernames
/// cannot be enumerated.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let account = state
        .storage
        .get_staff(&req.username)?
        .ok_or_else(|| {
            tracing::warn!(target: "security", username = %req.username, "login failed, unknown user");
            AppError::invalid_credentials()
        })?;

    if !account.is_active {
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let valid = verify_password(&req.password, &account.hash_pass)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
    if !valid {
        tracing::warn!(target: "security", username = %req.username, "login failed, wrong password");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt_service
        .generate_token(&account)
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    tracing::info!(username = %account.username, "login succeeded");
    Ok(ApiResponse::success(LoginResponse {
        token,
        user: StaffInfo::from(&account),
    }))
}

/// Current authenticated staff profile
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<StaffInfo>> {
    let account = state
        .storage
        .get_staff(&user.username)?
        .ok_or_else(|| AppError::not_found(format!("Staff {}", user.username)))?;
    Ok(ApiResponse::success(StaffInfo::from(&account)))
}
