//! Staff account handlers

use axum::{Json, extract::State};
use shared::models::{StaffAccount, StaffCreate, StaffInfo};
use shared::util::{now_millis, record_id};
use shared::{ApiResponse, AppError, AppResult};

use crate::auth::hash_password;
use crate::core::ServerState;

pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<StaffInfo>>> {
    let accounts = state.storage.list_staff()?;
    Ok(ApiResponse::success(
        accounts.iter().map(StaffInfo::from).collect(),
    ))
}

/// Create a staff account (managers only, enforced by the router)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<StaffCreate>,
) -> AppResult<ApiResponse<StaffInfo>> {
    if payload.username.is_empty() {
        return Err(AppError::validation("username is required").with_detail("field", "username"));
    }
    if payload.password.len() < 8 {
        return Err(
            AppError::validation("password must be at least 8 characters")
                .with_detail("field", "password"),
        );
    }
    if state.storage.get_staff(&payload.username)?.is_some() {
        return Err(AppError::conflict(format!(
            "Username {} is already taken",
            payload.username
        )));
    }

    let hash_pass = hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))?;
    let now = now_millis();
    let account = StaffAccount {
        id: record_id(),
        display_name: payload
            .display_name
            .unwrap_or_else(|| payload.username.clone()),
        username: payload.username,
        hash_pass,
        role: payload.role,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    state.storage.put_staff(&account)?;

    tracing::info!(username = %account.username, role = account.role.as_str(), "staff account created");
    Ok(ApiResponse::success(StaffInfo::from(&account)))
}
