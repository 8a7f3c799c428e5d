//! First-run bootstrap
//!
//! Creates the initial manager account and seeds the location master
//! data when no staff exist yet. Running it again is a no-op reporting
//! `created: false`, so the endpoint can stay public: once any account
//! exists it refuses to create another.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use shared::models::{Location, Role, StaffAccount};
use shared::util::{now_millis, record_id};
use shared::{ApiResponse, AppError, AppResult};

use crate::auth::hash_password;
use crate::core::ServerState;

#[derive(Debug, Deserialize)]
pub struct SetupRequest {
    pub username: String,
    pub password: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SetupResponse {
    /// Whether the manager account was created by this call
    pub created: bool,
}

pub async fn setup(
    State(state): State<ServerState>,
    Json(req): Json<SetupRequest>,
) -> AppResult<ApiResponse<SetupResponse>> {
    if state.storage.staff_count()? > 0 {
        return Ok(ApiResponse::success(SetupResponse { created: false }));
    }

    if req.username.is_empty() {
        return Err(AppError::validation("username is required").with_detail("field", "username"));
    }
    if req.password.len() < 8 {
        return Err(
            AppError::validation("password must be at least 8 characters")
                .with_detail("field", "password"),
        );
    }

    let hash_pass = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))?;
    let now = now_millis();
    let account = StaffAccount {
        id: record_id(),
        display_name: req.display_name.unwrap_or_else(|| req.username.clone()),
        username: req.username,
        hash_pass,
        role: Role::Manager,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    state.storage.put_staff(&account)?;

    for name in ["本店", "百貨店催事"] {
        let location = Location {
            id: record_id(),
            name: name.into(),
            address: None,
            note: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        state.storage.put_location(&location)?;
    }

    tracing::info!(username = %account.username, "initial manager account and locations created");
    Ok(ApiResponse::success(SetupResponse { created: true }))
}
